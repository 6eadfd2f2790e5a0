use super::{Command, connect, print_json};
use crate::utils::config::TiloresConfig;
use anyhow::Result;
use async_trait::async_trait;

/// Print the edges of an entity
pub struct EdgesCommand {
    pub config: TiloresConfig,
    pub id: String,
}

#[async_trait]
impl Command for EdgesCommand {
    async fn execute(&self) -> Result<()> {
        let client = connect(&self.config)?;
        let response = client.entity_edges(&self.id).await?;
        print_json(&response)
    }
}
