use super::{Command, connect};
use crate::utils::config::TiloresConfig;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Fetch an access token, e.g. to check the credentials
pub struct TokenCommand {
    pub config: TiloresConfig,
    /// Print the token itself, not only its expiry
    pub show: bool,
}

#[async_trait]
impl Command for TokenCommand {
    async fn execute(&self) -> Result<()> {
        let client = connect(&self.config)?;
        let token = client.credentials().token().await?;

        if let Some(expires_at) = client.credentials().expires_at().await {
            info!("Access token valid until {}", expires_at);
        }
        if self.show {
            println!("{}", token);
        } else {
            println!("Credentials OK");
        }
        Ok(())
    }
}
