use super::{Command, connect, print_json};
use crate::utils::config::TiloresConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tilores_sdk::MaskInstance;

/// Search entities and print the matching records
pub struct SearchCommand {
    pub config: TiloresConfig,
    /// Search parameters as a JSON object
    pub params: String,
    /// Dotted record field paths to return, e.g. `addr.city`
    pub fields: Vec<String>,
    /// Full mask as a JSON object, merged with `fields`
    pub mask: Option<String>,
}

impl SearchCommand {
    /// Fill `mask` from the JSON mask and field paths
    pub fn apply_selection(&self, mask: &mut MaskInstance) -> Result<()> {
        if let Some(ref json) = self.mask {
            let value: serde_json::Value =
                serde_json::from_str(json).context("Failed to parse --mask as JSON")?;
            mask.apply_json(&value)?;
        }
        for path in &self.fields {
            mask.select_path(path)?;
        }
        if mask.project().is_empty() {
            return Err(anyhow!("Select at least one record field with --field or --mask"));
        }
        Ok(())
    }

    pub fn parse_params(&self) -> Result<serde_json::Value> {
        let params: serde_json::Value =
            serde_json::from_str(&self.params).context("Failed to parse search parameters as JSON")?;
        if !params.is_object() {
            return Err(anyhow!("Search parameters must be a JSON object"));
        }
        Ok(params)
    }
}

#[async_trait]
impl Command for SearchCommand {
    async fn execute(&self) -> Result<()> {
        let params = self.parse_params()?;
        let client = connect(&self.config)?;

        let mut mask = client.record_mask().await?;
        self.apply_selection(&mut mask)?;

        let response = client.search(&mask, params).await?;
        print_json(&response)
    }
}
