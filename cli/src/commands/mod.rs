pub mod edges;
pub mod entity;
pub mod generate;
pub mod search;
pub mod token;

use crate::utils::config::TiloresConfig;
use anyhow::Result;
use async_trait::async_trait;
use tilores_sdk::{ClientCredentials, HttpTransport, TiloresClient};

#[async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub(crate) fn connect(
    config: &TiloresConfig,
) -> Result<TiloresClient<HttpTransport, ClientCredentials>> {
    TiloresClient::from_config(&config.client_config()?)
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
