use super::{Command, connect, print_json};
use crate::utils::config::TiloresConfig;
use anyhow::Result;
use async_trait::async_trait;
use tilores_sdk::{Direction, RecordInsights, Selection};

/// Fetch an entity with record insights
pub struct EntityCommand {
    pub config: TiloresConfig,
    pub id: String,
    /// Fields to report the most frequent value of
    pub frequency: Vec<String>,
    pub top: i64,
    /// Fields to list all values of
    pub values: Vec<String>,
    /// Fields to list the distinct values of
    pub distinct: Vec<String>,
    /// `<time field>:<field>` pairs, values taken from the newest record
    pub newest: Vec<String>,
}

impl EntityCommand {
    pub fn build_insights(&self, insights: RecordInsights) -> Result<RecordInsights> {
        let mut insights = insights;
        for field in &self.frequency {
            insights = insights.frequency_distribution(field, None, self.top, Direction::Desc)?;
        }
        for field in &self.values {
            insights = insights.values(field, None)?;
        }
        for field in &self.distinct {
            insights = insights.values_distinct(field, None)?;
        }
        for pair in &self.newest {
            let (sort_by, field) = pair
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("Expected <time field>:<field>, got '{}'", pair))?;
            let alias = format!("newest_{}", field);
            insights = insights.newest(sort_by, &alias, vec![Selection::field(field)])?;
        }
        Ok(insights)
    }
}

#[async_trait]
impl Command for EntityCommand {
    async fn execute(&self) -> Result<()> {
        let client = connect(&self.config)?;
        let insights = self.build_insights(client.record_insights().await?)?;
        let response = client.fetch_entity(&self.id, insights).await?;
        print_json(&response)
    }
}
