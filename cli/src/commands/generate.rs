use super::Command;
use crate::codegen::run_generation;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

/// Generate Rust models from `schema.graphql`
pub struct GenCommand {
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
}

#[async_trait]
impl Command for GenCommand {
    async fn execute(&self) -> Result<()> {
        info!(
            "Generating models from {} into {}",
            self.src_dir.display(),
            self.out_dir.display()
        );
        std::fs::create_dir_all(&self.out_dir)?;

        let results = run_generation(&self.src_dir, &self.out_dir)?;
        if results.is_empty() {
            warn!("No schema.graphql found in {}", self.src_dir.display());
            return Ok(());
        }

        let mut failed = 0;
        for result in &results {
            if result.success {
                for file in &result.files_generated {
                    println!("Generated {}", file.display());
                }
            } else {
                failed += 1;
                eprintln!("{} generator failed: {}", result.generator_name, result.message);
            }
        }

        if failed > 0 {
            return Err(anyhow!("{} generator(s) failed", failed));
        }
        Ok(())
    }
}
