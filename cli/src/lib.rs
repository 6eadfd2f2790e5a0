//! Tilores CLI Library
//!
//! Programmatic access to the `tilores` commands. Build scripts can call
//! [`generate_code`] to regenerate models from a project's `schema.graphql`.

pub mod codegen;
pub mod commands;
pub mod utils;

pub use codegen::{GeneratorResult, run_generation, run_generation_sync};

pub use commands::{
    Command, edges::EdgesCommand, entity::EntityCommand, generate::GenCommand,
    search::SearchCommand, token::TokenCommand,
};

use std::path::Path;

pub fn generate_code<P: AsRef<Path>>(project_dir: P) {
    match run_generation_sync(project_dir) {
        Ok(results) => {
            let total_files: usize = results.iter().map(|r| r.files_generated.len()).sum();
            if total_files > 0 {
                println!(
                    "cargo:warning=Model generation completed: {} files generated",
                    total_files
                );
            }

            for result in &results {
                if !result.success {
                    println!(
                        "cargo:warning={} generator failed: {}",
                        result.generator_name, result.message
                    );
                }
            }
        }
        Err(e) => {
            println!("cargo:warning=Model generation failed: {}", e);
        }
    };
}
