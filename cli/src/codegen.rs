//! Model generation entry points shared by the CLI and build scripts

use anyhow::Result;
use std::path::Path;

pub use tilores_sdk::CodegenResult as GeneratorResult;

/// Generate models from `src_dir/schema.graphql` into `dst_dir`
pub fn run_generation<P: AsRef<Path>, Q: AsRef<Path>>(
    src_dir: P,
    dst_dir: Q,
) -> Result<Vec<GeneratorResult>> {
    tilores_sdk::Codegen::new().generate_all(src_dir.as_ref(), dst_dir.as_ref())
}

/// Build script variant: reads `<project>/schema.graphql`, writes into `<project>/src/generated`
pub fn run_generation_sync<P: AsRef<Path>>(project_dir: P) -> Result<Vec<GeneratorResult>> {
    let src_dir = project_dir.as_ref();
    let dst_dir = src_dir.join("src").join("generated");
    std::fs::create_dir_all(&dst_dir)?;

    run_generation(src_dir, &dst_dir)
}
