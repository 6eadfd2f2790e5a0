//! Code generation interface for build scripts
//!
//! Generators discover their sources under a project directory and write
//! Rust modules into a destination directory.

use anyhow::Result;
use derive_builder::Builder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result of a code generation operation
#[derive(Debug, Clone, Builder)]
pub struct CodegenResult {
    pub generator_name: String,
    pub files_generated: Vec<PathBuf>,
    pub success: bool,
    pub message: String,
}

/// Trait for all code generators
pub trait CodeGenerator {
    /// Name of this generator (e.g. "models")
    fn generator_name(&self) -> &str;

    /// Check if this generator should run for the given source directory
    fn should_generate(&self, src_dir: &Path) -> bool;

    /// Generate code from source to destination directory
    fn generate(&self, src_dir: &Path, dst_dir: &Path) -> Result<CodegenResult>;
}

/// Runs every applicable generator and writes a `mod.rs` for their output
pub struct Codegen {
    generators: Vec<Box<dyn CodeGenerator>>,
}

impl Codegen {
    /// Create a new codegen runner with default generators
    pub fn new() -> Self {
        let mut codegen = Self {
            generators: Vec::new(),
        };

        codegen.register_generator(Box::new(crate::mapping::ModelCodeGenerator::new()));

        codegen
    }

    /// Register a custom generator
    pub fn register_generator(&mut self, generator: Box<dyn CodeGenerator>) {
        self.generators.push(generator);
    }

    /// Run all applicable generators from src to dst directory
    pub fn generate_all(&self, src_dir: &Path, dst_dir: &Path) -> Result<Vec<CodegenResult>> {
        let mut results = Vec::new();

        for generator in &self.generators {
            if generator.should_generate(src_dir) {
                match generator.generate(src_dir, dst_dir) {
                    Ok(result) => results.push(result),
                    Err(e) => results.push(CodegenResult {
                        generator_name: generator.generator_name().to_string(),
                        files_generated: vec![],
                        success: false,
                        message: format!("Generation failed: {:#}", e),
                    }),
                }
            }
        }

        let generated: Vec<&PathBuf> = results
            .iter()
            .flat_map(|result| result.files_generated.iter())
            .collect();
        if !generated.is_empty() {
            let mut mod_rs = std::fs::File::create(dst_dir.join("mod.rs"))?;
            for file in generated {
                if let Some(mod_name) = file.file_stem().and_then(|stem| stem.to_str()) {
                    mod_rs.write_all(format!("pub mod {};\n", mod_name).as_bytes())?;
                }
            }
        }

        Ok(results)
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple synchronous codegen function for build scripts
pub fn codegen<P: AsRef<Path>>(src_dir: P, dst_dir: P) -> Result<Vec<CodegenResult>> {
    let codegen = Codegen::new();
    codegen.generate_all(src_dir.as_ref(), dst_dir.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_codegen_skips_without_schema() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let results = codegen(src.path(), dst.path()).unwrap();
        assert!(results.is_empty());
        assert!(!dst.path().join("mod.rs").exists());
    }

    #[test]
    fn test_codegen_writes_mod_file() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(
            src.path().join("schema.graphql"),
            "type Record { id: ID! } input RecordInput { id: ID! } input SearchParams { id: ID }",
        )
        .unwrap();

        let results = codegen(src.path(), dst.path()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].success);

        let mod_rs = fs::read_to_string(dst.path().join("mod.rs")).unwrap();
        assert_eq!(mod_rs, "pub mod models;\n");
    }

    #[test]
    fn test_codegen_reports_mapping_failure() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("schema.graphql"), "type Record { id: ID! }").unwrap();

        let results = codegen(src.path(), dst.path()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].message.contains("RecordInput"));
    }
}
