//! Rust source generation for mapped schema types, built on rust-codegen

use super::types::{EnumType, HostType, MappedType, RecordType, TypeRegistry, UnionType};
use crate::codegen::{CodeGenerator, CodegenResult};
use crate::schema::Schema;
use anyhow::{Context, Result};
use convert_case::{Case, Casing};
use rust_codegen::{Field, Scope, Struct, Type};
use std::fs;
use std::path::Path;

const RUST_KEYWORDS: [&str; 38] = [
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while",
];

/// Generator for serde model structs mirroring a [`TypeRegistry`]
pub struct ModelCodeGenerator;

impl ModelCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Convert a GraphQL field name to a Rust member name
    fn to_snake_case(&self, field_name: &str) -> String {
        let snake = field_name.to_case(Case::Snake);
        if RUST_KEYWORDS.contains(&snake.as_str()) {
            format!("r#{}", snake)
        } else {
            snake
        }
    }

    /// Generate one Rust module holding every type in the registry
    pub fn generate_models(&self, registry: &TypeRegistry) -> Result<String> {
        let mut header = Scope::new();
        header.raw("#![allow(clippy::large_enum_variant)]");
        header.raw("//! Generated Tilores models");
        header.raw("// This file is auto-generated. Do not edit manually.");
        header.raw("");

        let mut scope = Scope::new();
        scope.import("serde", "{Serialize, Deserialize}");
        scope.raw("");

        for (_, definition) in registry.iter() {
            match definition {
                MappedType::Record(record) => self.generate_record(&mut scope, record, registry)?,
                MappedType::Enum(enum_type) => self.generate_enum(&mut scope, enum_type),
                MappedType::Union(union) => self.generate_union(&mut scope, union, registry),
            }
        }

        Ok(format!("{}{}", header.to_string(), scope.to_string()))
    }

    fn generate_record(
        &self,
        scope: &mut Scope,
        record: &RecordType,
        registry: &TypeRegistry,
    ) -> Result<()> {
        let mut model = Struct::new(&record.name);

        if let Some(ref description) = record.description {
            model.doc(description);
        } else {
            model.doc(&format!("Model for GraphQL type {}", record.name));
        }

        model
            .vis("pub")
            .derive("Debug")
            .derive("Clone")
            .derive("PartialEq")
            .derive("Serialize")
            .derive("Deserialize");

        for field in &record.fields {
            let rust_field_name = self.to_snake_case(&field.name);
            let field_type = self.rust_type(&field.host_type(), registry, false);

            // Only add serde rename annotation if the field name actually changed
            let annotations = if rust_field_name != field.name {
                vec![format!("#[serde(rename = \"{}\")]", field.name)]
            } else {
                vec![]
            };

            let documentation = field
                .description
                .as_deref()
                .map(doc_lines)
                .unwrap_or_default();

            // push_field returns the struct, so visibility rides on the name
            model.push_field(Field {
                name: format!("pub {}", rust_field_name),
                ty: Type::new(&field_type),
                documentation,
                annotation: annotations,
            });
        }

        scope.push_struct(model);
        scope.raw("");
        Ok(())
    }

    fn generate_enum(&self, scope: &mut Scope, enum_type: &EnumType) {
        let mut code = String::new();
        match enum_type.description {
            Some(ref description) => push_doc(&mut code, description),
            None => code.push_str(&format!("/// Enum for GraphQL type {}\n", enum_type.name)),
        }
        code.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
        code.push_str(&format!("pub enum {} {{\n", enum_type.name));
        for value in &enum_type.values {
            code.push_str(&format!("    #[serde(rename = \"{}\")]\n", value));
            code.push_str(&format!("    {},\n", value.to_case(Case::Pascal)));
        }
        code.push('}');

        scope.raw(&code);
        scope.raw("");
    }

    fn generate_union(&self, scope: &mut Scope, union: &UnionType, registry: &TypeRegistry) {
        let mut code = String::new();
        match union.description {
            Some(ref description) => push_doc(&mut code, description),
            None => code.push_str(&format!("/// Union for GraphQL type {}\n", union.name)),
        }
        code.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        code.push_str("#[serde(untagged)]\n");
        code.push_str(&format!("pub enum {} {{\n", union.name));
        for member in &union.members {
            let name = registry.get(*member).name();
            code.push_str(&format!("    {}(Box<{}>),\n", name, name));
        }
        code.push('}');

        scope.raw(&code);
        scope.raw("");
    }

    /// Rust spelling of a host type.
    ///
    /// Records and unions outside a `Vec` are boxed so recursive types have a finite size.
    pub fn rust_type(&self, ty: &HostType, registry: &TypeRegistry, in_list: bool) -> String {
        match ty {
            HostType::Primitive(primitive) => primitive.rust_type().to_string(),
            HostType::Named(id) => {
                let definition = registry.get(*id);
                match definition {
                    MappedType::Enum(_) => definition.name().to_string(),
                    _ if in_list => definition.name().to_string(),
                    _ => format!("Box<{}>", definition.name()),
                }
            }
            HostType::List(inner) => format!("Vec<{}>", self.rust_type(inner, registry, true)),
            HostType::Optional(inner) => {
                format!("Option<{}>", self.rust_type(inner, registry, in_list))
            }
        }
    }
}

/// Split a schema description into doc comment lines
fn doc_lines(description: &str) -> Vec<String> {
    description.lines().map(|line| line.trim_end().to_string()).collect()
}

fn push_doc(code: &mut String, description: &str) {
    for line in doc_lines(description) {
        code.push_str(&format!("/// {}\n", line));
    }
}

impl Default for ModelCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for ModelCodeGenerator {
    fn generator_name(&self) -> &str {
        "models"
    }

    fn should_generate(&self, src_dir: &Path) -> bool {
        src_dir.join("schema.graphql").exists()
    }

    fn generate(&self, src_dir: &Path, dst_dir: &Path) -> Result<CodegenResult> {
        let schema_path = src_dir.join("schema.graphql");
        let schema_content = fs::read_to_string(&schema_path)
            .with_context(|| format!("Failed to read schema file: {}", schema_path.display()))?;

        let schema = Schema::from_sdl(&schema_content)
            .with_context(|| "Failed to parse GraphQL schema")?;
        let registry = TypeRegistry::from_schema(&schema)
            .with_context(|| "Failed to map GraphQL schema")?;

        let code = self.generate_models(&registry)?;

        if !dst_dir.exists() {
            fs::create_dir_all(dst_dir)
                .with_context(|| format!("Failed to create output directory: {}", dst_dir.display()))?;
        }
        let output_path = dst_dir.join("models.rs");
        fs::write(&output_path, code)
            .with_context(|| format!("Failed to write models file: {}", output_path.display()))?;

        Ok(CodegenResult {
            generator_name: self.generator_name().to_string(),
            files_generated: vec![output_path],
            success: true,
            message: format!("Generated {} models", registry.len()),
        })
    }
}
