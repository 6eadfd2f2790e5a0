//! Schema parser for GraphQL SDL documents

use super::types::{FieldDescriptor, Schema, TypeDescriptor, TypeKind, TypeRef};
use crate::error::{TiloresError, TiloresResult};
use graphql_parser::schema::{Definition, Document, Type, TypeDefinition};
use std::fs;
use std::path::Path;

/// Parser turning SDL text into a [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaParser;

impl SchemaParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a GraphQL schema file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> TiloresResult<Schema> {
        let content = fs::read_to_string(&path).map_err(|e| {
            TiloresError::schema(format!(
                "Failed to read schema file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        self.parse_schema(&content)
    }

    /// Parse GraphQL schema from string
    pub fn parse_schema(&self, content: &str) -> TiloresResult<Schema> {
        let document = graphql_parser::parse_schema::<String>(content)
            .map_err(|e| TiloresError::schema(format!("GraphQL parse error: {}", e)))?;

        Ok(self.process_document(&document))
    }

    fn process_document(&self, document: &Document<'_, String>) -> Schema {
        let mut schema = Schema::new();

        for definition in &document.definitions {
            match definition {
                Definition::SchemaDefinition(schema_def) => {
                    schema.query_type = schema_def.query.clone();
                    schema.mutation_type = schema_def.mutation.clone();
                }
                Definition::TypeDefinition(type_def) => {
                    schema.add_type(self.process_type_definition(type_def));
                }
                // Extensions and directive definitions carry nothing the client maps
                _ => {}
            }
        }

        if schema.query_type.is_none() && schema.contains_type("Query") {
            schema.query_type = Some("Query".to_string());
        }
        if schema.mutation_type.is_none() && schema.contains_type("Mutation") {
            schema.mutation_type = Some("Mutation".to_string());
        }

        schema
    }

    fn process_type_definition(&self, type_def: &TypeDefinition<'_, String>) -> TypeDescriptor {
        match type_def {
            TypeDefinition::Scalar(scalar) => {
                TypeDescriptor::new(TypeKind::Scalar, scalar.name.clone())
                    .with_description(scalar.description.clone())
            }
            TypeDefinition::Object(object) => {
                let mut descriptor = TypeDescriptor::new(TypeKind::Object, object.name.clone())
                    .with_description(object.description.clone());
                for field in &object.fields {
                    descriptor.add_field(self.field(&field.name, &field.field_type, &field.description));
                }
                descriptor
            }
            TypeDefinition::Interface(interface) => {
                let mut descriptor =
                    TypeDescriptor::new(TypeKind::Interface, interface.name.clone())
                        .with_description(interface.description.clone());
                for field in &interface.fields {
                    descriptor.add_field(self.field(&field.name, &field.field_type, &field.description));
                }
                descriptor
            }
            TypeDefinition::InputObject(input) => {
                let mut descriptor =
                    TypeDescriptor::new(TypeKind::InputObject, input.name.clone())
                        .with_description(input.description.clone());
                for field in &input.fields {
                    descriptor.add_field(self.field(&field.name, &field.value_type, &field.description));
                }
                descriptor
            }
            TypeDefinition::Union(union) => {
                let mut descriptor = TypeDescriptor::new(TypeKind::Union, union.name.clone())
                    .with_description(union.description.clone());
                descriptor.possible_types = union.types.clone();
                descriptor
            }
            TypeDefinition::Enum(enum_type) => {
                let mut descriptor = TypeDescriptor::new(TypeKind::Enum, enum_type.name.clone())
                    .with_description(enum_type.description.clone());
                descriptor.enum_values = enum_type.values.iter().map(|v| v.name.clone()).collect();
                descriptor
            }
        }
    }

    fn field(
        &self,
        name: &str,
        gql_type: &Type<'_, String>,
        description: &Option<String>,
    ) -> FieldDescriptor {
        let mut field = FieldDescriptor::new(name, Self::parse_type(gql_type));
        field.description = description.clone();
        field
    }

    fn parse_type(gql_type: &Type<'_, String>) -> TypeRef {
        match gql_type {
            Type::NamedType(name) => TypeRef::Named(name.clone()),
            Type::ListType(inner) => TypeRef::list(Self::parse_type(inner)),
            Type::NonNullType(inner) => TypeRef::non_null(Self::parse_type(inner)),
        }
    }
}

impl Schema {
    /// Build a schema from SDL text
    pub fn from_sdl(content: &str) -> TiloresResult<Schema> {
        SchemaParser::new().parse_schema(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_types() {
        let sdl = r#"
            "A single record"
            type Record {
                id: ID!
                firstName: String
                tags: [String!]
            }

            input RecordInput {
                id: ID!
                firstName: String
            }
        "#;

        let schema = Schema::from_sdl(sdl).unwrap();

        let record = schema.get_type("Record").unwrap();
        assert_eq!(record.kind, TypeKind::Object);
        assert_eq!(record.description.as_deref(), Some("A single record"));
        assert_eq!(record.field_names(), vec!["id", "firstName", "tags"]);
        assert_eq!(
            record.get_field("tags").unwrap().field_type,
            TypeRef::list(TypeRef::non_null(TypeRef::named("String")))
        );

        let input = schema.get_type("RecordInput").unwrap();
        assert_eq!(input.kind, TypeKind::InputObject);
        assert!(input.get_field("id").unwrap().field_type.is_non_null());
    }

    #[test]
    fn test_parse_enum_union_interface() {
        let sdl = r#"
            enum Season { SPRING SUMMER AUTUMN WINTER }
            interface Animal { name: String }
            type Coupon { code: String }
            type Voucher { amount: Float }
            union Discount = Coupon | Voucher
            scalar DateTime
        "#;

        let schema = Schema::from_sdl(sdl).unwrap();
        assert_eq!(
            schema.get_type("Season").unwrap().enum_values,
            vec!["SPRING", "SUMMER", "AUTUMN", "WINTER"]
        );
        assert_eq!(schema.get_type("Animal").unwrap().kind, TypeKind::Interface);
        assert_eq!(
            schema.get_type("Discount").unwrap().possible_types,
            vec!["Coupon", "Voucher"]
        );
        assert_eq!(schema.get_type("DateTime").unwrap().kind, TypeKind::Scalar);
    }

    #[test]
    fn test_query_root_detection() {
        let schema = Schema::from_sdl("type Query { ping: String }").unwrap();
        assert_eq!(schema.query_type.as_deref(), Some("Query"));
        assert!(schema.mutation_type.is_none());
    }

    #[test]
    fn test_parse_error() {
        let result = Schema::from_sdl("type Record {");
        assert!(matches!(result, Err(TiloresError::Schema { .. })));
    }
}
