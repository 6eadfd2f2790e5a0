//! GraphQL schema type descriptors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Built-in GraphQL scalars that every schema implicitly declares
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "ID", "Int", "Float", "Boolean"];

/// Kind of a named schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    /// Any kind this client does not understand
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
            TypeKind::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

/// Reference to a type as used by a field, including its wrappers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Name of the innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// A field (or input field) declared on a composite type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: TypeRef,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
        }
    }
}

/// The schema's own description of a named type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub name: String,
    pub description: Option<String>,
    /// Fields in declaration order (objects, interfaces and input objects)
    pub fields: Vec<FieldDescriptor>,
    /// Enum values in declaration order
    pub enum_values: Vec<String>,
    /// Union member type names in declaration order
    pub possible_types: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            fields: Vec::new(),
            enum_values: Vec::new(),
            possible_types: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn add_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Object | TypeKind::Interface | TypeKind::InputObject
        )
    }
}

/// A complete GraphQL schema, keyed by type name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    types: HashMap<String, TypeDescriptor>,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
}

impl Schema {
    /// Create a schema containing only the built-in scalars
    pub fn new() -> Self {
        let mut schema = Self::default();
        for name in BUILTIN_SCALARS {
            schema.add_type(TypeDescriptor::new(TypeKind::Scalar, name));
        }
        schema
    }

    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Look up a type by name
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All type names, sorted for stable output
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::named("Record")));
        assert_eq!(ty.to_string(), "[Record]!");
        assert_eq!(ty.base_name(), "Record");
        assert!(ty.is_non_null());
    }

    #[test]
    fn test_new_schema_has_builtin_scalars() {
        let schema = Schema::new();
        for name in BUILTIN_SCALARS {
            assert_eq!(schema.get_type(name).map(|t| t.kind), Some(TypeKind::Scalar));
        }
        assert!(schema.get_type("DateTime").is_none());
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let kind: TypeKind = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(kind, TypeKind::Unknown);
        let kind: TypeKind = serde_json::from_str("\"INPUT_OBJECT\"").unwrap();
        assert_eq!(kind, TypeKind::InputObject);
    }
}
