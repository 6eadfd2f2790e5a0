//! GraphQL schema model: type descriptors loaded from SDL or introspection

pub mod introspection;
pub mod parser;
pub mod types;

pub use introspection::INTROSPECTION_QUERY;
pub use parser::SchemaParser;
pub use types::{BUILTIN_SCALARS, FieldDescriptor, Schema, TypeDescriptor, TypeKind, TypeRef};
