//! Mapping of schema types into host types
//!
//! A [`TypeMapper`] session walks the schema from its root types and
//! registers one [`MappedType`] per reachable schema type in a
//! [`TypeRegistry`]. The registry can then be rendered as Rust source by
//! the [`ModelCodeGenerator`].

pub mod codegen;
pub mod mapper;
pub mod types;

pub use codegen::ModelCodeGenerator;
pub use mapper::{ROOT_TYPES, TypeMapper};
pub use types::{
    EnumType, HostType, MappedField, MappedType, Primitive, RecordKind, RecordType, TypeId,
    TypeRegistry, UnionType,
};
