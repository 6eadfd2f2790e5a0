//! Schema-driven GraphQL client for Tilores entity resolution
//!
//! The crate turns a Tilores GraphQL schema into host types
//! ([`mapping`]), derives selection masks from them ([`selection::mask`])
//! and uses both to build minimal search and entity queries that the
//! [`TiloresClient`] sends to an instance.

pub mod client;
pub mod codegen;
pub mod error;
pub mod mapping;
pub mod schema;
pub mod selection;
pub mod testing;

pub use client::{
    AccessToken, ClientConfig, ClientCredentials, Clock, CredentialCell, GraphQLRequest,
    HttpTransport, SchemaContext, SystemClock, TiloresClient, TokenSource, Transport,
};
pub use error::{TiloresError, TiloresResult};
pub use mapping::{HostType, MappedType, Primitive, TypeId, TypeMapper, TypeRegistry};
pub use schema::{Schema, TypeDescriptor, TypeKind, TypeRef};
pub use selection::{
    Direction, MaskInstance, MaskSet, Operation, RecordInsights, Selection, Value, project,
};

// Re-export async_trait macro for implementing Transport and TokenSource
pub use async_trait::async_trait;

// Re-export codegen components for build scripts
pub use codegen::{CodeGenerator, Codegen, CodegenResult, codegen};
