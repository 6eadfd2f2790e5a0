//! Async client for a Tilores instance
//!
//! [`TiloresClient`] ties the pieces together: a [`Transport`] that sends
//! requests, a [`CredentialCell`] that keeps an access token fresh and a
//! [`SchemaContext`] derived once from the instance's schema.

pub mod api;
pub mod config;
pub mod credentials;
pub mod transport;

pub use api::{SchemaContext, TiloresClient, entity_operation, search_operation};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use credentials::{
    AccessToken, ClientCredentials, Clock, CredentialCell, DEFAULT_SCOPES, SystemClock,
    TokenSource,
};
pub use transport::{GraphQLRequest, HttpTransport, Transport};
