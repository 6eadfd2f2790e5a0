//! In-memory collaborators for testing code built on [`TiloresClient`]
//!
//! - [`MemoryTransport`] records requests and replays canned responses
//! - [`StaticTokenSource`] counts token fetches
//! - [`ManualClock`] lets a test move time forward to expire tokens
//!
//! ```rust,ignore
//! use tilores_sdk::testing::{MemoryTransport, StaticTokenSource};
//! use tilores_sdk::{CredentialCell, Schema, TiloresClient};
//!
//! let client = TiloresClient::new(
//!     MemoryTransport::new(),
//!     CredentialCell::new(StaticTokenSource::new(3600)),
//! )
//! .with_schema(Schema::from_sdl(SDL)?)?;
//! ```
//!
//! [`TiloresClient`]: crate::client::TiloresClient

pub mod memory_transport;
pub mod static_token;

pub use memory_transport::MemoryTransport;
pub use static_token::{ManualClock, StaticTokenSource};
