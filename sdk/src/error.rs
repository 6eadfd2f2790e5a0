//! Error types for schema mapping, selection building and validation

use thiserror::Error;

/// Errors raised by the schema-driven parts of the client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TiloresError {
    /// A type name that the schema does not declare
    #[error("Cannot get type in schema for: '{name}'")]
    UnknownType { name: String },

    /// A scalar without a host primitive
    #[error("Unsupported scalar type '{name}'")]
    UnsupportedScalar { name: String },

    /// A type kind that cannot be mapped where it was found
    #[error("Unmatched case for GraphQL type '{name}' of kind {kind}")]
    UnsupportedKind { name: String, kind: String },

    /// A field name that is not part of the target type
    #[error("Unknown field '{field}' on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    /// A mask value whose shape does not match the mask type
    #[error("Invalid mask value for '{type_name}.{field}': {reason}")]
    InvalidMask {
        type_name: String,
        field: String,
        reason: String,
    },

    /// The schema itself could not be read
    #[error("Schema error: {reason}")]
    Schema { reason: String },
}

impl TiloresError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        TiloresError::UnknownType { name: name.into() }
    }

    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        TiloresError::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn invalid_mask(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TiloresError::InvalidMask {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        TiloresError::Schema {
            reason: reason.into(),
        }
    }

    /// Whether this error came from mapping the schema's type graph
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            TiloresError::UnknownType { .. }
                | TiloresError::UnsupportedScalar { .. }
                | TiloresError::UnsupportedKind { .. }
        )
    }

    /// Whether this error came from checking a field name or mask value
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            TiloresError::UnknownField { .. } | TiloresError::InvalidMask { .. }
        )
    }
}

/// Result type for schema-driven operations
pub type TiloresResult<T> = Result<T, TiloresError>;
