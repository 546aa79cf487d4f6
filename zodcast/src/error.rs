//! Error types for schema conversion.

use thiserror::Error;

use crate::types::{Kind, Type};

/// Result type for conversion operations.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Errors that abort a conversion.
///
/// Every error is fatal: the converter never produces partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The type's kind has no schema mapping (channels, functions, ...).
    #[error("cannot handle kind `{kind}` of type `{type_name}`")]
    UnsupportedKind { kind: Kind, type_name: String },

    /// The type exposes a schema method of unrecognised shape.
    #[error("found a ZodSchema method on `{type_name}` with unexpected signature `{signature}`")]
    MalformedCustomSchema { type_name: String, signature: String },

    /// Strict mode found a self-marshaling type without a schema override.
    #[error("found type with custom marshalling but no custom schema: {type_name}")]
    StrictModeViolation { type_name: String },

    /// A named struct contains itself through its own fields.
    #[error("type `{type_name}` refers to itself; recursive schemas are not supported")]
    RecursiveType { type_name: String },

    /// A conversion root is not a struct.
    #[error("root type `{type_name}` is not a struct")]
    NonStructRoot { type_name: String },

    /// A custom emitter could not produce a schema.
    #[error("custom schema for `{type_name}` failed: {message}")]
    Custom { type_name: String, message: String },
}

impl ConvertError {
    pub(crate) fn unsupported(ty: Type<'_>) -> Self {
        Self::UnsupportedKind {
            kind: ty.kind(),
            type_name: ty.to_string(),
        }
    }

    /// Build a [`ConvertError::Custom`] for `ty`.
    ///
    /// Intended for custom emitters that reject the type they were given.
    pub fn custom(ty: Type<'_>, message: impl Into<String>) -> Self {
        Self::Custom {
            type_name: ty.to_string(),
            message: message.into(),
        }
    }
}
