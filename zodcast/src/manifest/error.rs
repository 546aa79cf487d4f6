//! Manifest loading errors.

use thiserror::Error;

use super::expr::ExprError;

/// Result type for manifest operations.
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Errors raised while reading manifests into a type set.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid JSON manifest {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML manifest {source_name}: {source}")]
    Toml {
        source_name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{source_name}: type `{type_name}`: bad type expression `{expr}` {error}")]
    Expr {
        source_name: String,
        type_name: String,
        expr: String,
        error: ExprError,
    },

    #[error("{source_name}: type `{type_name}` refers to unknown type `{reference}`")]
    UnknownType {
        source_name: String,
        type_name: String,
        reference: String,
    },

    #[error("{source_name}: type `{package}.{name}` is already defined in {first}")]
    DuplicateType {
        source_name: String,
        package: String,
        name: String,
        first: String,
    },

    #[error("{source_name}: type `{type_name}` needs exactly one of `fields` or `underlying`")]
    MissingShape {
        source_name: String,
        type_name: String,
    },

    #[error("{source_name}: type `{type_name}` uses unknown schema preset `{preset}`")]
    UnknownPreset {
        source_name: String,
        type_name: String,
        preset: String,
    },
}
