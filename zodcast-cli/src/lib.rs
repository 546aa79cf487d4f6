//! # zodcast-cli
//!
//! Library behind the `zodcast` binary: discovers Go type manifests, loads
//! them into one type set, converts every declared root and writes the
//! resulting TypeScript file.
//!
//! - [`config`] - `zodcast.toml` loading and CLI overrides
//! - [`scanner`] - manifest discovery and filtering
//! - [`loader`] - manifest parsing and cross-file resolution
//! - [`generator`] - schema generation
//! - [`writer`] - file output, dry runs and up-to-date checks
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod logging;
pub mod scanner;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::SchemaGenerator;
pub use loader::load_manifests;
pub use scanner::{ManifestFile, ManifestScanner};
pub use writer::FileWriter;
