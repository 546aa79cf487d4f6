//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `zodcast.toml` files
//! and merging with command-line arguments.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use zodcast::presets::Preset;
use zodcast::{ConverterOptions, CustomRegistry, FieldNaming};

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "zodcast.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Naming conventions.
    pub naming: NamingConfig,

    /// Conversion switches.
    pub conversion: ConversionConfig,

    /// Schema overrides for third-party types.
    pub custom: CustomConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Output filename.
    pub file: String,

    /// Whether to start the file with `import { z } from "zod"`.
    pub include_import: bool,
}

/// Naming convention configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Prepended to every schema and type name.
    pub prefix: String,

    /// Rename convention for fields without a JSON name.
    pub field_naming: FieldNaming,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Fail on types with custom JSON marshalling but no schema override.
    pub strict_custom_schemas: bool,
}

/// Custom schema configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomConfig {
    /// Built-in presets to enable (`decimal`, `optional`).
    pub presets: Vec<String>,

    /// Fixed schemas keyed by type identity, e.g.
    /// `"github.com/google/uuid.UUID" = "z.string().uuid()"`.
    pub types: BTreeMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            file: "schemas.ts".to_string(),
            include_import: true,
        }
    }
}

impl Config {
    /// Path of the generated file.
    pub fn output_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.file)
    }

    /// Engine options for a conversion session.
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            prefix: self.naming.prefix.clone(),
            strict_custom_schemas: self.conversion.strict_custom_schemas,
            field_naming: self.naming.field_naming,
        }
    }

    /// Build the custom registry from enabled presets and fixed schemas.
    ///
    /// Fixed schemas are installed after presets and replace them on a
    /// shared identity.
    pub fn custom_registry(&self) -> Result<CustomRegistry, ConfigError> {
        let mut registry = CustomRegistry::new();
        for name in &self.custom.presets {
            let preset: Preset = name
                .parse()
                .map_err(|e: zodcast::presets::UnknownPreset| {
                    ConfigError::invalid_value("custom.presets", e.to_string())
                })?;
            preset.install(&mut registry);
        }
        for (identity, schema) in &self.custom.types {
            if schema.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("custom.types.\"{identity}\""),
                    "schema must not be empty",
                ));
            }
            registry.constant(identity.as_str(), schema.as_str());
        }
        Ok(registry)
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `zodcast.toml` in the working directory is used when
    /// present and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into())
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!("no {CONFIG_FILENAME}, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::parse(&config_path, &content)?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration text; `path` labels errors.
    pub fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(include_import) = args.include_import {
            config.output.include_import = include_import;
        }

        if let Some(ref prefix) = args.prefix {
            config.naming.prefix = prefix.clone();
        }

        if let Some(field_naming) = args.field_naming {
            config.naming.field_naming = field_naming;
        }

        if let Some(strict) = args.strict_custom_schemas {
            config.conversion.strict_custom_schemas = strict;
        }

        config
    }

    /// Default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# zodcast configuration file

[output]
# Output directory for generated TypeScript files
dir = "./generated"

# Output file name
file = "schemas.ts"

# Start the file with `import { z } from "zod"`
include_import = true

[naming]
# Prepended to every schema and type name (e.g. "Api" gives ApiUserSchema)
prefix = ""

# Rename convention for fields without a JSON name
# (as-declared, camelCase, snake_case, PascalCase, SCREAMING_SNAKE_CASE, kebab-case)
field_naming = "as-declared"

[conversion]
# Fail on types with custom JSON marshalling but no schema override
strict_custom_schemas = false

[custom]
# Built-in overrides (decimal, optional)
presets = []

# Fixed schemas keyed by type identity
[custom.types]
# "github.com/google/uuid.UUID" = "z.string().uuid()"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Import header override.
    pub include_import: Option<bool>,

    /// Name prefix override.
    pub prefix: Option<String>,

    /// Field naming override.
    pub field_naming: Option<FieldNaming>,

    /// Strict mode override.
    pub strict_custom_schemas: Option<bool>,
}
