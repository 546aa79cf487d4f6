//! Schema generator for producing TypeScript Zod schemas.
//!
//! Runs every manifest root through one [`Converter`] session so shared
//! nested types are emitted once, dependencies first.

use zodcast::manifest::LoadedTypes;
use zodcast::Converter;

use crate::config::Config;
use crate::error::{CliResult, GenerateError};

/// Generated output containing all schemas.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Complete TypeScript content.
    pub content: String,

    /// Individual generated schemas, in output order.
    pub schemas: Vec<GeneratedSchema>,
}

/// A single generated schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSchema {
    /// Struct name the schema was registered under.
    pub name: String,

    /// Schema constant name (e.g. "UserSchema").
    pub schema_name: String,

    /// TypeScript type name.
    pub type_name: String,
}

/// Schema generator driven by the CLI configuration.
pub struct SchemaGenerator {
    config: Config,
}

impl SchemaGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Convert every root of `loaded` and assemble the output file.
    pub fn generate(&self, loaded: &LoadedTypes) -> CliResult<GeneratedOutput> {
        if loaded.roots.is_empty() {
            return Ok(GeneratedOutput {
                content: self.generate_output(""),
                schemas: Vec::new(),
            });
        }

        let custom = self.config.custom_registry()?;
        let mut converter = Converter::new(&loaded.types)
            .with_options(self.config.converter_options())
            .with_custom(custom);

        let body = converter
            .convert_all(&loaded.roots)
            .map_err(GenerateError::from)?;

        let schemas = converter
            .entries()
            .into_iter()
            .map(|entry| GeneratedSchema {
                name: entry.name.clone(),
                schema_name: converter.schema_name(&entry.name),
                type_name: format!("{}{}", converter.prefix(), entry.name),
            })
            .collect();

        Ok(GeneratedOutput {
            content: self.generate_output(&body),
            schemas,
        })
    }

    /// Header, optional import and schema body.
    fn generate_output(&self, body: &str) -> String {
        let mut output = String::new();

        output.push_str("// Auto-generated by zodcast\n");
        output.push_str("// Do not edit manually\n\n");

        if self.config.output.include_import {
            output.push_str("import { z } from \"zod\"\n\n");
        }

        output.push_str(body);
        output
    }
}
