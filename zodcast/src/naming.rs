//! Field naming conventions for fields without an explicit tag name.

use std::fmt;
use std::str::FromStr;

use convert_case::{Case, Casing};

/// Rename rule applied to raw field names that carry no explicit JSON name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FieldNaming {
    /// Keep the declared field name.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "as-declared"))]
    AsDeclared,

    /// camelCase
    #[cfg_attr(feature = "serde", serde(rename = "camelCase"))]
    CamelCase,

    /// snake_case
    #[cfg_attr(feature = "serde", serde(rename = "snake_case"))]
    SnakeCase,

    /// PascalCase
    #[cfg_attr(feature = "serde", serde(rename = "PascalCase"))]
    PascalCase,

    /// SCREAMING_SNAKE_CASE
    #[cfg_attr(feature = "serde", serde(rename = "SCREAMING_SNAKE_CASE"))]
    ScreamingSnakeCase,

    /// kebab-case
    #[cfg_attr(feature = "serde", serde(rename = "kebab-case"))]
    KebabCase,
}

impl FieldNaming {
    /// All conventions, in declaration order.
    pub const ALL: [FieldNaming; 6] = [
        FieldNaming::AsDeclared,
        FieldNaming::CamelCase,
        FieldNaming::SnakeCase,
        FieldNaming::PascalCase,
        FieldNaming::ScreamingSnakeCase,
        FieldNaming::KebabCase,
    ];

    /// Apply the convention to a raw field name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            FieldNaming::AsDeclared => name.to_string(),
            FieldNaming::CamelCase => name.to_case(Case::Camel),
            FieldNaming::SnakeCase => name.to_case(Case::Snake),
            FieldNaming::PascalCase => name.to_case(Case::Pascal),
            FieldNaming::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            FieldNaming::KebabCase => name.to_case(Case::Kebab),
        }
    }

    /// Config spelling of the convention.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldNaming::AsDeclared => "as-declared",
            FieldNaming::CamelCase => "camelCase",
            FieldNaming::SnakeCase => "snake_case",
            FieldNaming::PascalCase => "PascalCase",
            FieldNaming::ScreamingSnakeCase => "SCREAMING_SNAKE_CASE",
            FieldNaming::KebabCase => "kebab-case",
        }
    }
}

impl fmt::Display for FieldNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown naming convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field naming `{0}` (expected one of: as-declared, camelCase, snake_case, PascalCase, SCREAMING_SNAKE_CASE, kebab-case)")]
pub struct UnknownFieldNaming(pub String);

impl FromStr for FieldNaming {
    type Err = UnknownFieldNaming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldNaming::ALL
            .into_iter()
            .find(|naming| naming.as_str() == s)
            .ok_or_else(|| UnknownFieldNaming(s.to_string()))
    }
}
