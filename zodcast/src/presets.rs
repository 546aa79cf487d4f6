//! Ready-made schema overrides for common third-party types.

use std::fmt;
use std::str::FromStr;

use crate::converter::proposed_name;
use crate::custom::{CustomRegistry, SelfSchema};
use crate::error::ConvertError;

/// `github.com/shopspring/decimal.Decimal`, serialized as a string.
pub const DECIMAL_IDENTITY: &str = "github.com/shopspring/decimal.Decimal";

/// `4d63.com/optional.Optional[T]`, an element that may be absent.
pub const OPTIONAL_IDENTITY: &str = "4d63.com/optional.Optional";

/// Registry presets selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Decimal,
    Optional,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Decimal, Preset::Optional];

    /// Identity the preset is registered under.
    pub fn identity(self) -> &'static str {
        match self {
            Preset::Decimal => DECIMAL_IDENTITY,
            Preset::Optional => OPTIONAL_IDENTITY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Decimal => "decimal",
            Preset::Optional => "optional",
        }
    }

    /// Add the preset's emitter to `registry`.
    pub fn install(self, registry: &mut CustomRegistry) {
        match self {
            Preset::Decimal => decimal(registry),
            Preset::Optional => optional(registry),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}` (expected one of: decimal, optional)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Decimal numbers serialize to strings.
pub fn decimal(registry: &mut CustomRegistry) {
    registry.constant(DECIMAL_IDENTITY, "z.string()");
}

/// The element schema followed by `.optional()`.
pub fn optional(registry: &mut CustomRegistry) {
    registry.insert(OPTIONAL_IDENTITY, |converter, ty, name, _generic, indent| {
        let elem = ty
            .elem()
            .ok_or_else(|| ConvertError::custom(ty, "optional values need an element type"))?;
        Ok(format!(
            "{}.optional()",
            converter.convert_type(elem, name, indent)?
        ))
    });
}

/// Self-schema for set types backed by a map: marshals as a list of keys.
///
/// Struct keys register under their own name, not the one proposed for the
/// set's empty value type.
pub fn set() -> SelfSchema {
    SelfSchema::dynamic(|converter, ty, _name, _generic, indent| {
        let key = ty
            .key()
            .ok_or_else(|| ConvertError::custom(ty, "sets need a map key type"))?;
        let name = proposed_name(key);
        Ok(format!("{}.array()", converter.convert_type(key, &name, indent)?))
    })
}

/// Self-schema with fixed text, e.g. an enum that marshals as a string.
pub fn constant(schema: impl Into<String>) -> SelfSchema {
    SelfSchema::constant(schema)
}

/// Self-schemas selectable by name in a manifest.
pub fn self_schema(name: &str) -> Option<SelfSchema> {
    match name {
        "set" => Some(set()),
        "decimal" => Some(constant("z.string()")),
        _ => None,
    }
}
