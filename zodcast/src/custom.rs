//! Custom schema overrides.
//!
//! Types can take over their own schema in two ways, checked in this order:
//!
//! 1. A [`CustomRegistry`] entry keyed by the type's qualified identity
//!    (`package/path.Name`).
//! 2. A [`SelfSchema`] attached to the named type itself.
//!
//! Custom types also decide their own nullability: the converter never
//! appends `.nullable()` to a field whose type is overridden.
//!
//! ```rust
//! use zodcast::custom::CustomRegistry;
//! use zodcast::types::{FieldDef, Kind, TypeSet};
//! use zodcast::Converter;
//!
//! let mut types = TypeSet::new();
//! let int = types.basic(Kind::Int);
//! let money = types.named("example.com/billing", "Money", int);
//! let invoice = types.named_struct(
//!     "example.com/billing",
//!     "Invoice",
//!     vec![FieldDef::new("Total", money).with_tag(r#"json:"total""#)],
//! );
//!
//! let mut custom = CustomRegistry::new();
//! custom.constant("example.com/billing.Money", "z.string()");
//!
//! let output = Converter::new(&types)
//!     .with_custom(custom)
//!     .convert(invoice)
//!     .unwrap();
//! assert!(output.contains("total: z.string(),"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::converter::Converter;
use crate::error::Result;
use crate::types::Type;

/// Package of the well-known timestamp type.
pub const TIME_PACKAGE: &str = "time";
/// Name of the well-known timestamp type.
pub const TIME_NAME: &str = "Time";
/// Identity of the well-known timestamp type.
pub const TIME_IDENTITY: &str = "time.Time";

/// Context-aware schema emitter.
///
/// Receives the converter, the type, the proposed schema name, the generic
/// argument string (empty for non-generic types) and the indent level.
pub type CustomFn = Arc<
    dyn for<'t> Fn(&mut Converter<'t>, Type<'t>, &str, &str, usize) -> Result<String>
        + Send
        + Sync,
>;

/// Recursive conversion entry point handed to [`CallbackFn`]s.
pub type ConvertFn<'a, 't> = dyn FnMut(Type<'t>, &str, usize) -> Result<String> + 'a;

/// Callback-aware schema emitter.
///
/// Like [`CustomFn`] but only gets a conversion callback instead of the whole
/// converter.
pub type CallbackFn = Arc<
    dyn for<'a, 't> Fn(&mut ConvertFn<'a, 't>, Type<'t>, &str, &str, usize) -> Result<String>
        + Send
        + Sync,
>;

/// Schema a named type provides for itself.
#[derive(Clone)]
pub enum SelfSchema {
    /// Fixed schema text.
    Constant(String),
    /// Context-aware emitter.
    Dynamic(CustomFn),
    /// Emitter that recurses through a conversion callback.
    Callback(CallbackFn),
    /// A schema method with an unrecognised shape. Converting the type fails.
    Malformed { signature: String },
}

impl SelfSchema {
    pub fn constant(schema: impl Into<String>) -> Self {
        Self::Constant(schema.into())
    }

    pub fn dynamic<F>(emit: F) -> Self
    where
        F: for<'t> Fn(&mut Converter<'t>, Type<'t>, &str, &str, usize) -> Result<String>
            + Send
            + Sync
            + 'static,
    {
        Self::Dynamic(Arc::new(emit))
    }

    pub fn callback<F>(emit: F) -> Self
    where
        F: for<'a, 't> Fn(&mut ConvertFn<'a, 't>, Type<'t>, &str, &str, usize) -> Result<String>
            + Send
            + Sync
            + 'static,
    {
        Self::Callback(Arc::new(emit))
    }

    pub fn malformed(signature: impl Into<String>) -> Self {
        Self::Malformed {
            signature: signature.into(),
        }
    }
}

impl fmt::Debug for SelfSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(schema) => f.debug_tuple("Constant").field(schema).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Malformed { signature } => f
                .debug_struct("Malformed")
                .field("signature", signature)
                .finish(),
        }
    }
}

/// Registry identity of a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub package: String,
    /// Name with any generic arguments removed.
    pub name: String,
    /// Generic argument list without brackets; empty for non-generic types.
    pub generic: String,
}

impl QualifiedName {
    /// Split `Name[Args]` into base name and generic arguments.
    pub fn new(package: &str, name: &str) -> Self {
        let (base, generic) = match name.strip_suffix(']').and_then(|n| n.split_once('[')) {
            Some((base, generic)) if !base.is_empty() => (base, generic),
            _ => (name, ""),
        };
        Self {
            package: package.to_string(),
            name: base.to_string(),
            generic: generic.to_string(),
        }
    }

    /// `package.Name`, the key used by [`CustomRegistry`].
    pub fn identity(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    pub fn is_generic(&self) -> bool {
        !self.generic.is_empty()
    }
}

/// Emitters keyed by qualified type identity.
#[derive(Clone, Default)]
pub struct CustomRegistry {
    emitters: HashMap<String, CustomFn>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an emitter for `identity`, replacing any previous one.
    pub fn insert<F>(&mut self, identity: impl Into<String>, emit: F) -> &mut Self
    where
        F: for<'t> Fn(&mut Converter<'t>, Type<'t>, &str, &str, usize) -> Result<String>
            + Send
            + Sync
            + 'static,
    {
        self.insert_fn(identity, Arc::new(emit))
    }

    /// Register an already shared emitter.
    pub fn insert_fn(&mut self, identity: impl Into<String>, emit: CustomFn) -> &mut Self {
        self.emitters.insert(identity.into(), emit);
        self
    }

    /// Register a fixed schema for `identity`.
    pub fn constant(&mut self, identity: impl Into<String>, schema: impl Into<String>) -> &mut Self {
        let schema = schema.into();
        self.insert(identity, move |_, _, _, _, _| Ok(schema.clone()))
    }

    pub fn get(&self, identity: &str) -> Option<&CustomFn> {
        self.emitters.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.emitters.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<&str> {
        let mut identities: Vec<&str> = self.emitters.keys().map(String::as_str).collect();
        identities.sort_unstable();
        identities
    }

    /// Merge another registry into this one. Entries of `other` win.
    pub fn extend(&mut self, other: CustomRegistry) {
        self.emitters.extend(other.emitters);
    }
}

impl fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("identities", &self.identities())
            .finish()
    }
}
