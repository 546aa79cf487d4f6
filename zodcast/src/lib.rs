//! # zodcast
//!
//! Translate Go-style type models into TypeScript [Zod](https://zod.dev/)
//! schemas.
//!
//! ## Overview
//!
//! A host program's types (structs with `json` tags, pointers, slices,
//! arrays, maps, interfaces and named types) are described in a
//! [`TypeSet`](types::TypeSet). The [`Converter`] walks a root struct and emits
//! a Zod object schema plus a matching inferred type alias for it and for
//! every named struct it reaches, dependencies first.
//!
//! ## Quick Start
//!
//! ```rust
//! use zodcast::types::{FieldDef, Kind, TypeSet};
//! use zodcast::struct_to_zod_schema;
//!
//! let mut types = TypeSet::new();
//! let string = types.basic(Kind::String);
//! let int = types.basic(Kind::Int);
//! let email = types.pointer(string);
//! let user = types.named_struct(
//!     "example.com/app",
//!     "User",
//!     vec![
//!         FieldDef::new("Name", string),
//!         FieldDef::new("Age", int),
//!         FieldDef::new("Email", email).with_tag(r#"json:"email,omitempty""#),
//!     ],
//! );
//!
//! assert_eq!(
//!     struct_to_zod_schema(&types, user).unwrap(),
//!     r#"export const UserSchema = z.object({
//!   Name: z.string(),
//!   Age: z.number(),
//!   email: z.string().optional(),
//! })
//! export type User = z.infer<typeof UserSchema>
//!
//! "#
//! );
//! ```
//!
//! ## Modifiers
//!
//! | Field | Zod |
//! |-------|-----|
//! | `T` | schema of `T` |
//! | `*T` | `.nullable()` |
//! | `*T` with `omitempty` | `.optional()` |
//! | `[]T`, `map[K]V` | `.nullable()` |
//! | `[]T`, `map[K]V` with `omitempty` | `.optional()` |
//! | `interface{}` | `z.any()`, never modified |
//! | struct value | never modified |
//!
//! ## Type Mappings
//!
//! | Go Type | Zod Schema |
//! |---------|------------|
//! | `bool` | `z.boolean()` |
//! | integers, floats, complex | `z.number()` |
//! | `string` | `z.string()` |
//! | `[]byte` | `z.string()` |
//! | `time.Time` | `z.string()` |
//! | `[]T`, `[N]T` | `T.array()` |
//! | `map[K]V` | `z.record(K, V)` |
//! | anonymous struct | inline `z.object({ ... })` |
//! | named struct | `NameSchema` reference |
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `serde` | Deserialize [`ConverterOptions`] and [`FieldNaming`] | ✅ |
//! | `manifest` | Load type sets from JSON / TOML manifests | ✅ |
//!
//! Custom overrides are described in [`custom`], ready-made ones in
//! [`presets`].

pub mod classify;
pub mod converter;
pub mod custom;
pub mod error;
pub mod fields;
pub mod naming;
pub mod presets;
pub mod registry;
pub mod tag;
pub mod types;

#[cfg(feature = "manifest")]
pub mod manifest;

pub use converter::{Converter, ConverterOptions};
pub use custom::{CustomFn, CustomRegistry, SelfSchema};
pub use error::{ConvertError, Result};
pub use naming::FieldNaming;
pub use registry::{SchemaEntry, SchemaRegistry};
pub use types::{Kind, Type, TypeKey, TypeSet};

/// Convert one root struct with default options.
pub fn struct_to_zod_schema(types: &TypeSet, root: TypeKey) -> Result<String> {
    Converter::new(types).convert(root)
}

/// Convert one root struct, prefixing every schema and type name.
pub fn struct_to_zod_schema_with_prefix(
    prefix: &str,
    types: &TypeSet,
    root: TypeKey,
) -> Result<String> {
    Converter::new(types).with_prefix(prefix).convert(root)
}
