//! Serialized type models.
//!
//! A manifest describes the types of one package in JSON or TOML, with Go
//! syntax for type expressions:
//!
//! ```json
//! {
//!   "package": "example.com/app",
//!   "roots": ["User"],
//!   "types": [
//!     { "name": "User", "fields": [
//!         { "name": "Email", "type": "*string", "tag": "json:\"email,omitempty\"" },
//!         { "name": "State", "type": "State" } ] },
//!     { "name": "State", "underlying": "int", "marshals_json": true,
//!       "zod_schema": { "constant": "z.string()" } }
//!   ]
//! }
//! ```
//!
//! Several manifests can be loaded into one [`TypeSet`]. Every type is
//! declared before any body is built, so references may point across files,
//! forwards, or back at the type itself.
//!
//! ```rust
//! use zodcast::manifest::ManifestSet;
//! use zodcast::Converter;
//!
//! let mut set = ManifestSet::new();
//! set.add_json(
//!     "app.json",
//!     r#"{ "package": "app", "roots": ["User"],
//!          "types": [{ "name": "User", "fields": [{ "name": "Name", "type": "string" }] }] }"#,
//! )
//! .unwrap();
//!
//! let loaded = set.load().unwrap();
//! let output = Converter::new(&loaded.types).convert_all(&loaded.roots).unwrap();
//! assert!(output.starts_with("export const UserSchema = z.object({"));
//! ```

mod error;
pub mod expr;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::custom::SelfSchema;
use crate::presets;
use crate::types::{FieldDef, TypeKey, TypeSet};

pub use error::{ManifestError, ManifestResult};
use expr::{parse_type, FieldExpr, TypeExpr};

/// Types of one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Package path of the types declared here.
    #[serde(default)]
    pub package: String,
    /// Type expressions converted as roots, in order.
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// A named type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Declared name, including generic arguments for instantiations.
    pub name: String,
    /// Overrides the manifest package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Struct fields. Mutually exclusive with `underlying`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDecl>>,
    /// Underlying type expression of a non-struct named type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,
    #[serde(default)]
    pub marshals_json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zod_schema: Option<SchemaDecl>,
}

/// A struct field. A field without a name is embedded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub embedded: bool,
}

/// Schema a named type provides for itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaDecl {
    /// Fixed schema text.
    Constant(String),
    /// A named preset, see [`presets::self_schema`].
    Preset(String),
    /// A schema method of unrecognised shape; converting the type fails.
    Method(String),
}

/// Manifest file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl Manifest {
    pub fn from_json(source_name: &str, text: &str) -> ManifestResult<Self> {
        serde_json::from_str(text).map_err(|source| ManifestError::Json {
            source_name: source_name.to_string(),
            source,
        })
    }

    pub fn from_toml(source_name: &str, text: &str) -> ManifestResult<Self> {
        toml::from_str(text).map_err(|source| ManifestError::Toml {
            source_name: source_name.to_string(),
            source,
        })
    }

    pub fn parse(source_name: &str, text: &str, format: ManifestFormat) -> ManifestResult<Self> {
        match format {
            ManifestFormat::Json => Self::from_json(source_name, text),
            ManifestFormat::Toml => Self::from_toml(source_name, text),
        }
    }
}

/// A type set built from manifests, with the roots they declare.
#[derive(Debug)]
pub struct LoadedTypes {
    pub types: TypeSet,
    /// Roots in manifest order.
    pub roots: Vec<TypeKey>,
}

/// Collects manifests and loads them into one [`TypeSet`].
#[derive(Debug, Default)]
pub struct ManifestSet {
    manifests: Vec<(String, Manifest)>,
}

impl ManifestSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Queue a parsed manifest. `source_name` labels errors.
    pub fn add(&mut self, source_name: impl Into<String>, manifest: Manifest) {
        self.manifests.push((source_name.into(), manifest));
    }

    pub fn add_json(&mut self, source_name: impl Into<String>, text: &str) -> ManifestResult<()> {
        self.add_str(source_name, text, ManifestFormat::Json)
    }

    pub fn add_toml(&mut self, source_name: impl Into<String>, text: &str) -> ManifestResult<()> {
        self.add_str(source_name, text, ManifestFormat::Toml)
    }

    pub fn add_str(
        &mut self,
        source_name: impl Into<String>,
        text: &str,
        format: ManifestFormat,
    ) -> ManifestResult<()> {
        let source_name = source_name.into();
        let manifest = Manifest::parse(&source_name, text, format)?;
        self.add(source_name, manifest);
        Ok(())
    }

    /// Build the type set.
    pub fn load(&self) -> ManifestResult<LoadedTypes> {
        let mut types = TypeSet::new();
        types.time();

        let mut origins: HashMap<(String, String), &str> = HashMap::new();
        let mut declared = Vec::new();
        for (source_name, manifest) in &self.manifests {
            for decl in &manifest.types {
                let package = decl.package.as_deref().unwrap_or(&manifest.package);
                let id = (package.to_string(), decl.name.clone());
                if let Some(first) = origins.get(&id) {
                    return Err(ManifestError::DuplicateType {
                        source_name: source_name.clone(),
                        package: id.0,
                        name: id.1,
                        first: first.to_string(),
                    });
                }
                let key = types.declare(package, decl.name.as_str());
                origins.insert(id, source_name.as_str());
                declared.push((key, package, source_name.as_str(), decl));
            }
        }

        for (key, package, source_name, decl) in declared {
            let ctx = Context {
                source_name,
                type_name: &decl.name,
                package,
            };
            let body = match (&decl.fields, &decl.underlying) {
                (Some(fields), None) => ctx.lower_fields(&mut types, fields)?,
                (None, Some(underlying)) => {
                    let expr = ctx.parse(underlying)?;
                    ctx.lower(&mut types, &expr)?
                }
                _ => {
                    return Err(ManifestError::MissingShape {
                        source_name: source_name.to_string(),
                        type_name: decl.name.clone(),
                    })
                }
            };
            types.define(key, body);
            types.set_marshals_json(key, decl.marshals_json);
            if let Some(schema) = &decl.zod_schema {
                types.set_self_schema(key, ctx.self_schema(schema)?);
            }
        }

        let mut roots = Vec::new();
        for (source_name, manifest) in &self.manifests {
            let ctx = Context {
                source_name,
                type_name: "<roots>",
                package: &manifest.package,
            };
            for root in &manifest.roots {
                let expr = ctx.parse(root)?;
                roots.push(ctx.lower(&mut types, &expr)?);
            }
            tracing::debug!(
                source = %source_name,
                types = manifest.types.len(),
                roots = manifest.roots.len(),
                "loaded manifest"
            );
        }

        Ok(LoadedTypes { types, roots })
    }
}

/// Where an expression is being lowered, for name resolution and errors.
struct Context<'a> {
    source_name: &'a str,
    type_name: &'a str,
    package: &'a str,
}

impl Context<'_> {
    fn parse(&self, src: &str) -> ManifestResult<TypeExpr> {
        parse_type(src).map_err(|error| ManifestError::Expr {
            source_name: self.source_name.to_string(),
            type_name: self.type_name.to_string(),
            expr: src.to_string(),
            error,
        })
    }

    fn lower(&self, types: &mut TypeSet, expr: &TypeExpr) -> ManifestResult<TypeKey> {
        Ok(match expr {
            TypeExpr::Basic(kind) => types.basic(*kind),
            TypeExpr::Pointer(elem) => {
                let elem = self.lower(types, elem)?;
                types.pointer(elem)
            }
            TypeExpr::Slice(elem) => {
                let elem = self.lower(types, elem)?;
                types.slice(elem)
            }
            TypeExpr::Array(len, elem) => {
                let elem = self.lower(types, elem)?;
                types.array(*len, elem)
            }
            TypeExpr::Map(key, value) => {
                let key = self.lower(types, key)?;
                let value = self.lower(types, value)?;
                types.map(key, value)
            }
            TypeExpr::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| self.lower_field_expr(types, field))
                    .collect::<ManifestResult<Vec<_>>>()?;
                types.structure(fields)
            }
            TypeExpr::Named { package, name } => {
                let package = package.as_deref().unwrap_or(self.package);
                types
                    .lookup(package, name)
                    .ok_or_else(|| ManifestError::UnknownType {
                        source_name: self.source_name.to_string(),
                        type_name: self.type_name.to_string(),
                        reference: if package.is_empty() {
                            name.clone()
                        } else {
                            format!("{package}.{name}")
                        },
                    })?
            }
        })
    }

    fn lower_field_expr(&self, types: &mut TypeSet, field: &FieldExpr) -> ManifestResult<FieldDef> {
        let ty = self.lower(types, &field.ty)?;
        Ok(field_def(types, field.name.as_deref(), ty, &field.tag, false))
    }

    fn lower_fields(&self, types: &mut TypeSet, fields: &[FieldDecl]) -> ManifestResult<TypeKey> {
        let mut defs = Vec::with_capacity(fields.len());
        for field in fields {
            let expr = self.parse(&field.ty)?;
            let ty = self.lower(types, &expr)?;
            defs.push(field_def(types, field.name.as_deref(), ty, &field.tag, field.embedded));
        }
        Ok(types.structure(defs))
    }

    fn self_schema(&self, decl: &SchemaDecl) -> ManifestResult<SelfSchema> {
        match decl {
            SchemaDecl::Constant(schema) => Ok(SelfSchema::constant(schema.as_str())),
            SchemaDecl::Method(signature) => Ok(SelfSchema::malformed(signature.as_str())),
            SchemaDecl::Preset(name) => {
                presets::self_schema(name).ok_or_else(|| ManifestError::UnknownPreset {
                    source_name: self.source_name.to_string(),
                    type_name: self.type_name.to_string(),
                    preset: name.clone(),
                })
            }
        }
    }
}

/// Nameless fields are embedded and take the base name of their type.
fn field_def(
    types: &TypeSet,
    name: Option<&str>,
    ty: TypeKey,
    tag: &str,
    embedded: bool,
) -> FieldDef {
    let def = match name {
        Some(name) => FieldDef::new(name, ty),
        None => {
            let base = types
                .get(ty)
                .indirect()
                .qualified_name()
                .map(|q| q.name)
                .unwrap_or_default();
            FieldDef::new(base, ty).embedded()
        }
    };
    let def = def.with_tag(tag);
    if embedded {
        def.embedded()
    } else {
        def
    }
}
