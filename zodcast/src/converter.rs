//! The type → schema conversion engine.

use crate::classify::classify;
use crate::custom::{CustomRegistry, SelfSchema, TIME_IDENTITY};
use crate::error::{ConvertError, Result};
use crate::fields::{flatten, ResolvedField};
use crate::naming::FieldNaming;
use crate::registry::{SchemaEntry, SchemaRegistry};
use crate::types::{Kind, Type, TypeKey, TypeSet};

/// Session options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ConverterOptions {
    /// Prepended to every schema constant and type alias.
    pub prefix: String,
    /// Fail on self-marshaling types that have no schema override.
    pub strict_custom_schemas: bool,
    /// Naming rule for fields without an explicit tag name.
    pub field_naming: FieldNaming,
}

/// A conversion session.
///
/// Borrows the type model and collects every named struct it meets into a
/// [`SchemaRegistry`]. Several roots converted through one session share
/// their nested schemas.
///
/// ```rust
/// use zodcast::types::{FieldDef, Kind, TypeSet};
/// use zodcast::Converter;
///
/// let mut types = TypeSet::new();
/// let string = types.basic(Kind::String);
/// let user = types.named_struct("app", "User", vec![FieldDef::new("Name", string)]);
///
/// let output = Converter::new(&types).with_prefix("Api").convert(user).unwrap();
/// assert_eq!(
///     output,
///     "export const ApiUserSchema = z.object({\n  Name: z.string(),\n})\n\
///      export type ApiUser = z.infer<typeof ApiUserSchema>\n\n"
/// );
/// ```
pub struct Converter<'t> {
    types: &'t TypeSet,
    options: ConverterOptions,
    custom: CustomRegistry,
    registry: SchemaRegistry,
    rendering: Vec<TypeKey>,
}

impl<'t> Converter<'t> {
    pub fn new(types: &'t TypeSet) -> Self {
        Self {
            types,
            options: ConverterOptions::default(),
            custom: CustomRegistry::new(),
            registry: SchemaRegistry::new(),
            rendering: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ConverterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.prefix = prefix.into();
        self
    }

    pub fn with_strict_custom_schemas(mut self, strict: bool) -> Self {
        self.options.strict_custom_schemas = strict;
        self
    }

    pub fn with_field_naming(mut self, naming: FieldNaming) -> Self {
        self.options.field_naming = naming;
        self
    }

    pub fn with_custom(mut self, custom: CustomRegistry) -> Self {
        self.custom = custom;
        self
    }

    pub fn types(&self) -> &'t TypeSet {
        self.types
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Named schemas collected so far, in discovery order.
    pub fn entries(&self) -> Vec<&SchemaEntry> {
        self.registry.entries()
    }

    /// Reference name of a schema constant: `<prefix><name>Schema`.
    pub fn schema_name(&self, name: &str) -> String {
        format!("{}{}Schema", self.options.prefix, name)
    }

    /// Convert one root struct and render everything collected so far.
    pub fn convert(&mut self, root: TypeKey) -> Result<String> {
        self.add_root(root)?;
        Ok(self.render())
    }

    /// Convert several roots into this session and render the result.
    pub fn convert_all(&mut self, roots: &[TypeKey]) -> Result<String> {
        for &root in roots {
            self.add_root(root)?;
        }
        Ok(self.render())
    }

    /// Convert a root struct into the registry without rendering.
    pub fn add_root(&mut self, root: TypeKey) -> Result<()> {
        let ty = self.types.get(root);
        if ty.kind() != Kind::Struct {
            return Err(ConvertError::NonStructRoot {
                type_name: ty.to_string(),
            });
        }
        tracing::debug!(root = %ty, "converting root");
        let body = self.convert_struct_top_level(ty)?;
        self.registry.register(ty.name(), body);
        Ok(())
    }

    /// Every registered schema in discovery order.
    pub fn render(&self) -> String {
        self.registry.render()
    }

    /// Whether `ty` (pointers unwrapped) overrides its own schema.
    pub fn is_custom(&self, ty: Type<'t>) -> bool {
        let ty = ty.indirect();
        if ty.self_schema().is_some() {
            return true;
        }
        ty.qualified_name()
            .is_some_and(|name| self.custom.contains(&name.identity()))
    }

    /// Schema text for `ty` without field modifiers.
    ///
    /// `name` is the name a named struct found here is registered under.
    pub fn convert_type(&mut self, ty: Type<'t>, name: &str, indent: usize) -> Result<String> {
        tracing::trace!(ty = %ty, name, indent, "convert type");

        if ty.kind() == Kind::Pointer {
            return self.convert_type(element(ty)?, name, indent);
        }

        if let Some(schema) = self.handle_custom_type(ty, name, indent)? {
            return Ok(schema);
        }

        let identity = ty.qualified_name().map(|name| name.identity());
        if identity.as_deref() == Some(TIME_IDENTITY) {
            return Ok("z.string()".to_string());
        }

        if self.options.strict_custom_schemas && ty.marshals_json() {
            return Err(ConvertError::StrictModeViolation {
                type_name: ty.to_string(),
            });
        }

        match ty.kind() {
            Kind::Slice => {
                let elem = element(ty)?;
                // Byte slices marshal as base64 strings.
                if elem.kind() == Kind::Uint8 && !self.is_custom(elem) {
                    return Ok("z.string()".to_string());
                }
                Ok(format!("{}.array()", self.convert_type(elem, name, indent)?))
            }
            Kind::Array => Ok(format!(
                "{}.array()",
                self.convert_type(element(ty)?, name, indent)?
            )),
            Kind::Struct if ty.name().is_empty() => self.render_object(ty, indent),
            Kind::Struct => {
                let body = self.convert_struct_top_level(ty)?;
                self.registry.register(name, body);
                Ok(self.schema_name(name))
            }
            Kind::Map => self.convert_map(ty, name, indent),
            kind => kind
                .zod_primitive()
                .map(str::to_string)
                .ok_or_else(|| ConvertError::unsupported(ty)),
        }
    }

    /// `z.object({ ... })` for the flattened fields of `ty`.
    pub fn render_object(&mut self, ty: Type<'t>, indent: usize) -> Result<String> {
        let mut output = String::from("z.object({\n");
        for field in flatten(ty, self.options.field_naming)? {
            output.push_str(&self.convert_field(&field, indent + 1)?);
        }
        output.push_str(&indentation(indent));
        output.push_str("})");
        Ok(output)
    }

    fn convert_struct_top_level(&mut self, ty: Type<'t>) -> Result<String> {
        if self.rendering.contains(&ty.id()) {
            return Err(ConvertError::RecursiveType {
                type_name: ty.to_string(),
            });
        }

        self.rendering.push(ty.id());
        let body = self.render_object(ty, 0);
        self.rendering.pop();

        let name = ty.name();
        let schema = self.schema_name(name);
        Ok(format!(
            "export const {schema} = {}\nexport type {}{name} = z.infer<typeof {schema}>",
            body?, self.options.prefix
        ))
    }

    fn convert_field(&mut self, field: &ResolvedField<'t>, indent: usize) -> Result<String> {
        let ty = field.field.ty;
        let modifiers = classify(ty, &field.json);
        let custom = self.is_custom(ty);
        let schema = self.convert_type(ty, &proposed_name(ty), indent)?;

        Ok(format!(
            "{}{}: {}{}{},\n",
            indentation(indent),
            field.name,
            schema,
            if modifiers.optional { ".optional()" } else { "" },
            if modifiers.nullable && !custom { ".nullable()" } else { "" },
        ))
    }

    fn convert_map(&mut self, ty: Type<'t>, name: &str, indent: usize) -> Result<String> {
        let key = ty.key().ok_or_else(|| ConvertError::unsupported(ty))?;
        let key = self.convert_type(key, name, indent)?;
        let value = self.convert_type(element(ty)?, name, indent)?;
        Ok(format!("z.record({key}, {value})"))
    }

    fn handle_custom_type(
        &mut self,
        ty: Type<'t>,
        name: &str,
        indent: usize,
    ) -> Result<Option<String>> {
        let qualified = ty.qualified_name();
        let generic = qualified.as_ref().map_or("", |q| q.generic.as_str());

        if let Some(qualified) = &qualified {
            if let Some(emit) = self.custom.get(&qualified.identity()).cloned() {
                tracing::trace!(identity = %qualified.identity(), "custom registry override");
                return emit(self, ty, name, generic, indent).map(Some);
            }
        }

        match ty.self_schema() {
            None => Ok(None),
            Some(SelfSchema::Constant(schema)) => Ok(Some(schema.clone())),
            Some(SelfSchema::Dynamic(emit)) => emit(self, ty, name, generic, indent).map(Some),
            Some(SelfSchema::Callback(emit)) => {
                let mut convert = |t: Type<'t>, n: &str, i: usize| self.convert_type(t, n, i);
                emit(&mut convert, ty, name, generic, indent).map(Some)
            }
            Some(SelfSchema::Malformed { signature }) => {
                Err(ConvertError::MalformedCustomSchema {
                    type_name: ty.to_string(),
                    signature: signature.clone(),
                })
            }
        }
    }
}

/// Name a struct reached through `ty` is registered under.
///
/// Unwraps pointer, slice, array and map element types down to a struct;
/// anything else proposes `UNKNOWN`.
pub fn proposed_name(ty: Type<'_>) -> String {
    match ty.kind() {
        Kind::Struct => ty.name().to_string(),
        Kind::Pointer | Kind::Slice | Kind::Array | Kind::Map => match ty.elem() {
            Some(elem) => proposed_name(elem),
            None => "UNKNOWN".to_string(),
        },
        _ => "UNKNOWN".to_string(),
    }
}

fn element(ty: Type<'_>) -> Result<Type<'_>> {
    ty.elem().ok_or_else(|| ConvertError::unsupported(ty))
}

fn indentation(level: usize) -> String {
    "  ".repeat(level)
}
