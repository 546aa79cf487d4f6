//! Field flattening.
//!
//! Resolves the serialized name of every field of a struct, promotes the
//! fields of `inline` embedded structs into their parent and drops names that
//! were already claimed by an earlier field. A field whose name resolves to
//! `-` is dropped.

use std::collections::HashSet;

use crate::error::{ConvertError, Result};
use crate::naming::FieldNaming;
use crate::tag::JsonTag;
use crate::types::{Field, Kind, Type, TypeKey};

/// A field that will appear in the rendered object.
#[derive(Debug, Clone)]
pub struct ResolvedField<'t> {
    /// Serialized key.
    pub name: String,
    /// The declaring field.
    pub field: Field<'t>,
    /// Parsed `json` tag.
    pub json: JsonTag,
}

/// Flatten the fields of struct `ty` in declaration order.
///
/// A field whose tag name is `-<name>` emits nothing but claims `<name>`, so a
/// later promoted field with that name is dropped.
pub fn flatten<'t>(ty: Type<'t>, naming: FieldNaming) -> Result<Vec<ResolvedField<'t>>> {
    let mut claimed = HashSet::new();
    let mut inlining = vec![ty.id()];
    let mut out = Vec::new();
    collect(ty, naming, &mut claimed, &mut inlining, &mut out)?;
    Ok(out)
}

fn collect<'t>(
    ty: Type<'t>,
    naming: FieldNaming,
    claimed: &mut HashSet<String>,
    inlining: &mut Vec<TypeKey>,
    out: &mut Vec<ResolvedField<'t>>,
) -> Result<()> {
    for field in ty.fields() {
        let json = JsonTag::from_struct_tag(field.tag);
        if json.skip {
            continue;
        }

        let target = field.ty.indirect();
        if json.inline && target.kind() == Kind::Struct {
            if inlining.contains(&target.id()) {
                return Err(ConvertError::RecursiveType {
                    type_name: target.to_string(),
                });
            }
            inlining.push(target.id());
            collect(target, naming, claimed, inlining, out)?;
            inlining.pop();
            continue;
        }

        let name = serialized_name(&field, &json, naming);
        if name == "-" {
            continue;
        }
        if let Some(shadowed) = name.strip_prefix('-').filter(|rest| !rest.is_empty()) {
            claimed.insert(shadowed.to_string());
            continue;
        }
        if !claimed.insert(name.clone()) {
            tracing::trace!(field = %name, parent = %ty, "field name already claimed");
            continue;
        }
        out.push(ResolvedField { name, field, json });
    }
    Ok(())
}

/// The key a field serializes under.
///
/// An embedded field without a tag name uses its type's base name, like any
/// other field uses its raw name.
fn serialized_name(field: &Field<'_>, json: &JsonTag, naming: FieldNaming) -> String {
    if let Some(name) = &json.name {
        return name.clone();
    }
    if field.embedded && field.name.is_empty() {
        return naming.apply(field.ty.indirect().name());
    }
    naming.apply(field.name)
}
