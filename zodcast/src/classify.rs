//! Optionality and nullability of struct fields.
//!
//! Optional means the key may be absent, nullable means the value may be an
//! explicit `null`. The two are decided independently from the field's
//! declared type and its `omitempty` tag option.

use crate::tag::JsonTag;
use crate::types::{Kind, Type};

/// Modifiers appended after a field's schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Append `.optional()`.
    pub optional: bool,
    /// Append `.nullable()`.
    pub nullable: bool,
}

/// Classify a field of type `ty` with JSON tag `json`.
pub fn classify(ty: Type<'_>, json: &JsonTag) -> Modifiers {
    let optional = is_optional(ty, json);
    Modifiers {
        optional,
        nullable: is_nullable(ty, optional),
    }
}

/// Whether the pointer-unwrapped type is an interface.
pub fn is_interface(ty: Type<'_>) -> bool {
    ty.indirect().kind() == Kind::Interface
}

/// `omitempty` makes a field optional, unless the declared type is a struct
/// value or the field holds an interface.
pub fn is_optional(ty: Type<'_>, json: &JsonTag) -> bool {
    if ty.kind() == Kind::Struct || is_interface(ty) {
        return false;
    }
    json.omit_empty
}

/// Whether a field may hold an explicit `null`.
pub fn is_nullable(ty: Type<'_>, optional: bool) -> bool {
    if is_interface(ty) {
        return false;
    }
    match ty.kind() {
        // An omitted nil pointer never serializes, but a pointer to a
        // pointer, slice or map can still hold a nil inside.
        Kind::Pointer if optional => ty
            .elem()
            .is_some_and(|elem| matches!(elem.kind(), Kind::Pointer | Kind::Slice | Kind::Map)),
        Kind::Pointer => true,
        Kind::Slice | Kind::Map => !optional,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeKey, TypeSet};

    fn omitempty() -> JsonTag {
        JsonTag::parse(",omitempty")
    }

    fn modifiers(types: &TypeSet, key: TypeKey, json: &JsonTag) -> (bool, bool) {
        let m = classify(types.get(key), json);
        (m.optional, m.nullable)
    }

    #[test]
    fn test_plain_string() {
        let mut types = TypeSet::new();
        let string = types.basic(Kind::String);
        assert_eq!(modifiers(&types, string, &JsonTag::default()), (false, false));
        assert_eq!(modifiers(&types, string, &omitempty()), (true, false));
    }

    #[test]
    fn test_pointer() {
        let mut types = TypeSet::new();
        let string = types.basic(Kind::String);
        let ptr = types.pointer(string);
        assert_eq!(modifiers(&types, ptr, &JsonTag::default()), (false, true));
        assert_eq!(modifiers(&types, ptr, &omitempty()), (true, false));
    }

    #[test]
    fn test_pointer_to_collection_stays_nullable_when_optional() {
        let mut types = TypeSet::new();
        let string = types.basic(Kind::String);
        let slice = types.slice(string);
        let ptr_slice = types.pointer(slice);
        let ptr = types.pointer(string);
        let ptr_ptr = types.pointer(ptr);
        let map = types.map(string, string);
        let ptr_map = types.pointer(map);

        for key in [ptr_slice, ptr_ptr, ptr_map] {
            assert_eq!(modifiers(&types, key, &omitempty()), (true, true));
        }
    }

    #[test]
    fn test_slice_and_map() {
        let mut types = TypeSet::new();
        let string = types.basic(Kind::String);
        let slice = types.slice(string);
        let map = types.map(string, string);

        for key in [slice, map] {
            assert_eq!(modifiers(&types, key, &JsonTag::default()), (false, true));
            assert_eq!(modifiers(&types, key, &omitempty()), (true, false));
        }
    }

    #[test]
    fn test_array_is_never_nullable() {
        let mut types = TypeSet::new();
        let int = types.basic(Kind::Int);
        let array = types.array(3, int);
        assert_eq!(modifiers(&types, array, &JsonTag::default()), (false, false));
    }

    #[test]
    fn test_struct_value_ignores_omitempty() {
        let mut types = TypeSet::new();
        let post = types.named_struct("blog", "Post", Vec::new());
        let ptr = types.pointer(post);
        assert_eq!(modifiers(&types, post, &omitempty()), (false, false));
        assert_eq!(modifiers(&types, ptr, &omitempty()), (true, false));
        assert_eq!(modifiers(&types, ptr, &JsonTag::default()), (false, true));
    }

    #[test]
    fn test_interface_never_carries_modifiers() {
        let mut types = TypeSet::new();
        let any = types.basic(Kind::Interface);
        let ptr = types.pointer(any);
        for key in [any, ptr] {
            assert_eq!(modifiers(&types, key, &JsonTag::default()), (false, false));
            assert_eq!(modifiers(&types, key, &omitempty()), (false, false));
        }
    }
}
