//! Host type model.
//!
//! Every type of the host program lives in a [`TypeSet`] arena and is
//! addressed by a [`TypeKey`]. The converter never sees the arena directly; it
//! walks [`Type`] handles, which expose the uniform capability surface the
//! engine is built on:
//!
//! - [`Type::kind`] - the structural category
//! - [`Type::elem`] / [`Type::key`] - element and map key types
//! - [`Type::fields`] - ordered struct fields
//! - [`Type::name`] / [`Type::package`] - declared identity of named types
//! - [`Type::self_schema`] / [`Type::marshals_json`] - schema capabilities
//!
//! Named types are declared before they are defined, so recursive type graphs
//! (`type Node struct { Next *Node }`) can be represented.
//!
//! ```rust
//! use zodcast::types::{FieldDef, Kind, TypeSet};
//!
//! let mut types = TypeSet::new();
//! let string = types.basic(Kind::String);
//! let tags = types.slice(string);
//! let user = types.named_struct(
//!     "example.com/app",
//!     "User",
//!     vec![FieldDef::new("Name", string), FieldDef::new("Tags", tags)],
//! );
//!
//! let ty = types.get(user);
//! assert_eq!(ty.kind(), Kind::Struct);
//! assert_eq!(ty.to_string(), "example.com/app.User");
//! assert_eq!(ty.fields().len(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ptr;

use crate::custom::{QualifiedName, SelfSchema, TIME_NAME, TIME_PACKAGE};

/// Structural category of a type.
///
/// Mirrors the kinds a reflective host type system reports. Named types report
/// the kind of their underlying type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Interface,
    Pointer,
    Slice,
    Array,
    Map,
    Struct,
    Chan,
    Func,
    UnsafePointer,
    /// A named type that was declared but never defined.
    Invalid,
}

impl Kind {
    /// The Zod primitive schema for this kind, if it is a primitive.
    pub fn zod_primitive(self) -> Option<&'static str> {
        match self {
            Kind::Bool => Some("z.boolean()"),
            Kind::Int
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Int64
            | Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Uintptr
            | Kind::Float32
            | Kind::Float64
            | Kind::Complex64
            | Kind::Complex128 => Some("z.number()"),
            Kind::String => Some("z.string()"),
            Kind::Interface => Some("z.any()"),
            _ => None,
        }
    }

    /// Whether values of this kind are built by [`TypeSet::basic`].
    pub fn is_basic(self) -> bool {
        !matches!(
            self,
            Kind::Pointer | Kind::Slice | Kind::Array | Kind::Map | Kind::Struct | Kind::Invalid
        )
    }

    /// Resolve a predeclared type name (`int`, `byte`, `any`, ...).
    pub fn from_basic_name(name: &str) -> Option<Kind> {
        let kind = match name {
            "bool" => Kind::Bool,
            "int" => Kind::Int,
            "int8" => Kind::Int8,
            "int16" => Kind::Int16,
            "int32" | "rune" => Kind::Int32,
            "int64" => Kind::Int64,
            "uint" => Kind::Uint,
            "uint8" | "byte" => Kind::Uint8,
            "uint16" => Kind::Uint16,
            "uint32" => Kind::Uint32,
            "uint64" => Kind::Uint64,
            "uintptr" => Kind::Uintptr,
            "float32" => Kind::Float32,
            "float64" => Kind::Float64,
            "complex64" => Kind::Complex64,
            "complex128" => Kind::Complex128,
            "string" => Kind::String,
            "any" | "error" => Kind::Interface,
            _ => return None,
        };
        Some(kind)
    }

    /// Lowercase spelling used in diagnostics and type strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Interface => "interface",
            Kind::Pointer => "ptr",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::UnsafePointer => "unsafe.Pointer",
            Kind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a type inside its [`TypeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(u32);

/// Structural types that are interned, so equal shapes share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Shape {
    Basic(Kind),
    Pointer(TypeKey),
    Slice(TypeKey),
    Array(usize, TypeKey),
    Map(TypeKey, TypeKey),
}

#[derive(Debug)]
enum TypeData {
    Shape(Shape),
    Struct(Vec<FieldDef>),
    Named(NamedData),
}

#[derive(Debug)]
struct NamedData {
    package: String,
    name: String,
    underlying: Option<TypeKey>,
    self_schema: Option<SelfSchema>,
    marshals_json: bool,
}

/// A struct field as it is declared on the host type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Raw field name.
    pub name: String,
    /// Declared field type.
    pub ty: TypeKey,
    /// Raw struct tag, e.g. `json:"name,omitempty"`.
    pub tag: String,
    /// Whether the field is embedded (anonymous).
    pub embedded: bool,
}

impl FieldDef {
    /// Create an untagged field.
    pub fn new(name: impl Into<String>, ty: TypeKey) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    /// Set the raw struct tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Mark the field as embedded.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// Arena holding the types of one host program.
#[derive(Debug, Default)]
pub struct TypeSet {
    types: Vec<TypeData>,
    shapes: HashMap<Shape, TypeKey>,
    named: HashMap<(String, String), TypeKey>,
}

impl TypeSet {
    /// Create an empty type set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of types in the set.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the set holds no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get a handle to a type.
    ///
    /// # Panics
    ///
    /// Panics if `key` was produced by another set.
    pub fn get(&self, key: TypeKey) -> Type<'_> {
        assert!(
            (key.0 as usize) < self.types.len(),
            "type key {key:?} does not belong to this type set"
        );
        Type { set: self, key }
    }

    fn push(&mut self, data: TypeData) -> TypeKey {
        let key = TypeKey(self.types.len() as u32);
        self.types.push(data);
        key
    }

    fn intern(&mut self, shape: Shape) -> TypeKey {
        if let Some(&key) = self.shapes.get(&shape) {
            return key;
        }
        let key = self.push(TypeData::Shape(shape.clone()));
        self.shapes.insert(shape, key);
        key
    }

    /// A predeclared type of the given kind (`bool`, `int`, `string`,
    /// `interface{}`, ...).
    pub fn basic(&mut self, kind: Kind) -> TypeKey {
        debug_assert!(kind.is_basic(), "{kind} is not a basic kind");
        self.intern(Shape::Basic(kind))
    }

    /// `*elem`
    pub fn pointer(&mut self, elem: TypeKey) -> TypeKey {
        self.intern(Shape::Pointer(elem))
    }

    /// `[]elem`
    pub fn slice(&mut self, elem: TypeKey) -> TypeKey {
        self.intern(Shape::Slice(elem))
    }

    /// `[len]elem`
    pub fn array(&mut self, len: usize, elem: TypeKey) -> TypeKey {
        self.intern(Shape::Array(len, elem))
    }

    /// `map[key]value`
    pub fn map(&mut self, key: TypeKey, value: TypeKey) -> TypeKey {
        self.intern(Shape::Map(key, value))
    }

    /// An anonymous struct. Every call creates a distinct type.
    pub fn structure(&mut self, fields: Vec<FieldDef>) -> TypeKey {
        self.push(TypeData::Struct(fields))
    }

    /// Declare a named type without defining it yet.
    ///
    /// Declaring the same `(package, name)` twice returns the first key.
    pub fn declare(&mut self, package: impl Into<String>, name: impl Into<String>) -> TypeKey {
        let id = (package.into(), name.into());
        if let Some(&key) = self.named.get(&id) {
            return key;
        }
        let key = self.push(TypeData::Named(NamedData {
            package: id.0.clone(),
            name: id.1.clone(),
            underlying: None,
            self_schema: None,
            marshals_json: false,
        }));
        self.named.insert(id, key);
        key
    }

    /// Define the underlying type of a declared named type.
    ///
    /// Defining through another named type uses that type's underlying type,
    /// so `type A B` behaves like its host counterpart. Keys that are not
    /// named types are left untouched.
    pub fn define(&mut self, key: TypeKey, underlying: TypeKey) {
        if let Some(named) = self.named_mut(key) {
            named.underlying = Some(underlying);
        }
    }

    /// Declare and define a named type in one step.
    pub fn named(
        &mut self,
        package: impl Into<String>,
        name: impl Into<String>,
        underlying: TypeKey,
    ) -> TypeKey {
        let key = self.declare(package, name);
        self.define(key, underlying);
        key
    }

    /// Declare and define a named struct in one step.
    pub fn named_struct(
        &mut self,
        package: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> TypeKey {
        let key = self.declare(package, name);
        let body = self.structure(fields);
        self.define(key, body);
        key
    }

    /// Attach a self-describing schema to a named type.
    pub fn set_self_schema(&mut self, key: TypeKey, schema: SelfSchema) {
        if let Some(named) = self.named_mut(key) {
            named.self_schema = Some(schema);
        }
    }

    /// Record that a named type carries its own JSON marshaling.
    pub fn set_marshals_json(&mut self, key: TypeKey, marshals: bool) {
        if let Some(named) = self.named_mut(key) {
            named.marshals_json = marshals;
        }
    }

    /// Find a declared named type.
    pub fn lookup(&self, package: &str, name: &str) -> Option<TypeKey> {
        self.named
            .get(&(package.to_string(), name.to_string()))
            .copied()
    }

    /// The well-known timestamp type `time.Time`.
    ///
    /// Declared on first use as an opaque struct that marshals itself.
    pub fn time(&mut self) -> TypeKey {
        if let Some(key) = self.lookup(TIME_PACKAGE, TIME_NAME) {
            return key;
        }
        let key = self.named_struct(TIME_PACKAGE, TIME_NAME, Vec::new());
        self.set_marshals_json(key, true);
        key
    }

    fn named_mut(&mut self, key: TypeKey) -> Option<&mut NamedData> {
        match self.types.get_mut(key.0 as usize) {
            Some(TypeData::Named(named)) => Some(named),
            _ => {
                debug_assert!(false, "type key {key:?} is not a named type");
                None
            }
        }
    }

    fn data(&self, key: TypeKey) -> &TypeData {
        &self.types[key.0 as usize]
    }

    /// Follow named types down to their structural definition.
    ///
    /// Returns `None` for declared-but-undefined names and definition cycles.
    fn underlying(&self, mut key: TypeKey) -> Option<&TypeData> {
        for _ in 0..=self.types.len() {
            match self.data(key) {
                TypeData::Named(named) => key = named.underlying?,
                data => return Some(data),
            }
        }
        None
    }
}

/// A handle to one type of a [`TypeSet`].
#[derive(Clone, Copy)]
pub struct Type<'t> {
    set: &'t TypeSet,
    key: TypeKey,
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && ptr::eq(self.set, other.set)
    }
}

impl Eq for Type<'_> {}

impl<'t> Type<'t> {
    /// The arena key of this type.
    pub fn id(self) -> TypeKey {
        self.key
    }

    /// The type set this handle points into.
    pub fn type_set(self) -> &'t TypeSet {
        self.set
    }

    fn with(self, key: TypeKey) -> Type<'t> {
        Type { set: self.set, key }
    }

    fn named_data(self) -> Option<&'t NamedData> {
        match self.set.data(self.key) {
            TypeData::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Structural category, resolved through named types.
    pub fn kind(self) -> Kind {
        match self.set.underlying(self.key) {
            Some(TypeData::Shape(Shape::Basic(kind))) => *kind,
            Some(TypeData::Shape(Shape::Pointer(_))) => Kind::Pointer,
            Some(TypeData::Shape(Shape::Slice(_))) => Kind::Slice,
            Some(TypeData::Shape(Shape::Array(..))) => Kind::Array,
            Some(TypeData::Shape(Shape::Map(..))) => Kind::Map,
            Some(TypeData::Struct(_)) => Kind::Struct,
            Some(TypeData::Named(_)) | None => Kind::Invalid,
        }
    }

    /// Declared name; empty for unnamed types.
    ///
    /// Instantiated generic types keep their bracketed arguments, e.g.
    /// `Set[string]`.
    pub fn name(self) -> &'t str {
        self.named_data().map_or("", |named| named.name.as_str())
    }

    /// Package path of a named type; empty for unnamed types.
    pub fn package(self) -> &'t str {
        self.named_data().map_or("", |named| named.package.as_str())
    }

    /// Whether this is a named (declared) type.
    pub fn is_named(self) -> bool {
        self.named_data().is_some()
    }

    /// Registry identity of a named type, generic arguments split off.
    pub fn qualified_name(self) -> Option<QualifiedName> {
        self.named_data()
            .map(|named| QualifiedName::new(&named.package, &named.name))
    }

    /// Element type of a pointer, slice, array or map.
    pub fn elem(self) -> Option<Type<'t>> {
        match self.set.underlying(self.key)? {
            TypeData::Shape(Shape::Pointer(elem))
            | TypeData::Shape(Shape::Slice(elem))
            | TypeData::Shape(Shape::Array(_, elem))
            | TypeData::Shape(Shape::Map(_, elem)) => Some(self.with(*elem)),
            _ => None,
        }
    }

    /// Key type of a map.
    pub fn key(self) -> Option<Type<'t>> {
        match self.set.underlying(self.key)? {
            TypeData::Shape(Shape::Map(key, _)) => Some(self.with(*key)),
            _ => None,
        }
    }

    /// Length of an array type.
    pub fn array_len(self) -> Option<usize> {
        match self.set.underlying(self.key)? {
            TypeData::Shape(Shape::Array(len, _)) => Some(*len),
            _ => None,
        }
    }

    /// Declared fields of a struct type, in order. Empty for other kinds.
    pub fn fields(self) -> Vec<Field<'t>> {
        match self.set.underlying(self.key) {
            Some(TypeData::Struct(fields)) => fields
                .iter()
                .map(|field| Field {
                    name: &field.name,
                    ty: self.with(field.ty),
                    tag: &field.tag,
                    embedded: field.embedded,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Self-describing schema attached to this named type.
    pub fn self_schema(self) -> Option<&'t SelfSchema> {
        self.named_data()?.self_schema.as_ref()
    }

    /// Whether this named type marshals itself to JSON.
    pub fn marshals_json(self) -> bool {
        self.named_data().is_some_and(|named| named.marshals_json)
    }

    /// Strip every level of pointer indirection.
    pub fn indirect(self) -> Type<'t> {
        let mut ty = self;
        while ty.kind() == Kind::Pointer {
            match ty.elem() {
                Some(elem) => ty = elem,
                None => break,
            }
        }
        ty
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.set.data(self.key) {
            TypeData::Named(named) if named.package.is_empty() => f.write_str(&named.name),
            TypeData::Named(named) => write!(f, "{}.{}", named.package, named.name),
            TypeData::Shape(Shape::Basic(Kind::Interface)) => f.write_str("interface {}"),
            TypeData::Shape(Shape::Basic(kind)) => f.write_str(kind.as_str()),
            TypeData::Shape(Shape::Pointer(elem)) => write!(f, "*{}", self.with(*elem)),
            TypeData::Shape(Shape::Slice(elem)) => write!(f, "[]{}", self.with(*elem)),
            TypeData::Shape(Shape::Array(len, elem)) => write!(f, "[{len}]{}", self.with(*elem)),
            TypeData::Shape(Shape::Map(key, value)) => {
                write!(f, "map[{}]{}", self.with(*key), self.with(*value))
            }
            TypeData::Struct(fields) => {
                f.write_str("struct {")?;
                for (i, field) in fields.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { "; " })?;
                    if !field.embedded {
                        write!(f, "{} ", field.name)?;
                    }
                    write!(f, "{}", self.with(field.ty))?;
                    if !field.tag.is_empty() {
                        write!(f, " {:?}", field.tag)?;
                    }
                }
                f.write_str(if fields.is_empty() { "}" } else { " }" })
            }
        }
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

/// A struct field viewed through its parent type.
#[derive(Debug, Clone, Copy)]
pub struct Field<'t> {
    /// Raw field name.
    pub name: &'t str,
    /// Declared field type.
    pub ty: Type<'t>,
    /// Raw struct tag.
    pub tag: &'t str,
    /// Whether the field is embedded.
    pub embedded: bool,
}
