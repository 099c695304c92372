//! Resource property types and schema definitions.
//!
//! A [`ResourceDef`] is the declarative byte-layout contract for a resource
//! type. Two independently constructed instances of the same definition (on
//! different threads) must agree byte-for-byte on field order and size;
//! the definition is shared by agreement, never transmitted per instance.

use smallvec::SmallVec;

use crate::id::{ResourceId, StringId};

/// Semantic type of a resource property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// 32-bit float.
    F32,
    /// Three packed f32 components (position, scale, color).
    Vec3,
    /// Four packed f32 components (quaternion, RGBA).
    Vec4,
    /// Sixteen packed f32 components, column-major.
    Mat4,
    /// A [`ResourceId`] referencing another synchronized resource.
    ///
    /// Stored as a plain integer; the consuming thread resolves it against
    /// its own registry. Cross-thread pointers are never embedded.
    Ref,
    /// A discriminant stored as a plain u32.
    Enum,
    /// A [`StringId`] into the registry's mirrored string table.
    StringRef,
}

impl PropKind {
    /// Number of elements one value of this kind occupies.
    pub fn components(&self) -> u32 {
        match self {
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat4 => 16,
            _ => 1,
        }
    }

    /// Byte size of a single element.
    pub fn elem_size(&self) -> u32 {
        match self {
            Self::Ref => 8,
            _ => 4,
        }
    }

    /// Natural alignment of this kind, equal to its element size.
    pub fn align(&self) -> u32 {
        self.elem_size()
    }

    /// Total byte length of one value: `components * elem_size`.
    pub fn byte_len(&self) -> u32 {
        self.components() * self.elem_size()
    }
}

/// A default or initial value for a resource property.
///
/// Vector payloads use `SmallVec` sized for the largest fixed kind (mat4),
/// so defaults never heap-allocate.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// Value for an [`PropKind::I32`] property.
    I32(i32),
    /// Value for a [`PropKind::U32`] or [`PropKind::Enum`] property.
    U32(u32),
    /// Value for an [`PropKind::F32`] property.
    F32(f32),
    /// Value for a vec3/vec4/mat4 property; length must match the kind.
    Floats(SmallVec<[f32; 16]>),
    /// Value for a [`PropKind::Ref`] property.
    Ref(ResourceId),
    /// Value for a [`PropKind::StringRef`] property, already interned.
    StringRef(StringId),
    /// Value for a [`PropKind::StringRef`] property, interned at creation.
    Str(String),
}

impl PropValue {
    /// Convenience constructor for float-vector values.
    pub fn floats(values: &[f32]) -> Self {
        Self::Floats(SmallVec::from_slice(values))
    }
}

/// Definition of a single property within a resource schema.
#[derive(Clone, Debug, PartialEq)]
pub struct PropDef {
    /// Property name, unique within the definition.
    pub name: String,
    /// Semantic type.
    pub kind: PropKind,
    /// Number of values of `kind` this property holds. `1` for scalars;
    /// `> 1` declares a fixed-size array (e.g. a ref array of mesh
    /// primitives).
    pub count: u32,
    /// Default applied on creation before any initial values.
    pub default: Option<PropValue>,
}

impl PropDef {
    /// Define a property holding one value of `kind`.
    pub fn new(name: impl Into<String>, kind: PropKind) -> Self {
        Self {
            name: name.into(),
            kind,
            count: 1,
            default: None,
        }
    }

    /// Define a fixed-size array property of `count` values of `kind`.
    pub fn array(name: impl Into<String>, kind: PropKind, count: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            count,
            default: None,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: PropValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Total byte length of this property: `count * kind.byte_len()`.
    pub fn byte_len(&self) -> u32 {
        self.count * self.kind.byte_len()
    }
}

/// Declarative schema for a resource type.
///
/// The `byte_len` is the declared total size of one snapshot. Layout
/// computation (in `triptych-resource`) validates it against the packed,
/// aligned field list at construction time; disagreement is fatal, never
/// silently truncated.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDef {
    /// Type name, the cross-thread schema lookup key.
    pub name: String,
    /// Declared total byte length of one snapshot.
    pub byte_len: u32,
    /// Ordered property list. Order is part of the wire contract.
    pub props: Vec<PropDef>,
}
