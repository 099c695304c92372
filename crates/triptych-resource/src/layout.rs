//! Byte-layout computation from resource schemas.
//!
//! A [`ResourceLayout`] turns a [`ResourceDef`]'s ordered field list into
//! constant byte offsets, aligned to each kind's natural size. Layout is
//! deterministic from the ordered list alone, so two threads constructing
//! the same definition independently agree byte-for-byte. A definition
//! whose declared byte length disagrees with the computed layout is
//! rejected at construction; shared bytes are never reinterpreted on a
//! guess.

use indexmap::IndexMap;

use triptych_core::{PropDef, PropKind, PropValue, ResourceDef, SchemaError};

/// Resolved location of one property within a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct PropSlot {
    /// Property name, unique within the layout.
    pub name: String,
    /// Semantic type.
    pub kind: PropKind,
    /// Number of values of `kind` at this slot.
    pub count: u32,
    /// Byte offset from the start of the snapshot.
    pub offset: u32,
    /// Total byte length of the slot.
    pub byte_len: u32,
    /// Default applied on creation before any initial values.
    pub default: Option<PropValue>,
}

/// Computed, validated byte layout for one resource type.
#[derive(Clone, Debug)]
pub struct ResourceLayout {
    name: String,
    byte_len: u32,
    slots: Vec<PropSlot>,
    index: IndexMap<String, usize>,
}

fn align_up(offset: u32, align: u32) -> Option<u32> {
    let mask = align - 1;
    offset.checked_add(mask).map(|v| v & !mask)
}

/// Pack an ordered property list into slots, validating names and counts.
fn pack(name: &str, props: &[PropDef]) -> Result<(Vec<PropSlot>, u32), SchemaError> {
    let mut slots = Vec::with_capacity(props.len());
    let mut seen: IndexMap<&str, ()> = IndexMap::with_capacity(props.len());
    let mut cursor = 0u32;

    for prop in props {
        if prop.count == 0 {
            return Err(SchemaError::EmptyProp {
                name: name.to_string(),
                prop: prop.name.clone(),
            });
        }
        if seen.insert(prop.name.as_str(), ()).is_some() {
            return Err(SchemaError::DuplicateProp {
                name: name.to_string(),
                prop: prop.name.clone(),
            });
        }

        let overflow = || SchemaError::LayoutOverflow {
            name: name.to_string(),
        };
        let offset = align_up(cursor, prop.kind.align()).ok_or_else(overflow)?;
        let byte_len = prop
            .count
            .checked_mul(prop.kind.byte_len())
            .ok_or_else(overflow)?;
        cursor = offset.checked_add(byte_len).ok_or_else(overflow)?;

        slots.push(PropSlot {
            name: prop.name.clone(),
            kind: prop.kind,
            count: prop.count,
            offset,
            byte_len,
            default: prop.default.clone(),
        });
    }

    Ok((slots, cursor))
}

impl ResourceLayout {
    /// Compute the layout for a definition, validating its declared byte
    /// length against the packed field list.
    pub fn compute(def: &ResourceDef) -> Result<Self, SchemaError> {
        let (slots, computed) = pack(&def.name, &def.props)?;
        if computed != def.byte_len {
            return Err(SchemaError::LayoutMismatch {
                name: def.name.clone(),
                declared: def.byte_len,
                computed,
            });
        }
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.name.clone(), i))
            .collect();
        Ok(Self {
            name: def.name.clone(),
            byte_len: computed,
            slots,
            index,
        })
    }

    /// Resource type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total snapshot size in bytes.
    pub fn byte_len(&self) -> u32 {
        self.byte_len
    }

    /// Look up a slot by property name.
    pub fn slot(&self, prop: &str) -> Option<&PropSlot> {
        self.index.get(prop).map(|&i| &self.slots[i])
    }

    /// All slots in declaration order.
    pub fn slots(&self) -> &[PropSlot] {
        &self.slots
    }
}

/// Build a [`ResourceDef`] whose declared byte length is the computed one.
///
/// This is the builder the built-in schema library uses; hand-written
/// definitions with an explicit byte length go through
/// [`ResourceLayout::compute`] and get the declared length checked instead.
pub fn define_resource(
    name: impl Into<String>,
    props: Vec<PropDef>,
) -> Result<ResourceDef, SchemaError> {
    let name = name.into();
    let (_, byte_len) = pack(&name, &props)?;
    Ok(ResourceDef {
        name,
        byte_len,
        props,
    })
}
