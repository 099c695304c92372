//! Typed property access over a snapshot's raw bytes.
//!
//! A [`RawView`] or [`RawViewMut`] pairs a byte slice with the
//! [`ResourceLayout`] describing it. Accessors resolve the property's
//! precomputed offset and read or write little-endian values in place,
//! with no per-access allocation. Kind and count are checked on every
//! access and surface as [`AccessError`] rather than panicking.

use triptych_core::{AccessError, PropKind, PropValue, ResourceId, StringId};

use crate::layout::{PropSlot, ResourceLayout};

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut arr = [0u8; 4];
    arr.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(arr)
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(arr)
}

fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn write_u64(bytes: &mut [u8], offset: usize, value: u64) {
    bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn resolve<'l>(
    layout: &'l ResourceLayout,
    prop: &str,
    kind: PropKind,
) -> Result<&'l PropSlot, AccessError> {
    let slot = layout.slot(prop).ok_or_else(|| AccessError::UnknownProp {
        prop: prop.to_string(),
    })?;
    if slot.kind != kind {
        return Err(AccessError::KindMismatch {
            prop: prop.to_string(),
            expected: slot.kind,
            actual: kind,
        });
    }
    Ok(slot)
}

fn resolve_scalar<'l>(
    layout: &'l ResourceLayout,
    prop: &str,
    kind: PropKind,
) -> Result<&'l PropSlot, AccessError> {
    let slot = resolve(layout, prop, kind)?;
    if slot.count != 1 {
        return Err(AccessError::CountMismatch {
            prop: prop.to_string(),
            expected: slot.count,
            actual: 1,
        });
    }
    Ok(slot)
}

fn resolve_indexed<'l>(
    layout: &'l ResourceLayout,
    prop: &str,
    kind: PropKind,
    index: u32,
) -> Result<&'l PropSlot, AccessError> {
    let slot = resolve(layout, prop, kind)?;
    if index >= slot.count {
        return Err(AccessError::IndexOutOfRange {
            prop: prop.to_string(),
            index,
            count: slot.count,
        });
    }
    Ok(slot)
}

/// Read-only typed view over one snapshot.
#[derive(Clone, Copy)]
pub struct RawView<'a> {
    layout: &'a ResourceLayout,
    bytes: &'a [u8],
}

impl<'a> RawView<'a> {
    /// Pair a layout with the snapshot bytes it describes.
    ///
    /// The slice must be at least `layout.byte_len()` bytes; registries
    /// guarantee this by sizing every slot from the layout.
    pub fn new(layout: &'a ResourceLayout, bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() >= layout.byte_len() as usize);
        Self { layout, bytes }
    }

    /// Read an `I32` property.
    pub fn get_i32(&self, prop: &str) -> Result<i32, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::I32)?;
        Ok(read_u32(self.bytes, slot.offset as usize) as i32)
    }

    /// Read a `U32` property.
    pub fn get_u32(&self, prop: &str) -> Result<u32, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::U32)?;
        Ok(read_u32(self.bytes, slot.offset as usize))
    }

    /// Read an `F32` property.
    pub fn get_f32(&self, prop: &str) -> Result<f32, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::F32)?;
        Ok(f32::from_bits(read_u32(self.bytes, slot.offset as usize)))
    }

    /// Read an `Enum` property's discriminant.
    pub fn get_enum(&self, prop: &str) -> Result<u32, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::Enum)?;
        Ok(read_u32(self.bytes, slot.offset as usize))
    }

    /// Read a `Ref` property.
    pub fn get_ref(&self, prop: &str) -> Result<ResourceId, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::Ref)?;
        Ok(ResourceId(read_u64(self.bytes, slot.offset as usize)))
    }

    /// Read one element of a `Ref` array property.
    pub fn get_ref_at(&self, prop: &str, index: u32) -> Result<ResourceId, AccessError> {
        let slot = resolve_indexed(self.layout, prop, PropKind::Ref, index)?;
        let offset = slot.offset as usize + index as usize * 8;
        Ok(ResourceId(read_u64(self.bytes, offset)))
    }

    /// Read a `StringRef` property.
    pub fn get_string(&self, prop: &str) -> Result<StringId, AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::StringRef)?;
        Ok(StringId(read_u32(self.bytes, slot.offset as usize)))
    }

    fn get_floats<const N: usize>(
        &self,
        prop: &str,
        kind: PropKind,
    ) -> Result<[f32; N], AccessError> {
        let slot = resolve_scalar(self.layout, prop, kind)?;
        let mut out = [0f32; N];
        let base = slot.offset as usize;
        for (i, value) in out.iter_mut().enumerate() {
            *value = f32::from_bits(read_u32(self.bytes, base + i * 4));
        }
        Ok(out)
    }

    /// Read a `Vec3` property.
    pub fn get_vec3(&self, prop: &str) -> Result<[f32; 3], AccessError> {
        self.get_floats(prop, PropKind::Vec3)
    }

    /// Read a `Vec4` property.
    pub fn get_vec4(&self, prop: &str) -> Result<[f32; 4], AccessError> {
        self.get_floats(prop, PropKind::Vec4)
    }

    /// Read a `Mat4` property.
    pub fn get_mat4(&self, prop: &str) -> Result<[f32; 16], AccessError> {
        self.get_floats(prop, PropKind::Mat4)
    }

    /// The layout describing this view.
    pub fn layout(&self) -> &ResourceLayout {
        self.layout
    }
}

/// Mutable typed view over one snapshot.
pub struct RawViewMut<'a> {
    layout: &'a ResourceLayout,
    bytes: &'a mut [u8],
}

impl<'a> RawViewMut<'a> {
    /// Pair a layout with the snapshot bytes it describes.
    pub fn new(layout: &'a ResourceLayout, bytes: &'a mut [u8]) -> Self {
        debug_assert!(bytes.len() >= layout.byte_len() as usize);
        Self { layout, bytes }
    }

    /// Write an `I32` property.
    pub fn set_i32(&mut self, prop: &str, value: i32) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::I32)?;
        write_u32(self.bytes, slot.offset as usize, value as u32);
        Ok(())
    }

    /// Write a `U32` property.
    pub fn set_u32(&mut self, prop: &str, value: u32) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::U32)?;
        write_u32(self.bytes, slot.offset as usize, value);
        Ok(())
    }

    /// Write an `F32` property.
    pub fn set_f32(&mut self, prop: &str, value: f32) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::F32)?;
        write_u32(self.bytes, slot.offset as usize, value.to_bits());
        Ok(())
    }

    /// Write an `Enum` property's discriminant.
    pub fn set_enum(&mut self, prop: &str, value: u32) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::Enum)?;
        write_u32(self.bytes, slot.offset as usize, value);
        Ok(())
    }

    /// Write a `Ref` property.
    pub fn set_ref(&mut self, prop: &str, value: ResourceId) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::Ref)?;
        write_u64(self.bytes, slot.offset as usize, value.0);
        Ok(())
    }

    /// Write one element of a `Ref` array property.
    pub fn set_ref_at(
        &mut self,
        prop: &str,
        index: u32,
        value: ResourceId,
    ) -> Result<(), AccessError> {
        let slot = resolve_indexed(self.layout, prop, PropKind::Ref, index)?;
        let offset = slot.offset as usize + index as usize * 8;
        write_u64(self.bytes, offset, value.0);
        Ok(())
    }

    /// Write a `StringRef` property.
    pub fn set_string(&mut self, prop: &str, value: StringId) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, PropKind::StringRef)?;
        write_u32(self.bytes, slot.offset as usize, value.0);
        Ok(())
    }

    fn set_floats(&mut self, prop: &str, kind: PropKind, values: &[f32]) -> Result<(), AccessError> {
        let slot = resolve_scalar(self.layout, prop, kind)?;
        let expected = slot.kind.components();
        if values.len() as u32 != expected {
            return Err(AccessError::CountMismatch {
                prop: prop.to_string(),
                expected,
                actual: values.len() as u32,
            });
        }
        let base = slot.offset as usize;
        for (i, value) in values.iter().enumerate() {
            write_u32(self.bytes, base + i * 4, value.to_bits());
        }
        Ok(())
    }

    /// Write a `Vec3` property.
    pub fn set_vec3(&mut self, prop: &str, value: [f32; 3]) -> Result<(), AccessError> {
        self.set_floats(prop, PropKind::Vec3, &value)
    }

    /// Write a `Vec4` property.
    pub fn set_vec4(&mut self, prop: &str, value: [f32; 4]) -> Result<(), AccessError> {
        self.set_floats(prop, PropKind::Vec4, &value)
    }

    /// Write a `Mat4` property.
    pub fn set_mat4(&mut self, prop: &str, value: [f32; 16]) -> Result<(), AccessError> {
        self.set_floats(prop, PropKind::Mat4, &value)
    }

    /// Write a property from a schema-level value, as used for defaults
    /// and creation-time initial values.
    ///
    /// `PropValue::Str` must be interned into a `StringRef` before it
    /// reaches the view; registries do this.
    pub fn apply(&mut self, prop: &str, value: &PropValue) -> Result<(), AccessError> {
        match value {
            PropValue::I32(v) => self.set_i32(prop, *v),
            PropValue::U32(v) => {
                // A u32 value fills either a plain counter or an enum
                // discriminant.
                match resolve_scalar(self.layout, prop, PropKind::U32) {
                    Ok(slot) => {
                        write_u32(self.bytes, slot.offset as usize, *v);
                        Ok(())
                    }
                    Err(_) => self.set_enum(prop, *v),
                }
            }
            PropValue::F32(v) => self.set_f32(prop, *v),
            PropValue::Floats(values) => match values.len() {
                1 => self.set_f32(prop, values[0]),
                3 => self.set_vec3(prop, [values[0], values[1], values[2]]),
                4 => self.set_vec4(prop, [values[0], values[1], values[2], values[3]]),
                16 => {
                    let mut arr = [0f32; 16];
                    arr.copy_from_slice(values);
                    self.set_mat4(prop, arr)
                }
                n => Err(AccessError::CountMismatch {
                    prop: prop.to_string(),
                    expected: self.layout.slot(prop).map_or(0, |s| s.kind.components()),
                    actual: n as u32,
                }),
            },
            PropValue::Ref(id) => self.set_ref(prop, *id),
            PropValue::StringRef(id) => self.set_string(prop, *id),
            PropValue::Str(_) => Err(AccessError::KindMismatch {
                prop: prop.to_string(),
                expected: self
                    .layout
                    .slot(prop)
                    .map_or(PropKind::StringRef, |s| s.kind),
                actual: PropKind::StringRef,
            }),
        }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> RawView<'_> {
        RawView {
            layout: self.layout,
            bytes: self.bytes,
        }
    }
}
