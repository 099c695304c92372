//! Component schema definitions for dynamically declared ECS components.
//!
//! Unlike resource properties, a component property is indexed by entity
//! slot rather than by byte offset into a single struct: each declared
//! property becomes one typed column (or one fixed-stride row per slot,
//! for vector properties) sized to the world's entity capacity.

use smallvec::SmallVec;

/// Storage class of a component property. Components support the three
/// scalar storage types; vector properties are declared with a `count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentStorage {
    /// Signed 32-bit integers.
    I32,
    /// Unsigned 32-bit integers.
    U32,
    /// 32-bit floats.
    F32,
}

/// A default value for a component property.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentValue {
    /// Default for an `I32` property.
    I32(i32),
    /// Default for a `U32` property.
    U32(u32),
    /// Default for a scalar `F32` property.
    F32(f32),
    /// Default for a multi-element `F32` property; length must match the
    /// declared count.
    F32Vec(SmallVec<[f32; 4]>),
}

/// Definition of a single component property.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentPropDef {
    /// Property name, unique within the component.
    pub name: String,
    /// Storage class.
    pub storage: ComponentStorage,
    /// Elements per entity slot. `1` for scalars; `2..=4` for fixed-size
    /// vectors (vec2/vec3/vec4-shaped data).
    pub count: u32,
    /// Default written into an entity's slot on `add`. `None` means zero.
    pub default: Option<ComponentValue>,
}

impl ComponentPropDef {
    /// Define a scalar property.
    pub fn scalar(name: impl Into<String>, storage: ComponentStorage) -> Self {
        Self {
            name: name.into(),
            storage,
            count: 1,
            default: None,
        }
    }

    /// Define a fixed-size f32 vector property of `count` elements.
    pub fn vector(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            storage: ComponentStorage::F32,
            count,
            default: None,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: ComponentValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declarative schema for a component type.
///
/// Content-declared components built from this definition participate in
/// the entity world exactly like engine-built-in ones.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentDef {
    /// Component name, the registration key.
    pub name: String,
    /// Ordered property list.
    pub props: Vec<ComponentPropDef>,
}

impl ComponentDef {
    /// Define a component from an ordered property list.
    pub fn new(name: impl Into<String>, props: Vec<ComponentPropDef>) -> Self {
        Self {
            name: name.into(),
            props,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_prop_defaults_to_count_one() {
        let prop = ComponentPropDef::scalar("speed", ComponentStorage::F32);
        assert_eq!(prop.count, 1);
        assert!(prop.default.is_none());
    }

    #[test]
    fn vector_prop_carries_count() {
        let prop = ComponentPropDef::vector("velocity", 3);
        assert_eq!(prop.count, 3);
        assert_eq!(prop.storage, ComponentStorage::F32);
    }

    #[test]
    fn with_default_attaches_value() {
        let prop = ComponentPropDef::scalar("speed", ComponentStorage::F32)
            .with_default(ComponentValue::F32(2.5));
        assert_eq!(prop.default, Some(ComponentValue::F32(2.5)));
    }
}
