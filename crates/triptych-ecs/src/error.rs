//! Entity and component store error types.

use std::error::Error;
use std::fmt;

use triptych_core::{ComponentStorage, EntityId};

/// Errors from world and component store operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The world's fixed entity capacity is exhausted.
    CapacityExhausted {
        /// The configured capacity.
        capacity: u32,
    },
    /// The entity is not alive in this world.
    DeadEntity {
        /// The offending entity.
        entity: EntityId,
    },
    /// A component name was registered twice.
    DuplicateComponent {
        /// The duplicated name.
        name: String,
    },
    /// No component registered under this name.
    UnknownComponent {
        /// The unresolved name.
        name: String,
    },
    /// The property name does not exist in the component's schema.
    UnknownProp {
        /// The unresolved property name.
        prop: String,
    },
    /// The accessor's storage type does not match the property's.
    StorageMismatch {
        /// The property name.
        prop: String,
        /// The declared storage.
        expected: ComponentStorage,
        /// The storage the accessor assumed.
        actual: ComponentStorage,
    },
    /// The entity does not currently have this component.
    NotPresent {
        /// The entity.
        entity: EntityId,
        /// The component name.
        component: String,
    },
    /// A declared default does not fit its property's storage or count.
    DefaultMismatch {
        /// The property name.
        prop: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExhausted { capacity } => {
                write!(f, "entity capacity {capacity} exhausted")
            }
            Self::DeadEntity { entity } => write!(f, "entity {entity} is not alive"),
            Self::DuplicateComponent { name } => {
                write!(f, "component '{name}' registered twice")
            }
            Self::UnknownComponent { name } => {
                write!(f, "no component registered as '{name}'")
            }
            Self::UnknownProp { prop } => write!(f, "unknown component property '{prop}'"),
            Self::StorageMismatch {
                prop,
                expected,
                actual,
            } => write!(
                f,
                "property '{prop}' is stored as {expected:?} but was accessed as {actual:?}"
            ),
            Self::NotPresent { entity, component } => {
                write!(f, "entity {entity} does not have component '{component}'")
            }
            Self::DefaultMismatch { prop } => {
                write!(f, "default value does not fit property '{prop}'")
            }
        }
    }
}

impl Error for StoreError {}
