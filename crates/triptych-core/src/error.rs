//! Error types shared across the Triptych workspace.
//!
//! Subsystem-local errors (buffer, heap, registry, store) live in their
//! owning crates; this module defines the schema and accessor errors that
//! every layer above the core types reports.

use std::error::Error;
use std::fmt;

use crate::prop::PropKind;

/// Errors from resource schema validation and layout computation.
///
/// A schema disagreement between threads is a memory-safety boundary, not
/// a recoverable data error: construction aborts rather than risk
/// misinterpreting shared bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// The declared byte length does not match the computed field layout.
    LayoutMismatch {
        /// Resource type name.
        name: String,
        /// Byte length declared by the definition.
        declared: u32,
        /// Byte length computed from the ordered field list.
        computed: u32,
    },
    /// A type name was registered twice with the same registry.
    DuplicateType {
        /// The offending type name.
        name: String,
    },
    /// A type name has no registered definition.
    UnknownType {
        /// The unresolved type name.
        name: String,
    },
    /// Two properties within one definition share a name.
    DuplicateProp {
        /// Resource type name.
        name: String,
        /// The duplicated property name.
        prop: String,
    },
    /// A property declared a zero element count.
    EmptyProp {
        /// Resource type name.
        name: String,
        /// The offending property name.
        prop: String,
    },
    /// The cumulative layout overflowed the u32 offset space.
    LayoutOverflow {
        /// Resource type name.
        name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayoutMismatch {
                name,
                declared,
                computed,
            } => write!(
                f,
                "schema '{name}' declares {declared} bytes but its field layout computes to {computed}"
            ),
            Self::DuplicateType { name } => write!(f, "schema '{name}' registered twice"),
            Self::UnknownType { name } => write!(f, "no schema registered for type '{name}'"),
            Self::DuplicateProp { name, prop } => {
                write!(f, "schema '{name}' declares property '{prop}' twice")
            }
            Self::EmptyProp { name, prop } => {
                write!(f, "schema '{name}' property '{prop}' has zero count")
            }
            Self::LayoutOverflow { name } => {
                write!(f, "schema '{name}' layout overflows u32 offsets")
            }
        }
    }
}

impl Error for SchemaError {}

/// Errors from typed property access against a resource's backing bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessError {
    /// The property name does not exist in the resource's layout.
    UnknownProp {
        /// The unresolved property name.
        prop: String,
    },
    /// The accessor's type does not match the property's declared kind.
    KindMismatch {
        /// The property name.
        prop: String,
        /// The declared kind.
        expected: PropKind,
        /// The kind the accessor assumed.
        actual: PropKind,
    },
    /// A slice value's length does not match the property's element count.
    CountMismatch {
        /// The property name.
        prop: String,
        /// Declared element count.
        expected: u32,
        /// Provided element count.
        actual: u32,
    },
    /// An array index exceeded the property's declared count.
    IndexOutOfRange {
        /// The property name.
        prop: String,
        /// The requested index.
        index: u32,
        /// Declared element count.
        count: u32,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProp { prop } => write!(f, "unknown property '{prop}'"),
            Self::KindMismatch {
                prop,
                expected,
                actual,
            } => write!(
                f,
                "property '{prop}' is {expected:?} but was accessed as {actual:?}"
            ),
            Self::CountMismatch {
                prop,
                expected,
                actual,
            } => write!(
                f,
                "property '{prop}' holds {expected} elements but {actual} were provided"
            ),
            Self::IndexOutOfRange { prop, index, count } => write!(
                f,
                "index {index} out of range for property '{prop}' with {count} elements"
            ),
        }
    }
}

impl Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_mismatch_display_names_both_lengths() {
        let err = SchemaError::LayoutMismatch {
            name: "node".into(),
            declared: 128,
            computed: 132,
        };
        let msg = err.to_string();
        assert!(msg.contains("128"));
        assert!(msg.contains("132"));
        assert!(msg.contains("node"));
    }

    #[test]
    fn kind_mismatch_display_names_prop() {
        let err = AccessError::KindMismatch {
            prop: "position".into(),
            expected: PropKind::Vec3,
            actual: PropKind::F32,
        };
        assert!(err.to_string().contains("position"));
    }
}
