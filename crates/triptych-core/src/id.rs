//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ResourceId`] allocation.
static RESOURCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Cross-thread identity of a synchronized resource.
///
/// Allocated from a monotonic atomic counter via [`ResourceId::next`].
/// Two distinct resources always have different IDs within one process,
/// even when created from different registries. Only these integer IDs
/// ever cross a thread boundary, never pointers into shared memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl ResourceId {
    /// Allocate a fresh, unique resource ID.
    ///
    /// Each call returns an ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(RESOURCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies an entity slot within a world.
///
/// Entities are allocated from a bounded slot pool; `EntityId(n)` indexes
/// component columns directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a registered component store within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ComponentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an interned string in a registry's string table.
///
/// String payloads never ride the hot path; `string-ref` fields store this
/// integer and both sides resolve it against their own (mirrored) table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(pub u32);

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StringId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing per-thread frame counter.
///
/// Incremented each time a thread completes one loop iteration
/// (`begin_frame` through `end_frame`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FrameId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
