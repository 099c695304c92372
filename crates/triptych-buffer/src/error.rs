//! Buffer- and heap-specific error types.

use std::error::Error;
use std::fmt;

use triptych_core::StringId;

/// Errors that can occur when attaching endpoints to a triple-buffer channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// A producer is already attached to this channel.
    ProducerAttached,
    /// A consumer is already attached to this channel.
    ConsumerAttached,
    /// Requested a channel with zero-length slots.
    ZeroLength,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProducerAttached => {
                write!(f, "channel already has a producer attached")
            }
            Self::ConsumerAttached => {
                write!(f, "channel already has a consumer attached")
            }
            Self::ZeroLength => {
                write!(f, "channel slots must be at least one byte")
            }
        }
    }
}

impl Error for BufferError {}

/// Errors that can occur during heap arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// Segment pool is full; no more segments can be allocated.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity available across all segments.
        capacity: usize,
    },
    /// Configuration rejected at construction time.
    InvalidConfig {
        /// Human-readable reason for the rejection.
        reason: String,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "heap capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid heap config: {reason}")
            }
        }
    }
}

impl Error for HeapError {}

/// Errors that can occur during string table operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StringError {
    /// Underlying heap allocation failed.
    Heap(HeapError),
    /// A mirrored insert arrived with an id the table did not expect next.
    ///
    /// Ids are assigned densely in intern order, so a mirror applying
    /// notifications in order can never hit this unless a notification
    /// was dropped or reordered.
    MirrorOutOfSync {
        /// The id the table would have assigned.
        expected: StringId,
        /// The id carried by the notification.
        got: StringId,
    },
}

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heap(err) => write!(f, "string table heap error: {err}"),
            Self::MirrorOutOfSync { expected, got } => {
                write!(
                    f,
                    "string table mirror out of sync: expected id {expected}, got {got}"
                )
            }
        }
    }
}

impl Error for StringError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Heap(err) => Some(err),
            Self::MirrorOutOfSync { .. } => None,
        }
    }
}

impl From<HeapError> for StringError {
    fn from(err: HeapError) -> Self {
        Self::Heap(err)
    }
}
