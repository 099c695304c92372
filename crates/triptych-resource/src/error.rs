//! Registry-level error types.

use std::error::Error;
use std::fmt;

use triptych_buffer::{BufferError, StringError};
use triptych_core::{AccessError, ResourceId, SchemaError};

/// Errors from host and mirror registry operations.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryError {
    /// Schema validation or layout computation failed.
    Schema(SchemaError),
    /// Channel construction or endpoint attachment failed.
    Buffer(BufferError),
    /// String table interning or mirroring failed.
    String(StringError),
    /// A creation-time initial value did not fit its property.
    Access(AccessError),
    /// The id names no resource owned by this registry.
    UnknownId {
        /// The unresolved id.
        id: ResourceId,
    },
    /// The notification or ack channel's peer is gone.
    Disconnected,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::Buffer(err) => write!(f, "buffer error: {err}"),
            Self::String(err) => write!(f, "string table error: {err}"),
            Self::Access(err) => write!(f, "initial value error: {err}"),
            Self::UnknownId { id } => write!(f, "no resource with id {id}"),
            Self::Disconnected => write!(f, "notification channel disconnected"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Buffer(err) => Some(err),
            Self::String(err) => Some(err),
            Self::Access(err) => Some(err),
            Self::UnknownId { .. } | Self::Disconnected => None,
        }
    }
}

impl From<SchemaError> for RegistryError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<BufferError> for RegistryError {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

impl From<StringError> for RegistryError {
    fn from(err: StringError) -> Self {
        Self::String(err)
    }
}

impl From<AccessError> for RegistryError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}
