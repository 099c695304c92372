//! Core types and traits for the Triptych synchronization layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Triptych workspace:
//! type IDs, resource and component schemas, error types, and the frame
//! hook traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod error;
pub mod id;
pub mod prop;
pub mod traits;

pub use component::{ComponentDef, ComponentPropDef, ComponentStorage, ComponentValue};
pub use error::{AccessError, SchemaError};
pub use id::{ComponentId, EntityId, FrameId, ResourceId, StringId};
pub use prop::{PropDef, PropKind, PropValue, ResourceDef};
pub use traits::{FrameConsumer, FramePublisher, SwapResult};
