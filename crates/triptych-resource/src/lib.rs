//! Schema-driven resource layouts, accessors, and lifecycle registries.
//!
//! This crate turns declarative resource definitions into constant-offset
//! byte layouts, overlays typed accessors on triple-buffered snapshots,
//! and manages cross-thread resource identity and disposal:
//!
//! ```text
//! ResourceDef ──compute──▶ ResourceLayout (offsets, shared contract)
//!
//! ResourceRegistry (owning thread)          LocalRegistry (mirror thread)
//! ├── RemoteResource (staging + producers)  ├── LocalResource (consumer)
//! ├── StringTable (host)                    ├── StringTable (mirrored)
//! └── HostLink × mirrors ───notifications──▶└── MirrorLink ──acks──▶ host
//! ```
//!
//! Snapshot bytes move only through triple-buffer slots; the notification
//! channels carry identity and wiring. Disposal follows a strict
//! `Live → PendingDisposal → Disposed` protocol gated on mirror acks, so
//! shared slots are never reclaimed while a consumer may still read them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builtin;
pub mod error;
pub mod layout;
pub mod local;
pub mod notify;
pub mod registry;
pub mod remote;
pub mod view;

// Public re-exports for the primary API surface.
pub use error::RegistryError;
pub use layout::{define_resource, PropSlot, ResourceLayout};
pub use local::LocalResource;
pub use notify::{DisposalAck, HostLink, MirrorLink, Notification};
pub use registry::{LocalRegistry, ResourceRegistry, SchemaRegistry};
pub use remote::{LifecycleState, RemoteResource};
pub use view::{RawView, RawViewMut};
