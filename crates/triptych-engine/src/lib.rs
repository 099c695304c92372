//! Frame scheduling hooks and per-thread sync hosts.
//!
//! This crate is the integration surface for thread loops: a simulation
//! thread owns a [`SyncHost`], each render/UI thread owns a
//! [`SyncMirror`], and both call `begin_frame` at the top of each loop
//! iteration and `end_frame` at the bottom. Raw channel endpoints that
//! bypass the registries register with a [`FrameSync`] instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod frame;
pub mod host;
pub mod metrics;

// Public re-exports for the primary API surface.
pub use frame::FrameSync;
pub use host::{SyncHost, SyncMirror};
pub use metrics::FrameMetrics;
