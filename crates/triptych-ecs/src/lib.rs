//! Entity world and schema-driven component stores.
//!
//! Components are declared with the schema types from `triptych-core`
//! and stored as typed columns indexed by entity slot, the same overlay
//! technique the resource layer applies to byte offsets. Content-declared
//! component schemas participate in add/remove/has exactly like built-in
//! ones.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod set;
pub mod store;
pub mod world;

// Public re-exports for the primary API surface.
pub use error::StoreError;
pub use set::EntitySet;
pub use store::ComponentStore;
pub use world::World;
