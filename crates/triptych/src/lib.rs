//! Triptych: triple-buffered shared-memory resource synchronization for
//! multi-threaded game engines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Triptych sub-crates. For most users, adding `triptych` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use triptych::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Both threads construct the same schemas locally; the layout is a
//! // shared contract, never transmitted.
//! let schemas = || -> Result<SchemaRegistry, Box<dyn std::error::Error>> {
//!     let mut s = SchemaRegistry::new();
//!     s.register(&define_resource(
//!         "node",
//!         vec![
//!             PropDef::new("position", PropKind::Vec3),
//!             PropDef::new("visible", PropKind::U32).with_default(PropValue::U32(1)),
//!         ],
//!     )?)?;
//!     Ok(s)
//! };
//!
//! // Simulation side: create, mutate, publish at end of frame.
//! let mut host = SyncHost::new(schemas()?)?;
//! let link = host.attach_mirror()?;
//! let id = host.registry_mut().create("node", &[])?;
//! host.registry_mut()
//!     .get_mut(id)
//!     .expect("just created")
//!     .set_vec3("position", [1.0, 2.0, 3.0])?;
//! host.end_frame();
//!
//! // Render side (normally another thread): swap at start of frame.
//! let mut mirror = SyncMirror::new(schemas()?, link)?;
//! mirror.begin_frame()?;
//! let node = mirror.registry().get(id).expect("synchronized");
//! assert_eq!(node.get_vec3("position")?, [1.0, 2.0, 3.0]);
//! assert_eq!(node.get_u32("visible")?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `triptych-core` | IDs, schemas, errors, frame traits |
//! | [`buffer`] | `triptych-buffer` | Triple-buffer channels, heap arena, string table |
//! | [`resource`] | `triptych-resource` | Layouts, accessors, lifecycle registries |
//! | [`ecs`] | `triptych-ecs` | Entity world and component stores |
//! | [`engine`] | `triptych-engine` | Frame hooks and per-thread sync hosts |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`triptych-core`).
///
/// Contains property and component schemas, error types, and the
/// [`types::FrameConsumer`]/[`types::FramePublisher`] traits.
pub use triptych_core as types;

/// Triple-buffer channels and pooled allocation (`triptych-buffer`).
///
/// [`buffer::ChannelHandle`] is the opaque handle either thread attaches
/// an endpoint through; [`buffer::HeapArena`] and [`buffer::StringTable`]
/// back variable-sized payloads.
pub use triptych_buffer as buffer;

/// Resource layouts, accessors, and registries (`triptych-resource`).
///
/// [`resource::ResourceRegistry`] owns resources on the producing thread;
/// [`resource::LocalRegistry`] mirrors them on consuming threads.
pub use triptych_resource as resource;

/// Entity world and component stores (`triptych-ecs`).
///
/// [`ecs::World`] allocates entity slots; [`ecs::ComponentStore`] applies
/// the schema-driven overlay to per-entity typed columns.
pub use triptych_ecs as ecs;

/// Frame hooks and per-thread sync hosts (`triptych-engine`).
///
/// [`engine::SyncHost`] and [`engine::SyncMirror`] wire registries into a
/// thread loop; [`engine::FrameSync`] schedules raw channel endpoints.
pub use triptych_engine as engine;

/// Common imports for typical Triptych usage.
///
/// ```rust
/// use triptych::prelude::*;
/// ```
pub mod prelude {
    // Core schema types and frame traits
    pub use triptych_core::{
        ComponentDef, ComponentPropDef, ComponentStorage, ComponentValue, EntityId, FrameConsumer,
        FrameId, FramePublisher, PropDef, PropKind, PropValue, ResourceDef, ResourceId, StringId,
        SwapResult,
    };

    // Channels
    pub use triptych_buffer::ChannelHandle;

    // Resource layer
    pub use triptych_resource::{
        define_resource, LifecycleState, LocalRegistry, LocalResource, RemoteResource,
        ResourceRegistry, SchemaRegistry,
    };

    // ECS
    pub use triptych_ecs::{ComponentStore, World};

    // Frame hooks
    pub use triptych_engine::{FrameSync, SyncHost, SyncMirror};
}
