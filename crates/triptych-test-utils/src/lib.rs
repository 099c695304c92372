//! Test fixtures and registry builders for Triptych development.
//!
//! Provides the small schemas the workspace's tests share and a
//! connected host/mirror registry pair so individual tests skip the
//! wiring boilerplate.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use triptych_core::{PropDef, PropKind, PropValue, ResourceDef};
use triptych_resource::{define_resource, LocalRegistry, ResourceRegistry, SchemaRegistry};

/// The minimal node definition used across the workspace's tests:
/// `position: vec3`, `visible: u32 (default 1)`, `name: string-ref`.
pub fn node_def() -> ResourceDef {
    define_resource(
        "node",
        vec![
            PropDef::new("position", PropKind::Vec3),
            PropDef::new("visible", PropKind::U32).with_default(PropValue::U32(1)),
            PropDef::new("name", PropKind::StringRef),
        ],
    )
    .expect("node fixture layout is valid")
}

/// A schema registry holding just [`node_def`].
pub fn node_schemas() -> SchemaRegistry {
    let mut schemas = SchemaRegistry::new();
    schemas
        .register(&node_def())
        .expect("node fixture registers");
    schemas
}

/// A connected host/mirror registry pair over [`node_schemas`].
pub fn registry_pair() -> (ResourceRegistry, LocalRegistry) {
    let mut host = ResourceRegistry::new(node_schemas()).expect("host builds");
    let link = host.attach_mirror().expect("mirror attaches");
    let mirror = LocalRegistry::new(node_schemas(), link).expect("mirror builds");
    (host, mirror)
}
