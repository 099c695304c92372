//! Built-in scene-graph resource definitions.
//!
//! Engine code and content both declare resource types through the same
//! schema builder; these are the definitions the engine itself ships.
//! Field order is part of the cross-thread contract, so entries here are
//! append-only within a released version.

use triptych_core::{PropDef, PropKind, PropValue, ResourceDef, SchemaError};

use crate::layout::define_resource;

/// Maximum primitives one mesh may reference.
pub const MESH_PRIMITIVE_SLOTS: u32 = 16;

/// A scene-graph node: transform, visibility, hierarchy and attachments.
pub fn node_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "node",
        vec![
            PropDef::new("position", PropKind::Vec3),
            PropDef::new("quaternion", PropKind::Vec4)
                .with_default(PropValue::floats(&[0.0, 0.0, 0.0, 1.0])),
            PropDef::new("scale", PropKind::Vec3)
                .with_default(PropValue::floats(&[1.0, 1.0, 1.0])),
            PropDef::new("world_matrix", PropKind::Mat4),
            PropDef::new("visible", PropKind::U32).with_default(PropValue::U32(1)),
            PropDef::new("layer", PropKind::U32),
            PropDef::new("parent", PropKind::Ref),
            PropDef::new("mesh", PropKind::Ref),
            PropDef::new("camera", PropKind::Ref),
            PropDef::new("light", PropKind::Ref),
            PropDef::new("name", PropKind::StringRef),
        ],
    )
}

/// A scene: environment plus the root of its node hierarchy.
pub fn scene_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "scene",
        vec![
            PropDef::new("background_color", PropKind::Vec3),
            PropDef::new("ambient_intensity", PropKind::F32)
                .with_default(PropValue::F32(1.0)),
            PropDef::new("first_node", PropKind::Ref),
            PropDef::new("name", PropKind::StringRef),
        ],
    )
}

/// A mesh: a fixed-capacity list of primitive resources.
pub fn mesh_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "mesh",
        vec![
            PropDef::array("primitives", PropKind::Ref, MESH_PRIMITIVE_SLOTS),
            PropDef::new("primitive_count", PropKind::U32),
            PropDef::new("name", PropKind::StringRef),
        ],
    )
}

/// A PBR material.
pub fn material_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "material",
        vec![
            PropDef::new("base_color", PropKind::Vec4)
                .with_default(PropValue::floats(&[1.0, 1.0, 1.0, 1.0])),
            PropDef::new("metallic", PropKind::F32).with_default(PropValue::F32(1.0)),
            PropDef::new("roughness", PropKind::F32).with_default(PropValue::F32(1.0)),
            PropDef::new("emissive", PropKind::Vec3),
            PropDef::new("alpha_mode", PropKind::Enum),
            PropDef::new("double_sided", PropKind::U32),
            PropDef::new("name", PropKind::StringRef),
        ],
    )
}

/// A perspective or orthographic camera.
pub fn camera_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "camera",
        vec![
            PropDef::new("projection", PropKind::Enum),
            PropDef::new("fov_y", PropKind::F32).with_default(PropValue::F32(0.9)),
            PropDef::new("near", PropKind::F32).with_default(PropValue::F32(0.1)),
            PropDef::new("far", PropKind::F32).with_default(PropValue::F32(1000.0)),
            PropDef::new("aspect", PropKind::F32),
        ],
    )
}

/// A punctual light.
pub fn light_def() -> Result<ResourceDef, SchemaError> {
    define_resource(
        "light",
        vec![
            PropDef::new("kind", PropKind::Enum),
            PropDef::new("color", PropKind::Vec3)
                .with_default(PropValue::floats(&[1.0, 1.0, 1.0])),
            PropDef::new("intensity", PropKind::F32).with_default(PropValue::F32(1.0)),
            PropDef::new("range", PropKind::F32),
            PropDef::new("cast_shadow", PropKind::U32),
        ],
    )
}

/// All built-in definitions, in registration order.
pub fn builtin_defs() -> Result<Vec<ResourceDef>, SchemaError> {
    Ok(vec![
        node_def()?,
        scene_def()?,
        mesh_def()?,
        material_def()?,
        camera_def()?,
        light_def()?,
    ])
}
