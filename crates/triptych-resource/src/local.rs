//! Consumer-side resource instances.

use std::fmt;
use std::sync::Arc;

use triptych_buffer::Consumer;
use triptych_core::{AccessError, FrameConsumer, ResourceId, StringId, SwapResult};

use crate::layout::ResourceLayout;
use crate::view::RawView;

/// A consumer-side resource: identity, layout, and the consumer end of
/// its triple-buffer channel.
///
/// Getters read the current read slot. [`LocalResource::sync`] adopts the
/// latest published snapshot if one landed since the last call; a `Stale`
/// result means the previous snapshot remains current and derived work
/// can be skipped.
pub struct LocalResource {
    id: ResourceId,
    layout: Arc<ResourceLayout>,
    consumer: Consumer,
}

impl LocalResource {
    pub(crate) fn new(id: ResourceId, layout: Arc<ResourceLayout>, consumer: Consumer) -> Self {
        Self {
            id,
            layout,
            consumer,
        }
    }

    /// Cross-thread identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Schema type name.
    pub fn type_name(&self) -> &str {
        self.layout.name()
    }

    /// Adopt the latest published snapshot, if any.
    pub fn sync(&mut self) -> SwapResult {
        self.consumer.try_swap_read()
    }

    /// Swaps that picked up a fresh snapshot.
    pub fn swapped_reads(&self) -> u64 {
        self.consumer.swapped_reads()
    }

    /// Swaps that found no new snapshot.
    pub fn stale_reads(&self) -> u64 {
        self.consumer.stale_reads()
    }

    /// Typed view over the current read slot.
    pub fn view(&self) -> RawView<'_> {
        RawView::new(&self.layout, self.consumer.read_slot())
    }

    /// Read a `Vec3` property from the current snapshot.
    pub fn get_vec3(&self, prop: &str) -> Result<[f32; 3], AccessError> {
        self.view().get_vec3(prop)
    }

    /// Read a `Vec4` property from the current snapshot.
    pub fn get_vec4(&self, prop: &str) -> Result<[f32; 4], AccessError> {
        self.view().get_vec4(prop)
    }

    /// Read a `Mat4` property from the current snapshot.
    pub fn get_mat4(&self, prop: &str) -> Result<[f32; 16], AccessError> {
        self.view().get_mat4(prop)
    }

    /// Read a `U32` property from the current snapshot.
    pub fn get_u32(&self, prop: &str) -> Result<u32, AccessError> {
        self.view().get_u32(prop)
    }

    /// Read an `I32` property from the current snapshot.
    pub fn get_i32(&self, prop: &str) -> Result<i32, AccessError> {
        self.view().get_i32(prop)
    }

    /// Read an `F32` property from the current snapshot.
    pub fn get_f32(&self, prop: &str) -> Result<f32, AccessError> {
        self.view().get_f32(prop)
    }

    /// Read an `Enum` property from the current snapshot.
    pub fn get_enum(&self, prop: &str) -> Result<u32, AccessError> {
        self.view().get_enum(prop)
    }

    /// Read a `Ref` property from the current snapshot.
    pub fn get_ref(&self, prop: &str) -> Result<ResourceId, AccessError> {
        self.view().get_ref(prop)
    }

    /// Read one element of a `Ref` array property.
    pub fn get_ref_at(&self, prop: &str, index: u32) -> Result<ResourceId, AccessError> {
        self.view().get_ref_at(prop, index)
    }

    /// Read a `StringRef` property from the current snapshot.
    pub fn get_string(&self, prop: &str) -> Result<StringId, AccessError> {
        self.view().get_string(prop)
    }
}

impl fmt::Debug for LocalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalResource")
            .field("id", &self.id)
            .field("type_name", &self.layout.name())
            .finish()
    }
}
