//! Producer-side resource instances.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use triptych_buffer::Producer;
use triptych_core::{AccessError, FramePublisher, PropValue, ResourceId, StringId};

use crate::layout::ResourceLayout;
use crate::view::{RawView, RawViewMut};

/// Lifecycle state of a resource on its owning thread.
///
/// Transitions are strictly `Uninitialized → Live → PendingDisposal →
/// Disposed`; no state is skipped and `Disposed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed but defaults not yet applied or published.
    Uninitialized,
    /// Published at least once and holding a positive refcount.
    Live,
    /// Refcount reached zero; waiting for every mirror to acknowledge.
    PendingDisposal,
    /// All mirrors acknowledged; slots may be reclaimed.
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Live => "live",
            Self::PendingDisposal => "pending-disposal",
            Self::Disposed => "disposed",
        };
        write!(f, "{name}")
    }
}

/// A producer-side resource: identity, layout, staging snapshot, and one
/// triple-buffer producer per attached mirror.
///
/// Setters write into the staging snapshot, so every publish carries the
/// complete current state of all fields regardless of which were touched
/// this tick. [`RemoteResource::publish`] copies the staging bytes into
/// each channel's write slot (resolved at publish time, since slots
/// rotate) and swaps.
pub struct RemoteResource {
    id: ResourceId,
    layout: Arc<ResourceLayout>,
    staging: Box<[u8]>,
    channels: SmallVec<[Producer; 2]>,
    refcount: u32,
    state: LifecycleState,
}

impl RemoteResource {
    /// Construct an uninitialized instance with zeroed staging bytes.
    ///
    /// The registry applies defaults and initial values, attaches one
    /// channel per mirror, and publishes the first snapshot before the
    /// instance becomes visible.
    pub(crate) fn new(id: ResourceId, layout: Arc<ResourceLayout>) -> Self {
        let staging = vec![0u8; layout.byte_len() as usize].into_boxed_slice();
        Self {
            id,
            layout,
            staging,
            channels: SmallVec::new(),
            refcount: 1,
            state: LifecycleState::Uninitialized,
        }
    }

    pub(crate) fn attach_channel(&mut self, producer: Producer) {
        self.channels.push(producer);
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    pub(crate) fn add_ref(&mut self) -> u32 {
        self.refcount += 1;
        self.refcount
    }

    pub(crate) fn remove_ref(&mut self) -> u32 {
        self.refcount = self.refcount.saturating_sub(1);
        self.refcount
    }

    /// Cross-thread identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Schema type name.
    pub fn type_name(&self) -> &str {
        self.layout.name()
    }

    /// Current refcount.
    pub fn refcount(&self) -> u32 {
        self.refcount
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of mirrors this resource publishes to.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Read-only view of the staging snapshot (producer-visible state).
    pub fn view(&self) -> RawView<'_> {
        RawView::new(&self.layout, &self.staging)
    }

    /// Mutable view of the staging snapshot.
    pub fn view_mut(&mut self) -> RawViewMut<'_> {
        RawViewMut::new(&self.layout, &mut self.staging)
    }

    /// Write a `Vec3` property.
    pub fn set_vec3(&mut self, prop: &str, value: [f32; 3]) -> Result<(), AccessError> {
        self.view_mut().set_vec3(prop, value)
    }

    /// Write a `Vec4` property.
    pub fn set_vec4(&mut self, prop: &str, value: [f32; 4]) -> Result<(), AccessError> {
        self.view_mut().set_vec4(prop, value)
    }

    /// Write a `Mat4` property.
    pub fn set_mat4(&mut self, prop: &str, value: [f32; 16]) -> Result<(), AccessError> {
        self.view_mut().set_mat4(prop, value)
    }

    /// Write a `U32` property.
    pub fn set_u32(&mut self, prop: &str, value: u32) -> Result<(), AccessError> {
        self.view_mut().set_u32(prop, value)
    }

    /// Write an `I32` property.
    pub fn set_i32(&mut self, prop: &str, value: i32) -> Result<(), AccessError> {
        self.view_mut().set_i32(prop, value)
    }

    /// Write an `F32` property.
    pub fn set_f32(&mut self, prop: &str, value: f32) -> Result<(), AccessError> {
        self.view_mut().set_f32(prop, value)
    }

    /// Write an `Enum` property.
    pub fn set_enum(&mut self, prop: &str, value: u32) -> Result<(), AccessError> {
        self.view_mut().set_enum(prop, value)
    }

    /// Write a `Ref` property.
    pub fn set_ref(&mut self, prop: &str, value: ResourceId) -> Result<(), AccessError> {
        self.view_mut().set_ref(prop, value)
    }

    /// Write one element of a `Ref` array property.
    pub fn set_ref_at(
        &mut self,
        prop: &str,
        index: u32,
        value: ResourceId,
    ) -> Result<(), AccessError> {
        self.view_mut().set_ref_at(prop, index, value)
    }

    /// Write a `StringRef` property with an already-interned id.
    pub fn set_string(&mut self, prop: &str, value: StringId) -> Result<(), AccessError> {
        self.view_mut().set_string(prop, value)
    }

    /// Apply a schema-level value, as for defaults and initial values.
    pub fn apply(&mut self, prop: &str, value: &PropValue) -> Result<(), AccessError> {
        self.view_mut().apply(prop, value)
    }

    /// Copy the staging snapshot into every attached channel's write slot
    /// and publish. Never blocks; an unconsumed prior snapshot is
    /// superseded.
    pub fn publish(&mut self) {
        for producer in &mut self.channels {
            producer.write_slot().copy_from_slice(&self.staging);
            producer.publish();
        }
    }
}

impl fmt::Debug for RemoteResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteResource")
            .field("id", &self.id)
            .field("type_name", &self.layout.name())
            .field("refcount", &self.refcount)
            .field("state", &self.state)
            .field("channels", &self.channels.len())
            .finish()
    }
}
