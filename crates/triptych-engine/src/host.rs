//! Per-thread wiring of registries into the frame loop.
//!
//! A [`SyncHost`] lives on the thread that owns resources (typically the
//! simulation loop); a [`SyncMirror`] lives on each consuming thread
//! (render, UI). Both expose the same two integration points as
//! [`FrameSync`](crate::frame::FrameSync): call `begin_frame` at the top
//! of the loop and `end_frame` at the bottom.

use triptych_core::FrameId;
use triptych_resource::{
    LocalRegistry, MirrorLink, RegistryError, ResourceRegistry, SchemaRegistry,
};

use crate::metrics::FrameMetrics;

/// The owning thread's side of the synchronization layer.
pub struct SyncHost {
    registry: ResourceRegistry,
    frame: FrameId,
    metrics: FrameMetrics,
}

impl SyncHost {
    /// Create a host over the given schema table.
    pub fn new(schemas: SchemaRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            registry: ResourceRegistry::new(schemas)?,
            frame: FrameId(0),
            metrics: FrameMetrics::default(),
        })
    }

    /// Connect a new consuming thread. The returned link moves to that
    /// thread and seeds its [`SyncMirror`].
    pub fn attach_mirror(&mut self) -> Result<MirrorLink, RegistryError> {
        self.registry.attach_mirror()
    }

    /// Start a frame: drain disposal acks so fully-acknowledged resources
    /// are reclaimed before this frame creates new ones.
    pub fn begin_frame(&mut self) {
        let reclaimed = self.registry.collect_acks();
        self.metrics.resources_reclaimed += reclaimed as u64;
    }

    /// End a frame: publish every live resource's snapshot and advance
    /// the frame counter.
    pub fn end_frame(&mut self) {
        self.metrics.snapshots_published += self.registry.len() as u64;
        self.registry.publish_all();
        self.metrics.frames += 1;
        self.frame = FrameId(self.frame.0 + 1);
    }

    /// The owned resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The owned resource registry, mutably.
    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    /// The frame about to run.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Accumulated counters.
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }
}

/// A consuming thread's side of the synchronization layer.
pub struct SyncMirror {
    registry: LocalRegistry,
    frame: FrameId,
    metrics: FrameMetrics,
}

impl SyncMirror {
    /// Create a mirror from a locally constructed schema table and the
    /// link handed out by [`SyncHost::attach_mirror`].
    pub fn new(schemas: SchemaRegistry, link: MirrorLink) -> Result<Self, RegistryError> {
        Ok(Self {
            registry: LocalRegistry::new(schemas, link)?,
            frame: FrameId(0),
            metrics: FrameMetrics::default(),
        })
    }

    /// Start a frame: apply pending notifications, then swap every
    /// mirrored resource's read slot.
    pub fn begin_frame(&mut self) -> Result<(), RegistryError> {
        let processed = self.registry.process_notifications()?;
        self.metrics.notifications_processed += processed as u64;
        let (swapped, stale) = self.registry.sync_all();
        self.metrics.swapped_reads += swapped;
        self.metrics.stale_reads += stale;
        Ok(())
    }

    /// End a frame: advance the frame counter.
    pub fn end_frame(&mut self) {
        self.metrics.frames += 1;
        self.frame = FrameId(self.frame.0 + 1);
    }

    /// The mirrored registry.
    pub fn registry(&self) -> &LocalRegistry {
        &self.registry
    }

    /// The mirrored registry, mutably.
    pub fn registry_mut(&mut self) -> &mut LocalRegistry {
        &mut self.registry
    }

    /// The frame about to run.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Accumulated counters.
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triptych_core::PropValue;
    use triptych_test_utils::node_schemas;

    #[test]
    fn host_and_mirror_complete_one_cycle() {
        let mut host = SyncHost::new(node_schemas()).unwrap();
        let link = host.attach_mirror().unwrap();
        let mut mirror = SyncMirror::new(node_schemas(), link).unwrap();

        host.begin_frame();
        let id = host
            .registry_mut()
            .create("node", &[("position", PropValue::floats(&[1.0, 2.0, 3.0]))])
            .unwrap();
        host.end_frame();

        mirror.begin_frame().unwrap();
        mirror.end_frame();

        let local = mirror.registry().get(id).unwrap();
        assert_eq!(local.get_vec3("position").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(mirror.metrics().notifications_processed, 1);
        assert_eq!(mirror.metrics().frames, 1);
    }

    #[test]
    fn stale_frames_accumulate_when_host_is_idle() {
        let mut host = SyncHost::new(node_schemas()).unwrap();
        let link = host.attach_mirror().unwrap();
        let mut mirror = SyncMirror::new(node_schemas(), link).unwrap();

        host.registry_mut().create("node", &[]).unwrap();
        host.end_frame();

        mirror.begin_frame().unwrap();
        mirror.begin_frame().unwrap();
        mirror.begin_frame().unwrap();

        assert_eq!(mirror.metrics().swapped_reads, 1);
        assert_eq!(mirror.metrics().stale_reads, 2);
    }

    #[test]
    fn host_reclaims_after_mirror_acks() {
        let mut host = SyncHost::new(node_schemas()).unwrap();
        let link = host.attach_mirror().unwrap();
        let mut mirror = SyncMirror::new(node_schemas(), link).unwrap();

        let id = host.registry_mut().create("node", &[]).unwrap();
        host.end_frame();
        mirror.begin_frame().unwrap();

        host.registry_mut().remove_ref(id).unwrap();
        host.begin_frame();
        // Mirror has not acked yet.
        assert!(host.registry().get(id).is_some());

        mirror.begin_frame().unwrap();
        host.begin_frame();
        assert!(host.registry().get(id).is_none());
        assert_eq!(host.metrics().resources_reclaimed, 1);
    }
}
