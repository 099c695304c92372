//! Host and mirror resource registries.
//!
//! A [`ResourceRegistry`] lives on the thread that owns its resources: it
//! assigns ids, owns the id→instance table and refcounts, and is the only
//! place lifecycle transitions happen. Mirrors on other threads hold a
//! [`LocalRegistry`] that replays creation, disposal, and string-intern
//! notifications; a mirror never writes into memory it does not own, it
//! only sends requests and acks back.
//!
//! Disposal is cooperative: `remove_ref` to zero marks the resource
//! pending and notifies every mirror; the backing slots are reclaimed
//! only after the last mirror acks. An unresponsive mirror keeps the
//! pending count visible rather than being worked around.

use std::sync::Arc;

use indexmap::IndexMap;

use triptych_buffer::{ChannelHandle, StringTable};
use triptych_core::{PropValue, ResourceDef, ResourceId, SchemaError, StringId, SwapResult};

use crate::builtin;
use crate::error::RegistryError;
use crate::layout::ResourceLayout;
use crate::local::LocalResource;
use crate::notify::{link, DisposalAck, HostLink, MirrorLink, Notification};
use crate::remote::{LifecycleState, RemoteResource};

/// Type name → computed layout table.
///
/// Both sides of a thread boundary construct this locally from the same
/// definitions; the schema is a shared contract, never transmitted.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    layouts: IndexMap<String, Arc<ResourceLayout>>,
}

impl SchemaRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in scene-graph schemas.
    pub fn with_builtins() -> Result<Self, SchemaError> {
        let mut schemas = Self::new();
        for def in builtin::builtin_defs()? {
            schemas.register(&def)?;
        }
        Ok(schemas)
    }

    /// Validate a definition and register its layout under its type name.
    pub fn register(&mut self, def: &ResourceDef) -> Result<Arc<ResourceLayout>, SchemaError> {
        if self.layouts.contains_key(&def.name) {
            return Err(SchemaError::DuplicateType {
                name: def.name.clone(),
            });
        }
        let layout = Arc::new(ResourceLayout::compute(def)?);
        self.layouts.insert(def.name.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Look up a layout by type name.
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceLayout>> {
        self.layouts.get(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Producer-side registry: creates, looks up, and disposes resources.
pub struct ResourceRegistry {
    schemas: SchemaRegistry,
    resources: IndexMap<ResourceId, RemoteResource>,
    strings: StringTable,
    mirrors: Vec<HostLink>,
    /// Pending disposals: resource id → mirrors yet to ack.
    pending: IndexMap<ResourceId, usize>,
    reclaimed: u64,
}

impl ResourceRegistry {
    /// Create a registry over the given schema table.
    pub fn new(schemas: SchemaRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            schemas,
            resources: IndexMap::new(),
            strings: StringTable::new()?,
            mirrors: Vec::new(),
            pending: IndexMap::new(),
            reclaimed: 0,
        })
    }

    /// Connect a new mirror, replaying interned strings and live
    /// resources so a late-attaching thread converges on current state.
    pub fn attach_mirror(&mut self) -> Result<MirrorLink, RegistryError> {
        let (host, mirror) = link();

        for (id, value) in self.strings.iter() {
            host.notifications
                .send(Notification::StringInterned {
                    id,
                    value: value.to_string(),
                })
                .map_err(|_| RegistryError::Disconnected)?;
        }

        for resource in self.resources.values_mut() {
            if resource.state() != LifecycleState::Live {
                continue;
            }
            let handle = ChannelHandle::new(resource.view().layout().byte_len() as usize)?;
            let producer = handle.attach_producer()?;
            resource.attach_channel(producer);
            resource.publish();
            host.notifications
                .send(Notification::Created {
                    id: resource.id(),
                    type_name: resource.type_name().to_string(),
                    byte_len: resource.view().layout().byte_len(),
                    handle,
                })
                .map_err(|_| RegistryError::Disconnected)?;
        }

        self.mirrors.push(host);
        Ok(mirror)
    }

    /// Create a resource of the named type, apply defaults then the given
    /// initial values, publish the first snapshot, and announce it to
    /// every mirror. Never blocks on consumers.
    pub fn create(
        &mut self,
        type_name: &str,
        initial: &[(&str, PropValue)],
    ) -> Result<ResourceId, RegistryError> {
        let layout = self
            .schemas
            .get(type_name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType {
                name: type_name.to_string(),
            })?;

        let id = ResourceId::next();
        let mut resource = RemoteResource::new(id, Arc::clone(&layout));

        let defaults: Vec<(String, PropValue)> = layout
            .slots()
            .iter()
            .filter_map(|slot| slot.default.clone().map(|d| (slot.name.clone(), d)))
            .collect();
        for (prop, value) in &defaults {
            let value = self.intern_value(value)?;
            resource.apply(prop, &value)?;
        }
        for (prop, value) in initial {
            let value = self.intern_value(value)?;
            resource.apply(prop, &value)?;
        }

        let byte_len = layout.byte_len();
        for index in 0..self.mirrors.len() {
            let handle = ChannelHandle::new(byte_len as usize)?;
            resource.attach_channel(handle.attach_producer()?);
            self.mirrors[index]
                .notifications
                .send(Notification::Created {
                    id,
                    type_name: type_name.to_string(),
                    byte_len,
                    handle,
                })
                .map_err(|_| RegistryError::Disconnected)?;
        }

        // First publish carries defaults + initial values, so the first
        // consumer swap observes a complete snapshot.
        resource.publish();
        resource.set_state(LifecycleState::Live);
        self.resources.insert(id, resource);
        Ok(id)
    }

    /// Resolve `Str` values to interned `StringRef`s; everything else
    /// passes through.
    fn intern_value(&mut self, value: &PropValue) -> Result<PropValue, RegistryError> {
        match value {
            PropValue::Str(s) => Ok(PropValue::StringRef(self.intern(s)?)),
            other => Ok(other.clone()),
        }
    }

    /// Intern a string, broadcasting it to mirrors if newly seen.
    pub fn intern(&mut self, value: &str) -> Result<StringId, RegistryError> {
        if let Some(id) = self.strings.lookup(value) {
            return Ok(id);
        }
        let id = self.strings.intern(value)?;
        for mirror in &self.mirrors {
            mirror
                .notifications
                .send(Notification::StringInterned {
                    id,
                    value: value.to_string(),
                })
                .map_err(|_| RegistryError::Disconnected)?;
        }
        Ok(id)
    }

    /// O(1) lookup. `None` means the id is not (or no longer) owned here.
    pub fn get(&self, id: ResourceId) -> Option<&RemoteResource> {
        self.resources.get(&id)
    }

    /// O(1) mutable lookup.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut RemoteResource> {
        self.resources.get_mut(&id)
    }

    /// Increment a resource's refcount. Returns the new count.
    pub fn add_ref(&mut self, id: ResourceId) -> Result<u32, RegistryError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(RegistryError::UnknownId { id })?;
        Ok(resource.add_ref())
    }

    /// Decrement a resource's refcount. Reaching zero transitions the
    /// resource to pending disposal and notifies every mirror; the slots
    /// are reclaimed once all mirrors ack (see [`Self::collect_acks`]).
    pub fn remove_ref(&mut self, id: ResourceId) -> Result<u32, RegistryError> {
        let mirror_count = self.mirrors.len();
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(RegistryError::UnknownId { id })?;
        let count = resource.remove_ref();
        if count > 0 || resource.state() != LifecycleState::Live {
            return Ok(count);
        }

        resource.set_state(LifecycleState::PendingDisposal);
        for mirror in &self.mirrors {
            mirror
                .notifications
                .send(Notification::Disposed { id })
                .map_err(|_| RegistryError::Disconnected)?;
        }
        if mirror_count == 0 {
            self.finalize(id);
        } else {
            self.pending.insert(id, mirror_count);
        }
        Ok(0)
    }

    /// Drain disposal acks from every mirror, reclaiming resources whose
    /// last ack arrived. Returns the number reclaimed by this call.
    pub fn collect_acks(&mut self) -> usize {
        let mut done = Vec::new();
        for mirror in &self.mirrors {
            for DisposalAck { id } in mirror.acks.try_iter() {
                if let Some(remaining) = self.pending.get_mut(&id) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        done.push(id);
                    }
                }
            }
        }
        for id in &done {
            self.pending.shift_remove(id);
            self.finalize(*id);
        }
        done.len()
    }

    fn finalize(&mut self, id: ResourceId) {
        if let Some(mut resource) = self.resources.shift_remove(&id) {
            resource.set_state(LifecycleState::Disposed);
            self.reclaimed += 1;
        }
    }

    /// Publish every live resource's staging snapshot.
    pub fn publish_all(&mut self) {
        for resource in self.resources.values_mut() {
            if resource.state() == LifecycleState::Live {
                resource.publish();
            }
        }
    }

    /// Resources awaiting mirror acks. An unresponsive mirror keeps this
    /// nonzero; that is observable, not masked.
    pub fn pending_disposals(&self) -> usize {
        self.pending.len()
    }

    /// Resources fully reclaimed over this registry's lifetime.
    pub fn reclaimed(&self) -> u64 {
        self.reclaimed
    }

    /// Number of resources currently owned.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are owned.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The schema table this registry creates against.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Resolve an interned string id.
    pub fn resolve_string(&self, id: StringId) -> Option<&str> {
        self.strings.get(id)
    }
}

/// Consumer-side registry: mirrors a host registry by replaying its
/// notifications.
pub struct LocalRegistry {
    schemas: SchemaRegistry,
    resources: IndexMap<ResourceId, LocalResource>,
    strings: StringTable,
    link: MirrorLink,
    acked: u64,
}

impl LocalRegistry {
    /// Create a mirror over the given schema table and host link.
    ///
    /// The schema table must be constructed from the same definitions as
    /// the host's; byte-length disagreement on any created resource is a
    /// fatal schema mismatch.
    pub fn new(schemas: SchemaRegistry, link: MirrorLink) -> Result<Self, RegistryError> {
        Ok(Self {
            schemas,
            resources: IndexMap::new(),
            strings: StringTable::new()?,
            link,
            acked: 0,
        })
    }

    /// Drain and apply all pending notifications. Returns how many were
    /// processed.
    pub fn process_notifications(&mut self) -> Result<usize, RegistryError> {
        let mut processed = 0;
        while let Ok(notification) = self.link.notifications.try_recv() {
            match notification {
                Notification::Created {
                    id,
                    type_name,
                    byte_len,
                    handle,
                } => {
                    let layout = self
                        .schemas
                        .get(&type_name)
                        .cloned()
                        .ok_or(SchemaError::UnknownType {
                            name: type_name.clone(),
                        })?;
                    if layout.byte_len() != byte_len {
                        return Err(SchemaError::LayoutMismatch {
                            name: type_name,
                            declared: byte_len,
                            computed: layout.byte_len(),
                        }
                        .into());
                    }
                    let consumer = handle.attach_consumer()?;
                    self.resources
                        .insert(id, LocalResource::new(id, layout, consumer));
                }
                Notification::Disposed { id } => {
                    // Dropping the local instance releases the consumer
                    // endpoint and any derived state before the ack lets
                    // the host reclaim the slots.
                    self.resources.shift_remove(&id);
                    self.link
                        .acks
                        .send(DisposalAck { id })
                        .map_err(|_| RegistryError::Disconnected)?;
                    self.acked += 1;
                }
                Notification::StringInterned { id, value } => {
                    self.strings.mirror_insert(id, &value)?;
                }
            }
            processed += 1;
        }
        Ok(processed)
    }

    /// O(1) lookup. `None` for a recently created id means "not yet
    /// synchronized"; retry after the next [`Self::process_notifications`].
    pub fn get(&self, id: ResourceId) -> Option<&LocalResource> {
        self.resources.get(&id)
    }

    /// O(1) mutable lookup, for [`LocalResource::sync`].
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut LocalResource> {
        self.resources.get_mut(&id)
    }

    /// Swap every mirrored resource's read slot. Returns `(swapped,
    /// stale)` counts for this pass.
    pub fn sync_all(&mut self) -> (u64, u64) {
        let mut swapped = 0;
        let mut stale = 0;
        for resource in self.resources.values_mut() {
            match resource.sync() {
                SwapResult::Swapped => swapped += 1,
                SwapResult::Stale => stale += 1,
            }
        }
        (swapped, stale)
    }

    /// Resolve a mirrored string id.
    pub fn resolve_string(&self, id: StringId) -> Option<&str> {
        self.strings.get(id)
    }

    /// Number of mirrored resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are mirrored.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Disposal acks sent over this mirror's lifetime.
    pub fn acked(&self) -> u64 {
        self.acked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::define_resource;
    use triptych_core::{PropDef, PropKind};

    fn node_schemas() -> SchemaRegistry {
        let def = define_resource(
            "node",
            vec![
                PropDef::new("position", PropKind::Vec3),
                PropDef::new("visible", PropKind::U32).with_default(PropValue::U32(1)),
                PropDef::new("name", PropKind::StringRef),
            ],
        )
        .unwrap();
        let mut schemas = SchemaRegistry::new();
        schemas.register(&def).unwrap();
        schemas
    }

    fn host_and_mirror() -> (ResourceRegistry, LocalRegistry) {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        let link = host.attach_mirror().unwrap();
        let mirror = LocalRegistry::new(node_schemas(), link).unwrap();
        (host, mirror)
    }

    // ── schema registry ──

    #[test]
    fn duplicate_type_rejected() {
        let mut schemas = node_schemas();
        let def = define_resource("node", vec![PropDef::new("x", PropKind::F32)]).unwrap();
        assert!(matches!(
            schemas.register(&def),
            Err(SchemaError::DuplicateType { .. })
        ));
    }

    #[test]
    fn builtins_register_cleanly() {
        let schemas = SchemaRegistry::with_builtins().unwrap();
        assert!(schemas.get("node").is_some());
        assert!(schemas.get("mesh").is_some());
    }

    // ── creation and sync ──

    #[test]
    fn create_applies_defaults_and_initial_values() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        let id = host
            .create("node", &[("position", PropValue::floats(&[1.0, 2.0, 3.0]))])
            .unwrap();
        let resource = host.get(id).unwrap();
        assert_eq!(resource.view().get_u32("visible").unwrap(), 1);
        assert_eq!(
            resource.view().get_vec3("position").unwrap(),
            [1.0, 2.0, 3.0]
        );
        assert_eq!(resource.state(), LifecycleState::Live);
        assert_eq!(resource.refcount(), 1);
    }

    #[test]
    fn create_unknown_type_fails() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        assert!(matches!(
            host.create("portal", &[]),
            Err(RegistryError::Schema(SchemaError::UnknownType { .. }))
        ));
    }

    #[test]
    fn node_scenario_crosses_one_swap_cycle() {
        let (mut host, mut mirror) = host_and_mirror();
        let id = host
            .create(
                "node",
                &[
                    ("position", PropValue::floats(&[1.0, 2.0, 3.0])),
                    ("visible", PropValue::U32(1)),
                ],
            )
            .unwrap();

        mirror.process_notifications().unwrap();
        let resource = mirror.get_mut(id).unwrap();
        assert_eq!(resource.sync(), SwapResult::Swapped);
        assert_eq!(resource.get_vec3("position").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(resource.get_u32("visible").unwrap(), 1);
    }

    #[test]
    fn lookup_before_notification_processing_is_a_soft_miss() {
        let (mut host, mut mirror) = host_and_mirror();
        let id = host.create("node", &[]).unwrap();

        assert!(mirror.get(id).is_none());
        mirror.process_notifications().unwrap();
        assert!(mirror.get(id).is_some());
    }

    #[test]
    fn string_props_are_mirrored() {
        let (mut host, mut mirror) = host_and_mirror();
        let id = host
            .create("node", &[("name", PropValue::Str("player".to_string()))])
            .unwrap();

        mirror.process_notifications().unwrap();
        let resource = mirror.get_mut(id).unwrap();
        resource.sync();
        let name_id = mirror.get(id).unwrap().get_string("name").unwrap();
        assert_eq!(mirror.resolve_string(name_id), Some("player"));
    }

    #[test]
    fn late_mirror_attach_replays_live_state() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        let id = host
            .create("node", &[("name", PropValue::Str("root".to_string()))])
            .unwrap();

        let link = host.attach_mirror().unwrap();
        let mut mirror = LocalRegistry::new(node_schemas(), link).unwrap();
        mirror.process_notifications().unwrap();

        let resource = mirror.get_mut(id).unwrap();
        assert_eq!(resource.sync(), SwapResult::Swapped);
        let name_id = mirror.get(id).unwrap().get_string("name").unwrap();
        assert_eq!(mirror.resolve_string(name_id), Some("root"));
    }

    #[test]
    fn schema_byte_len_disagreement_is_fatal() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        let link = host.attach_mirror().unwrap();

        // Mirror computes a different layout for the same type name.
        let other_def = define_resource("node", vec![PropDef::new("x", PropKind::F32)]).unwrap();
        let mut other_schemas = SchemaRegistry::new();
        other_schemas.register(&other_def).unwrap();
        let mut mirror = LocalRegistry::new(other_schemas, link).unwrap();

        host.create("node", &[]).unwrap();
        assert!(matches!(
            mirror.process_notifications(),
            Err(RegistryError::Schema(SchemaError::LayoutMismatch { .. }))
        ));
    }

    // ── refcount lifecycle ──

    #[test]
    fn refcount_lifecycle_reaches_terminal_disposed() {
        let (mut host, mut mirror) = host_and_mirror();
        let id = host.create("node", &[]).unwrap();
        mirror.process_notifications().unwrap();

        assert_eq!(host.add_ref(id).unwrap(), 2);
        assert_eq!(host.remove_ref(id).unwrap(), 1);
        assert_eq!(host.get(id).unwrap().state(), LifecycleState::Live);

        assert_eq!(host.remove_ref(id).unwrap(), 0);
        assert_eq!(host.get(id).unwrap().state(), LifecycleState::PendingDisposal);
        assert_eq!(host.pending_disposals(), 1);

        // Resource is not reclaimed until the mirror acks.
        assert_eq!(host.collect_acks(), 0);
        assert!(host.get(id).is_some());

        mirror.process_notifications().unwrap();
        assert!(mirror.get(id).is_none());
        assert_eq!(mirror.acked(), 1);

        assert_eq!(host.collect_acks(), 1);
        assert!(host.get(id).is_none());
        assert_eq!(host.pending_disposals(), 0);
        assert_eq!(host.reclaimed(), 1);
    }

    #[test]
    fn disposal_without_mirrors_is_immediate() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        let id = host.create("node", &[]).unwrap();
        host.remove_ref(id).unwrap();
        assert!(host.get(id).is_none());
        assert_eq!(host.reclaimed(), 1);
    }

    #[test]
    fn unresponsive_mirror_keeps_disposal_pending() {
        let (mut host, _mirror) = host_and_mirror();
        let id = host.create("node", &[]).unwrap();
        host.remove_ref(id).unwrap();

        // The mirror never processes its notifications.
        assert_eq!(host.collect_acks(), 0);
        assert_eq!(host.pending_disposals(), 1);
        assert!(host.get(id).is_some());
    }

    #[test]
    fn refcount_ops_on_unknown_id_fail() {
        let mut host = ResourceRegistry::new(node_schemas()).unwrap();
        assert!(matches!(
            host.add_ref(ResourceId(u64::MAX)),
            Err(RegistryError::UnknownId { .. })
        ));
    }

    #[test]
    fn latest_wins_across_registry_publishes() {
        let (mut host, mut mirror) = host_and_mirror();
        let id = host.create("node", &[]).unwrap();
        mirror.process_notifications().unwrap();

        let remote = host.get_mut(id).unwrap();
        remote.set_vec3("position", [1.0, 0.0, 0.0]).unwrap();
        remote.publish();
        remote.set_vec3("position", [2.0, 0.0, 0.0]).unwrap();
        remote.publish();

        let local = mirror.get_mut(id).unwrap();
        assert_eq!(local.sync(), SwapResult::Swapped);
        assert_eq!(local.get_vec3("position").unwrap(), [2.0, 0.0, 0.0]);
    }
}
