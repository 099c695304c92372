//! The entity world: slot allocation plus registered component stores.

use indexmap::IndexMap;

use triptych_core::{ComponentDef, ComponentId, EntityId};

use crate::error::StoreError;
use crate::set::EntitySet;
use crate::store::ComponentStore;

/// An entity world with a fixed slot capacity.
///
/// Entity IDs index component columns directly, so capacity is fixed at
/// construction and despawned slots are recycled through a free list.
/// Content-declared components register here and participate exactly
/// like engine-built-in ones.
pub struct World {
    capacity: u32,
    /// Next never-used slot.
    next: u32,
    /// Recycled slots, reused before `next` advances.
    free: Vec<EntityId>,
    alive: EntitySet,
    stores: IndexMap<ComponentId, ComponentStore>,
    names: IndexMap<String, ComponentId>,
}

impl World {
    /// Create a world with `capacity` entity slots.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            next: 0,
            free: Vec::new(),
            alive: EntitySet::empty(),
            stores: IndexMap::new(),
            names: IndexMap::new(),
        }
    }

    /// Allocate an entity slot.
    pub fn spawn(&mut self) -> Result<EntityId, StoreError> {
        let entity = if let Some(entity) = self.free.pop() {
            entity
        } else {
            if self.next >= self.capacity {
                return Err(StoreError::CapacityExhausted {
                    capacity: self.capacity,
                });
            }
            let entity = EntityId(self.next);
            self.next += 1;
            entity
        };
        self.alive.insert(entity);
        Ok(entity)
    }

    /// Release an entity slot, removing it from every component store.
    pub fn despawn(&mut self, entity: EntityId) -> Result<(), StoreError> {
        if !self.alive.contains(entity) {
            return Err(StoreError::DeadEntity { entity });
        }
        self.alive.remove(entity);
        for store in self.stores.values_mut() {
            store.remove(entity);
        }
        self.free.push(entity);
        Ok(())
    }

    /// Whether the entity is currently alive.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Whether no entities are alive.
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Entity slot capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Register a component schema, building its columns at this world's
    /// capacity.
    pub fn register_component(&mut self, def: &ComponentDef) -> Result<ComponentId, StoreError> {
        if self.names.contains_key(&def.name) {
            return Err(StoreError::DuplicateComponent {
                name: def.name.clone(),
            });
        }
        let id = ComponentId(self.stores.len() as u32);
        self.stores.insert(id, ComponentStore::new(def, self.capacity));
        self.names.insert(def.name.clone(), id);
        Ok(id)
    }

    /// Resolve a component name to its id.
    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// A registered component store.
    pub fn component(&self, id: ComponentId) -> Option<&ComponentStore> {
        self.stores.get(&id)
    }

    /// A registered component store, mutably.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentStore> {
        self.stores.get_mut(&id)
    }

    /// Add a component to a live entity, writing the schema's defaults.
    pub fn add(&mut self, id: ComponentId, entity: EntityId) -> Result<(), StoreError> {
        if !self.alive.contains(entity) {
            return Err(StoreError::DeadEntity { entity });
        }
        let store = self
            .stores
            .get_mut(&id)
            .ok_or_else(|| StoreError::UnknownComponent {
                name: id.to_string(),
            })?;
        store.add(entity)
    }

    /// Remove a component from an entity. Removing an absent component is
    /// a no-op.
    pub fn remove(&mut self, id: ComponentId, entity: EntityId) -> Result<(), StoreError> {
        let store = self
            .stores
            .get_mut(&id)
            .ok_or_else(|| StoreError::UnknownComponent {
                name: id.to_string(),
            })?;
        store.remove(entity);
        Ok(())
    }

    /// O(1) membership check.
    pub fn has(&self, id: ComponentId, entity: EntityId) -> bool {
        self.stores.get(&id).is_some_and(|s| s.has(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triptych_core::{ComponentPropDef, ComponentStorage, ComponentValue};

    fn mover_def() -> ComponentDef {
        ComponentDef::new(
            "mover",
            vec![ComponentPropDef::scalar("speed", ComponentStorage::F32)
                .with_default(ComponentValue::F32(2.5))],
        )
    }

    #[test]
    fn spawn_allocates_sequential_slots() {
        let mut world = World::new(8);
        assert_eq!(world.spawn().unwrap(), EntityId(0));
        assert_eq!(world.spawn().unwrap(), EntityId(1));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn despawn_recycles_slots() {
        let mut world = World::new(8);
        let a = world.spawn().unwrap();
        world.despawn(a).unwrap();
        assert!(!world.is_alive(a));
        assert_eq!(world.spawn().unwrap(), a);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut world = World::new(2);
        world.spawn().unwrap();
        world.spawn().unwrap();
        assert!(matches!(
            world.spawn(),
            Err(StoreError::CapacityExhausted { capacity: 2 })
        ));
    }

    #[test]
    fn despawn_dead_entity_fails() {
        let mut world = World::new(2);
        assert!(matches!(
            world.despawn(EntityId(0)),
            Err(StoreError::DeadEntity { .. })
        ));
    }

    #[test]
    fn despawn_strips_components() {
        let mut world = World::new(8);
        let mover = world.register_component(&mover_def()).unwrap();
        let e = world.spawn().unwrap();
        world.add(mover, e).unwrap();
        world.despawn(e).unwrap();

        let e2 = world.spawn().unwrap();
        assert_eq!(e2, e);
        assert!(!world.has(mover, e2));
    }

    #[test]
    fn duplicate_component_name_rejected() {
        let mut world = World::new(8);
        world.register_component(&mover_def()).unwrap();
        assert!(matches!(
            world.register_component(&mover_def()),
            Err(StoreError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn add_has_remove_contract() {
        let mut world = World::new(8);
        let mover = world.register_component(&mover_def()).unwrap();
        let e = world.spawn().unwrap();

        assert!(!world.has(mover, e));
        world.add(mover, e).unwrap();
        assert!(world.has(mover, e));
        world.remove(mover, e).unwrap();
        assert!(!world.has(mover, e));
    }

    #[test]
    fn add_to_dead_entity_fails() {
        let mut world = World::new(8);
        let mover = world.register_component(&mover_def()).unwrap();
        assert!(matches!(
            world.add(mover, EntityId(5)),
            Err(StoreError::DeadEntity { .. })
        ));
    }

    #[test]
    fn component_defaults_flow_through_world() {
        let mut world = World::new(8);
        let mover = world.register_component(&mover_def()).unwrap();
        let e = world.spawn().unwrap();
        world.add(mover, e).unwrap();

        let store = world.component(mover).unwrap();
        assert_eq!(store.get_f32("speed", e).unwrap(), 2.5);
    }
}
