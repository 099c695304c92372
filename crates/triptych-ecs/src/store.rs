//! Schema-driven component storage.
//!
//! A [`ComponentStore`] holds one typed column per declared property,
//! each sized to the world's entity capacity. Scalar properties occupy
//! one element per entity slot; vector properties occupy a fixed-stride
//! row. `add` registers membership and writes each property's declared
//! default (or zero) into the entity's slot, so a re-added entity always
//! starts from defaults, never from values a prior owner left behind.
//! `remove` deregisters only; slot data is not cleared.

use triptych_core::{ComponentDef, ComponentStorage, ComponentValue, EntityId};

use crate::error::StoreError;
use crate::set::EntitySet;

enum ColumnData {
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

/// One property's storage: a typed column with a fixed per-entity stride.
struct PropColumn {
    name: String,
    storage: ComponentStorage,
    count: u32,
    default: Option<ComponentValue>,
    data: ColumnData,
}

impl PropColumn {
    fn new(
        name: String,
        storage: ComponentStorage,
        count: u32,
        default: Option<ComponentValue>,
        capacity: u32,
    ) -> Self {
        let len = capacity as usize * count as usize;
        let data = match storage {
            ComponentStorage::I32 => ColumnData::I32(vec![0; len]),
            ComponentStorage::U32 => ColumnData::U32(vec![0; len]),
            ComponentStorage::F32 => ColumnData::F32(vec![0.0; len]),
        };
        Self {
            name,
            storage,
            count,
            default,
            data,
        }
    }

    fn slot(&self, entity: EntityId) -> std::ops::Range<usize> {
        let start = entity.0 as usize * self.count as usize;
        start..start + self.count as usize
    }

    /// Write the declared default (or zero) into an entity's slot.
    fn write_default(&mut self, entity: EntityId) -> Result<(), StoreError> {
        let range = self.slot(entity);
        let mismatch = || StoreError::DefaultMismatch {
            prop: self.name.clone(),
        };
        match (&mut self.data, &self.default) {
            (ColumnData::I32(data), None) => data[range].fill(0),
            (ColumnData::U32(data), None) => data[range].fill(0),
            (ColumnData::F32(data), None) => data[range].fill(0.0),
            (ColumnData::I32(data), Some(ComponentValue::I32(v))) => data[range].fill(*v),
            (ColumnData::U32(data), Some(ComponentValue::U32(v))) => data[range].fill(*v),
            (ColumnData::F32(data), Some(ComponentValue::F32(v))) => data[range].fill(*v),
            (ColumnData::F32(data), Some(ComponentValue::F32Vec(values))) => {
                if values.len() != range.len() {
                    return Err(mismatch());
                }
                data[range].copy_from_slice(values);
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

/// Storage for one declared component type across all entities.
pub struct ComponentStore {
    name: String,
    members: EntitySet,
    columns: Vec<PropColumn>,
    capacity: u32,
}

impl ComponentStore {
    /// Build a store for a definition, with columns sized to `capacity`
    /// entity slots.
    pub fn new(def: &ComponentDef, capacity: u32) -> Self {
        let columns = def
            .props
            .iter()
            .map(|prop| {
                PropColumn::new(
                    prop.name.clone(),
                    prop.storage,
                    prop.count,
                    prop.default.clone(),
                    capacity,
                )
            })
            .collect();
        Self {
            name: def.name.clone(),
            members: EntitySet::empty(),
            columns,
            capacity,
        }
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity capacity the columns were sized for.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of entities currently holding this component.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no entity holds this component.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Register the entity and write every property's default into its
    /// slot. Adding an entity that already has the component rewrites the
    /// defaults.
    ///
    /// The entity id must fall within the capacity the columns were sized
    /// for.
    pub fn add(&mut self, entity: EntityId) -> Result<(), StoreError> {
        if entity.0 >= self.capacity {
            return Err(StoreError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        self.members.insert(entity);
        for column in &mut self.columns {
            column.write_default(entity)?;
        }
        Ok(())
    }

    /// Deregister the entity. Slot data is left in place; the next `add`
    /// reinitializes it.
    pub fn remove(&mut self, entity: EntityId) {
        self.members.remove(entity);
    }

    /// O(1) membership check.
    pub fn has(&self, entity: EntityId) -> bool {
        self.members.contains(entity)
    }

    /// Iterate entities holding this component, ascending.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter()
    }

    fn column(&self, prop: &str, storage: ComponentStorage) -> Result<&PropColumn, StoreError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.name == prop)
            .ok_or_else(|| StoreError::UnknownProp {
                prop: prop.to_string(),
            })?;
        if column.storage != storage {
            return Err(StoreError::StorageMismatch {
                prop: prop.to_string(),
                expected: column.storage,
                actual: storage,
            });
        }
        Ok(column)
    }

    fn column_mut(
        &mut self,
        prop: &str,
        storage: ComponentStorage,
        entity: EntityId,
    ) -> Result<&mut PropColumn, StoreError> {
        if !self.members.contains(entity) {
            return Err(StoreError::NotPresent {
                entity,
                component: self.name.clone(),
            });
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == prop)
            .ok_or_else(|| StoreError::UnknownProp {
                prop: prop.to_string(),
            })?;
        if column.storage != storage {
            return Err(StoreError::StorageMismatch {
                prop: prop.to_string(),
                expected: column.storage,
                actual: storage,
            });
        }
        Ok(column)
    }

    fn check_member(&self, entity: EntityId) -> Result<(), StoreError> {
        if !self.members.contains(entity) {
            return Err(StoreError::NotPresent {
                entity,
                component: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Read a scalar `F32` property.
    pub fn get_f32(&self, prop: &str, entity: EntityId) -> Result<f32, StoreError> {
        self.check_member(entity)?;
        let column = self.column(prop, ComponentStorage::F32)?;
        match &column.data {
            ColumnData::F32(data) => Ok(data[column.slot(entity).start]),
            _ => unreachable!("storage checked by column()"),
        }
    }

    /// Read a scalar `U32` property.
    pub fn get_u32(&self, prop: &str, entity: EntityId) -> Result<u32, StoreError> {
        self.check_member(entity)?;
        let column = self.column(prop, ComponentStorage::U32)?;
        match &column.data {
            ColumnData::U32(data) => Ok(data[column.slot(entity).start]),
            _ => unreachable!("storage checked by column()"),
        }
    }

    /// Read a scalar `I32` property.
    pub fn get_i32(&self, prop: &str, entity: EntityId) -> Result<i32, StoreError> {
        self.check_member(entity)?;
        let column = self.column(prop, ComponentStorage::I32)?;
        match &column.data {
            ColumnData::I32(data) => Ok(data[column.slot(entity).start]),
            _ => unreachable!("storage checked by column()"),
        }
    }

    /// Read a vector `F32` property as a fixed-stride slice.
    pub fn get_f32_slice(&self, prop: &str, entity: EntityId) -> Result<&[f32], StoreError> {
        self.check_member(entity)?;
        let column = self.column(prop, ComponentStorage::F32)?;
        match &column.data {
            ColumnData::F32(data) => Ok(&data[column.slot(entity)]),
            _ => unreachable!("storage checked by column()"),
        }
    }

    /// Write a scalar `F32` property.
    pub fn set_f32(&mut self, prop: &str, entity: EntityId, value: f32) -> Result<(), StoreError> {
        let column = self.column_mut(prop, ComponentStorage::F32, entity)?;
        let index = column.slot(entity).start;
        match &mut column.data {
            ColumnData::F32(data) => data[index] = value,
            _ => unreachable!("storage checked by column_mut()"),
        }
        Ok(())
    }

    /// Write a scalar `U32` property.
    pub fn set_u32(&mut self, prop: &str, entity: EntityId, value: u32) -> Result<(), StoreError> {
        let column = self.column_mut(prop, ComponentStorage::U32, entity)?;
        let index = column.slot(entity).start;
        match &mut column.data {
            ColumnData::U32(data) => data[index] = value,
            _ => unreachable!("storage checked by column_mut()"),
        }
        Ok(())
    }

    /// Write a scalar `I32` property.
    pub fn set_i32(&mut self, prop: &str, entity: EntityId, value: i32) -> Result<(), StoreError> {
        let column = self.column_mut(prop, ComponentStorage::I32, entity)?;
        let index = column.slot(entity).start;
        match &mut column.data {
            ColumnData::I32(data) => data[index] = value,
            _ => unreachable!("storage checked by column_mut()"),
        }
        Ok(())
    }

    /// Write a vector `F32` property from a slice of the declared stride.
    pub fn set_f32_slice(
        &mut self,
        prop: &str,
        entity: EntityId,
        values: &[f32],
    ) -> Result<(), StoreError> {
        let column = self.column_mut(prop, ComponentStorage::F32, entity)?;
        if values.len() != column.count as usize {
            return Err(StoreError::DefaultMismatch {
                prop: prop.to_string(),
            });
        }
        let range = column.slot(entity);
        match &mut column.data {
            ColumnData::F32(data) => data[range].copy_from_slice(values),
            _ => unreachable!("storage checked by column_mut()"),
        }
        Ok(())
    }
}
