//! Interned string storage shared between host and mirror registries.
//!
//! Resource props never carry string bytes inline; they carry a
//! [`StringId`] naming an entry in a [`StringTable`]. The host interns
//! strings as resources are created and ships `(id, value)` pairs to
//! mirrors over the notification channel, where [`StringTable::mirror_insert`]
//! replays them. Ids are assigned densely in intern order, so both sides
//! converge on identical tables without further coordination.

use indexmap::IndexMap;

use triptych_core::StringId;

use crate::error::StringError;
use crate::heap::{HeapArena, HeapConfig, HeapRef};

/// Append-only table of interned UTF-8 strings.
pub struct StringTable {
    arena: HeapArena,
    /// Dense storage: `entries[id.0]` locates the string's bytes.
    entries: Vec<HeapRef>,
    /// Dedup index from string value to its id.
    lookup: IndexMap<String, StringId>,
}

impl StringTable {
    /// Create an empty table with default heap sizing.
    pub fn new() -> Result<Self, StringError> {
        Self::with_config(HeapConfig::default())
    }

    /// Create an empty table backed by an arena with the given config.
    pub fn with_config(config: HeapConfig) -> Result<Self, StringError> {
        Ok(Self {
            arena: HeapArena::new(config)?,
            entries: Vec::new(),
            lookup: IndexMap::new(),
        })
    }

    /// Intern a string, returning its id.
    ///
    /// Interning the same value twice returns the same id without a new
    /// allocation.
    pub fn intern(&mut self, value: &str) -> Result<StringId, StringError> {
        if let Some(&id) = self.lookup.get(value) {
            return Ok(id);
        }
        let heap_ref = self.arena.alloc_with(value.as_bytes())?;
        let id = StringId(self.entries.len() as u32);
        self.entries.push(heap_ref);
        self.lookup.insert(value.to_string(), id);
        Ok(id)
    }

    /// Replay a host-side intern on a mirror table.
    ///
    /// The id must be the next one this table would assign; anything else
    /// means a notification was lost or reordered.
    pub fn mirror_insert(&mut self, id: StringId, value: &str) -> Result<(), StringError> {
        let expected = StringId(self.entries.len() as u32);
        if id != expected {
            return Err(StringError::MirrorOutOfSync { expected, got: id });
        }
        let heap_ref = self.arena.alloc_with(value.as_bytes())?;
        self.entries.push(heap_ref);
        self.lookup.insert(value.to_string(), id);
        Ok(())
    }

    /// Resolve an id to its string value.
    pub fn get(&self, id: StringId) -> Option<&str> {
        let heap_ref = *self.entries.get(id.0 as usize)?;
        // Entries are only ever created from &str, so the bytes are UTF-8.
        std::str::from_utf8(self.arena.bytes(heap_ref)).ok()
    }

    /// Look up the id of an already-interned value.
    pub fn lookup(&self, value: &str) -> Option<StringId> {
        self.lookup.get(value).copied()
    }

    /// Iterate all interned strings in id order.
    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> {
        (0..self.entries.len() as u32)
            .map(StringId)
            .filter_map(|id| self.get(id).map(|s| (id, s)))
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_get_round_trip() {
        let mut table = StringTable::new().unwrap();
        let id = table.intern("player_mesh").unwrap();
        assert_eq!(table.get(id), Some("player_mesh"));
    }

    #[test]
    fn ids_are_dense_in_intern_order() {
        let mut table = StringTable::new().unwrap();
        assert_eq!(table.intern("a").unwrap(), StringId(0));
        assert_eq!(table.intern("b").unwrap(), StringId(1));
        assert_eq!(table.intern("c").unwrap(), StringId(2));
    }

    #[test]
    fn duplicate_intern_returns_same_id() {
        let mut table = StringTable::new().unwrap();
        let first = table.intern("scene_root").unwrap();
        let second = table.intern("scene_root").unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_id_returns_none() {
        let table = StringTable::new().unwrap();
        assert_eq!(table.get(StringId(5)), None);
    }

    #[test]
    fn mirror_insert_in_order_matches_host() {
        let mut host = StringTable::new().unwrap();
        let mut mirror = StringTable::new().unwrap();

        for value in ["node", "mesh", "material"] {
            let id = host.intern(value).unwrap();
            mirror.mirror_insert(id, value).unwrap();
        }

        for value in ["node", "mesh", "material"] {
            let id = host.lookup(value).unwrap();
            assert_eq!(mirror.get(id), Some(value));
        }
    }

    #[test]
    fn mirror_insert_out_of_order_rejected() {
        let mut mirror = StringTable::new().unwrap();
        let err = mirror.mirror_insert(StringId(3), "skipped").unwrap_err();
        assert_eq!(
            err,
            StringError::MirrorOutOfSync {
                expected: StringId(0),
                got: StringId(3),
            }
        );
    }

    #[test]
    fn empty_string_is_internable() {
        let mut table = StringTable::new().unwrap();
        let id = table.intern("").unwrap();
        assert_eq!(table.get(id), Some(""));
    }
}
