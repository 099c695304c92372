//! The [`EntitySet`] bitset for O(1) component membership.

use triptych_core::EntityId;

/// A set of entity IDs implemented as a dynamically-sized bitset.
///
/// Component stores use one of these per declared component; `has` is a
/// single word index and mask.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntitySet {
    bits: Vec<u64>,
}

impl EntitySet {
    const BITS_PER_WORD: usize = 64;

    /// Create an empty entity set.
    pub fn empty() -> Self {
        Self { bits: Vec::new() }
    }

    /// Insert an entity ID into the set.
    pub fn insert(&mut self, entity: EntityId) {
        let word = entity.0 as usize / Self::BITS_PER_WORD;
        let bit = entity.0 as usize % Self::BITS_PER_WORD;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1u64 << bit;
    }

    /// Remove an entity ID from the set. Removing an absent ID is a no-op.
    pub fn remove(&mut self, entity: EntityId) {
        let word = entity.0 as usize / Self::BITS_PER_WORD;
        let bit = entity.0 as usize % Self::BITS_PER_WORD;
        if word < self.bits.len() {
            self.bits[word] &= !(1u64 << bit);
        }
    }

    /// Check whether the set contains an entity ID.
    pub fn contains(&self, entity: EntityId) -> bool {
        let word = entity.0 as usize / Self::BITS_PER_WORD;
        let bit = entity.0 as usize % Self::BITS_PER_WORD;
        word < self.bits.len() && (self.bits[word] & (1u64 << bit)) != 0
    }

    /// Number of entities in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Iterate the set's entity IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..Self::BITS_PER_WORD as u32)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| EntityId(word_idx as u32 * Self::BITS_PER_WORD as u32 + bit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_set_contains_nothing() {
        let set = EntitySet::empty();
        assert!(!set.contains(EntityId(0)));
        assert!(set.is_empty());
    }

    #[test]
    fn insert_then_contains() {
        let mut set = EntitySet::empty();
        set.insert(EntityId(5));
        set.insert(EntityId(64));
        assert!(set.contains(EntityId(5)));
        assert!(set.contains(EntityId(64)));
        assert!(!set.contains(EntityId(6)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_clears_membership() {
        let mut set = EntitySet::empty();
        set.insert(EntityId(7));
        set.remove(EntityId(7));
        assert!(!set.contains(EntityId(7)));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = EntitySet::empty();
        set.remove(EntityId(1000));
        assert!(set.is_empty());
    }

    #[test]
    fn iter_is_ascending() {
        let mut set = EntitySet::empty();
        for id in [100, 3, 65, 0] {
            set.insert(EntityId(id));
        }
        let ids: Vec<u32> = set.iter().map(|e| e.0).collect();
        assert_eq!(ids, vec![0, 3, 65, 100]);
    }

    proptest! {
        /// Membership after arbitrary insert/remove sequences matches a
        /// reference set.
        #[test]
        fn matches_reference_set(ops in proptest::collection::vec((any::<bool>(), 0u32..256), 0..64)) {
            let mut set = EntitySet::empty();
            let mut reference = std::collections::BTreeSet::new();
            for (insert, id) in ops {
                if insert {
                    set.insert(EntityId(id));
                    reference.insert(id);
                } else {
                    set.remove(EntityId(id));
                    reference.remove(&id);
                }
            }
            for id in 0u32..256 {
                prop_assert_eq!(set.contains(EntityId(id)), reference.contains(&id));
            }
            prop_assert_eq!(set.len(), reference.len());
        }
    }
}
