//! Two orderings over the same live pool slots.
//!
//! Each live slot is a member of exactly one category collection (append
//! order, never reordered) and of the global collection (ascending by
//! identifier, ties kept in insertion order). Both collections store
//! [`SlotId`]s into the [`RecordPool`]; record data is never duplicated.

use crate::category::{CATEGORY_COUNT, VehicleCategory};
use crate::pool::{MAX_VEHICLES, RecordPool, SlotId, VehicleRecord};

/// Per-category and global orderings over pool slots.
#[derive(Debug)]
pub struct DualIndex<const N: usize = MAX_VEHICLES> {
    by_category: [heapless::Vec<SlotId, N>; CATEGORY_COUNT],
    by_id: heapless::Vec<SlotId, N>,
}

impl<const N: usize> DualIndex<N> {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_category: [heapless::Vec::new(), heapless::Vec::new(), heapless::Vec::new()],
            by_id: heapless::Vec::new(),
        }
    }

    fn category_slots(&self, category: VehicleCategory) -> &[SlotId] {
        self.by_category
            .get(category.index())
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    /// Find the slot holding `(category, id)`.
    ///
    /// Linear scan over that category's collection.
    #[must_use]
    pub fn find(&self, pool: &RecordPool<N>, category: VehicleCategory, id: &str) -> Option<SlotId> {
        self.category_slots(category)
            .iter()
            .copied()
            .find(|&slot| pool.get(slot).is_some_and(|record| record.id() == id))
    }

    /// Link a freshly acquired slot into both orderings.
    ///
    /// The slot is appended to its category collection and placed in the
    /// global collection before the first record whose identifier is strictly
    /// greater. Returns `false`, leaving the index untouched, if the slot is
    /// not live or a collection is full.
    pub fn insert(&mut self, pool: &RecordPool<N>, slot: SlotId) -> bool {
        let Some(record) = pool.get(slot) else {
            return false;
        };
        let new_id = record.id();

        // Monotonic identifiers land at the tail without a search
        let position = match self.by_id.last().and_then(|&tail| pool.get(tail)) {
            Some(tail) if tail.id() > new_id => self
                .by_id
                .partition_point(|&s| pool.get(s).is_some_and(|r| r.id() <= new_id)),
            _ => self.by_id.len(),
        };

        let Some(category_slots) = self.by_category.get_mut(record.category().index()) else {
            return false;
        };
        if category_slots.push(slot).is_err() {
            return false;
        }
        if self.by_id.insert(position, slot).is_err() {
            category_slots.pop();
            return false;
        }
        true
    }

    /// Detach every slot from both orderings and release it to the pool.
    ///
    /// Returns the number of slots released.
    pub fn remove_all(&mut self, pool: &mut RecordPool<N>) -> usize {
        let mut released = 0usize;
        for slots in &mut self.by_category {
            for &slot in slots.iter() {
                if pool.release(slot) {
                    released = released.saturating_add(1);
                }
            }
            slots.clear();
        }
        self.by_id.clear();
        released
    }

    /// Number of records in the global collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of records of one category.
    #[must_use]
    pub fn category_len(&self, category: VehicleCategory) -> usize {
        self.category_slots(category).len()
    }

    /// Records of one category in first-observed order.
    pub fn iter_category<'a>(
        &'a self,
        pool: &'a RecordPool<N>,
        category: VehicleCategory,
    ) -> impl Iterator<Item = &'a VehicleRecord> + 'a {
        self.category_slots(category)
            .iter()
            .filter_map(move |&slot| pool.get(slot))
    }

    /// All records in global identifier order.
    pub fn iter_global<'a>(
        &'a self,
        pool: &'a RecordPool<N>,
    ) -> impl Iterator<Item = &'a VehicleRecord> + 'a {
        self.by_id.iter().filter_map(move |&slot| pool.get(slot))
    }

    /// Statistics lines for one category.
    #[must_use]
    pub fn snapshot_category(&self, pool: &RecordPool<N>, category: VehicleCategory) -> Vec<String> {
        self.iter_category(pool, category)
            .map(ToString::to_string)
            .collect()
    }

    /// Statistics lines for every record in global order.
    #[must_use]
    pub fn snapshot_all(&self, pool: &RecordPool<N>) -> Vec<String> {
        self.iter_global(pool).map(ToString::to_string).collect()
    }

    /// Check the structural invariants against the pool.
    ///
    /// - every indexed slot is live and the live count matches
    /// - category sizes sum to the global size
    /// - each slot sits in the collection of its own category
    /// - the global collection is sorted by identifier
    #[must_use]
    pub fn is_consistent(&self, pool: &RecordPool<N>) -> bool {
        let category_total: usize = self.by_category.iter().map(|slots| slots.len()).sum();
        if category_total != self.by_id.len() || self.by_id.len() != pool.live_len() {
            return false;
        }

        let categories_ok = VehicleCategory::all().all(|category| {
            self.category_slots(category)
                .iter()
                .all(|&slot| pool.get(slot).is_some_and(|r| r.category() == category))
        });
        if !categories_ok {
            return false;
        }

        let ids: Option<Vec<&str>> = self
            .by_id
            .iter()
            .map(|&slot| pool.get(slot).map(VehicleRecord::id))
            .collect();
        ids.is_some_and(|ids| ids.windows(2).all(|pair| pair.first() <= pair.get(1)))
    }
}

impl<const N: usize> Default for DualIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}
