//! Fixed-capacity record pool.
//!
//! All slots are created once at construction and linked into an intrusive
//! free stack through `next_free`. Acquire pops the head, release pushes it
//! back, both in O(1). No slot storage is created or dropped afterwards;
//! identifier buffers are cleared rather than freed so a reused slot keeps
//! its allocation.

use crate::category::VehicleCategory;

/// Number of records the monitor can hold at once.
pub const MAX_VEHICLES: usize = 1000;

/// Handle to a slot inside a [`RecordPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    /// Position of the slot in the backing array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A counted vehicle: identity is `(category, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleRecord {
    category: VehicleCategory,
    id: String,
    count: u32,
}

impl VehicleRecord {
    /// Category of the vehicle.
    #[must_use]
    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    /// Opaque identifier of the vehicle.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of times the vehicle was observed in the current epoch.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record one more observation.
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    fn assign(&mut self, category: VehicleCategory, id: &str) {
        self.category = category;
        self.id.clear();
        self.id.push_str(id);
        self.count = 1;
    }

    fn clear(&mut self) {
        self.category = VehicleCategory::default();
        self.id.clear();
        self.count = 0;
    }
}

/// Formats as `"<id> - <Category> (<count>)"`.
impl std::fmt::Display for VehicleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.category, self.count)
    }
}

#[derive(Debug, Default)]
struct Slot {
    record: VehicleRecord,
    next_free: Option<SlotId>,
    live: bool,
}

/// Fixed array of `N` record slots with a LIFO free stack.
#[derive(Debug)]
pub struct RecordPool<const N: usize = MAX_VEHICLES> {
    slots: Box<[Slot]>,
    free_head: Option<SlotId>,
    free_len: usize,
}

impl<const N: usize> RecordPool<N> {
    /// Create a pool with every slot free.
    ///
    /// Slot `0` sits on top of the free stack so the first acquisitions walk
    /// the array in order.
    #[must_use]
    pub fn new() -> Self {
        let slots = (0..N)
            .map(|i| Slot {
                next_free: i.checked_add(1).filter(|&next| next < N).map(SlotId),
                ..Slot::default()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            free_head: (N > 0).then_some(SlotId(0)),
            free_len: N,
        }
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of slots currently holding a record.
    #[must_use]
    pub fn live_len(&self) -> usize {
        N.saturating_sub(self.free_len)
    }

    /// Number of slots on the free stack.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free_len
    }

    /// Check whether every slot is live.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.free_head.is_none()
    }

    /// Take a free slot and initialize it with a first observation.
    ///
    /// Returns `None` when the pool is exhausted; this is an expected outcome
    /// for the caller to tally, not a failure of the pool.
    pub fn acquire(&mut self, category: VehicleCategory, id: &str) -> Option<SlotId> {
        let handle = self.free_head?;
        let slot = self.slots.get_mut(handle.0)?;

        self.free_head = slot.next_free.take();
        self.free_len = self.free_len.saturating_sub(1);
        slot.live = true;
        slot.record.assign(category, id);

        Some(handle)
    }

    /// Clear a live slot and push it back on the free stack.
    ///
    /// Returns `false` if the handle does not name a live slot, in which case
    /// nothing changes.
    pub fn release(&mut self, handle: SlotId) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return false;
        };
        if !slot.live {
            return false;
        }

        slot.record.clear();
        slot.live = false;
        slot.next_free = self.free_head;
        self.free_head = Some(handle);
        self.free_len = self.free_len.saturating_add(1);
        true
    }

    /// Get the record held by a live slot.
    #[must_use]
    pub fn get(&self, handle: SlotId) -> Option<&VehicleRecord> {
        self.slots
            .get(handle.0)
            .filter(|slot| slot.live)
            .map(|slot| &slot.record)
    }

    /// Get a mutable reference to the record held by a live slot.
    pub fn get_mut(&mut self, handle: SlotId) -> Option<&mut VehicleRecord> {
        self.slots
            .get_mut(handle.0)
            .filter(|slot| slot.live)
            .map(|slot| &mut slot.record)
    }
}

impl<const N: usize> Default for RecordPool<N> {
    fn default() -> Self {
        Self::new()
    }
}
