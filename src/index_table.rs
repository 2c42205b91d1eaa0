//! The open-addressing index: slots referencing positions in the entry store.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Debug;

/// Raw marker for a slot that has never held an entry.
pub const EMPTY: i32 = -1;

/// Raw marker for a slot whose entry was removed. Lookups walk past it;
/// insertions may reuse it.
pub const TOMBSTONE: i32 = -2;

/// Largest table length stored with 8-bit slots. Positions and sentinels must
/// both fit, so the sign bit is reserved.
const BYTE_LIMIT: usize = i8::MAX as usize;

/// Largest table length stored with 16-bit slots.
const SHORT_LIMIT: usize = i16::MAX as usize;

/// Smallest table the map ever allocates.
pub const MIN_CAPACITY: usize = 8;

/// Decoded contents of one index slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Never used since the last rebuild; terminates probe walks.
    Empty,
    /// Previously used; probe walks continue past it.
    Tombstone,
    /// Refers to a live position in the entry store.
    Entry(usize),
}

/// Physical width of the slots of an [`IndexTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 8-bit signed slots, for tables of at most 127 slots.
    Byte,
    /// 16-bit signed slots, for tables of at most 32767 slots.
    Short,
    /// 32-bit signed slots.
    Int,
}

impl Width {
    fn for_capacity(capacity: usize) -> Self {
        if capacity <= BYTE_LIMIT {
            Width::Byte
        } else if capacity <= SHORT_LIMIT {
            Width::Short
        } else {
            Width::Int
        }
    }

    /// Size in bytes of a single slot.
    pub fn bytes(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Short => 2,
            Width::Int => 4,
        }
    }
}

/// A power-of-two array of slots, stored at the narrowest width that can hold
/// every position below its length plus the two sentinels.
///
/// The width is fixed for the lifetime of a table. Growing past a width
/// boundary means building a new table with [`IndexTable::make`] and
/// re-inserting every position.
#[derive(Clone)]
pub enum IndexTable {
    /// Slots of tables up to 127 long.
    Byte(Box<[i8]>),
    /// Slots of tables up to 32767 long.
    Short(Box<[i16]>),
    /// Slots of everything larger.
    Int(Box<[i32]>),
}

impl Debug for IndexTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexTable")
            .field("width", &self.width())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl IndexTable {
    /// Allocates a table of `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two, or if its positions would
    /// not fit in a 32-bit slot.
    pub fn make(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two(), "index capacity must be a power of two");
        assert!(
            capacity <= i32::MAX as usize + 1,
            "index capacity overflow: {capacity} slots"
        );

        match Width::for_capacity(capacity) {
            Width::Byte => IndexTable::Byte(vec![EMPTY as i8; capacity].into_boxed_slice()),
            Width::Short => IndexTable::Short(vec![EMPTY as i16; capacity].into_boxed_slice()),
            Width::Int => IndexTable::Int(vec![EMPTY; capacity].into_boxed_slice()),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        match self {
            IndexTable::Byte(slots) => slots.len(),
            IndexTable::Short(slots) => slots.len(),
            IndexTable::Int(slots) => slots.len(),
        }
    }

    /// `capacity - 1`, for masking probe candidates.
    #[inline]
    pub fn mask(&self) -> usize {
        self.capacity() - 1
    }

    /// The slot width this table was built with.
    #[inline]
    pub fn width(&self) -> Width {
        match self {
            IndexTable::Byte(_) => Width::Byte,
            IndexTable::Short(_) => Width::Short,
            IndexTable::Int(_) => Width::Int,
        }
    }

    /// Heap bytes taken by the slots.
    pub fn bytes(&self) -> usize {
        self.capacity() * self.width().bytes()
    }

    /// Reads the raw value of `slot`: a position, [`EMPTY`] or [`TOMBSTONE`].
    #[inline]
    pub fn get(&self, slot: usize) -> i32 {
        match self {
            IndexTable::Byte(slots) => slots[slot] as i32,
            IndexTable::Short(slots) => slots[slot] as i32,
            IndexTable::Int(slots) => slots[slot],
        }
    }

    /// Writes the raw value of `slot`.
    ///
    /// `value` must be a sentinel or a position below [`capacity`], which
    /// the width was chosen to hold.
    ///
    /// [`capacity`]: IndexTable::capacity
    #[inline]
    pub fn set(&mut self, slot: usize, value: i32) {
        debug_assert!(value >= TOMBSTONE && (value as i64) < self.capacity() as i64);

        match self {
            IndexTable::Byte(slots) => slots[slot] = value as i8,
            IndexTable::Short(slots) => slots[slot] = value as i16,
            IndexTable::Int(slots) => slots[slot] = value,
        }
    }

    /// Reads `slot` as a [`Slot`].
    #[inline]
    pub fn slot(&self, slot: usize) -> Slot {
        match self.get(slot) {
            EMPTY => Slot::Empty,
            TOMBSTONE => Slot::Tombstone,
            pos => Slot::Entry(pos as usize),
        }
    }

    /// Points `slot` at entry-store position `pos`.
    #[inline]
    pub fn set_entry(&mut self, slot: usize, pos: usize) {
        self.set(slot, pos as i32);
    }

    /// Marks `slot` as removed.
    #[inline]
    pub fn set_tombstone(&mut self, slot: usize) {
        self.set(slot, TOMBSTONE);
    }

    /// Counts slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        (0..self.capacity())
            .filter(|&slot| self.get(slot) == TOMBSTONE)
            .count()
    }
}

impl Default for IndexTable {
    fn default() -> Self {
        IndexTable::make(MIN_CAPACITY)
    }
}
