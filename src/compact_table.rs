//! The low-level compact table.
//!
//! [`CompactTable`] pairs an [`IndexTable`] with a dense entry store. The
//! caller supplies a 32-bit hash and an equality predicate for every
//! operation, so the table never hashes keys itself;
//! [`CompactHashMap`](crate::CompactHashMap) layers a `BuildHasher` on top.

use alloc::vec;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::entry_store::EntryStore;
use crate::index_table::IndexTable;
use crate::index_table::MIN_CAPACITY;
use crate::index_table::Slot;
#[cfg(any(test, feature = "stats"))]
use crate::index_table::Width;
use crate::probe::ProbeSeq;

/// Smallest index table that holds `entries` entries without exceeding the
/// two-thirds load limit.
#[inline]
fn index_capacity_for(entries: usize) -> usize {
    entries
        .checked_mul(3)
        .map(|n| n.div_ceil(2))
        .and_then(usize::checked_next_power_of_two)
        .expect("capacity overflow")
        .max(MIN_CAPACITY)
}

/// Whether `filled` used-or-tombstoned slots overload a table of `capacity`.
#[inline(always)]
fn over_load_limit(filled: usize, capacity: usize) -> bool {
    filled * 3 > capacity * 2
}

/// First empty slot on `hash`'s probe walk.
#[inline]
fn first_empty(index: &IndexTable, hash: u32) -> usize {
    ProbeSeq::new(hash, index.mask())
        .find(|&slot| index.slot(slot) == Slot::Empty)
        .unwrap_or_else(|| unreachable!("probe sequences never end"))
}

/// Outcome of walking a probe sequence for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// The key lives at entry position `pos`, referenced from `slot`.
    Found { pos: usize, slot: usize },
    /// The key is absent; `slot` is the empty slot that ended the walk.
    Free { slot: usize },
    /// The key is absent; `slot` is the first tombstone seen on the walk and
    /// can be reused.
    Tombstone { slot: usize },
}

/// Test/stats-only: low-level statistics for a [`CompactTable`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Slots that are live or tombstoned.
    pub filled: usize,
    /// Slots holding a tombstone.
    pub tombstones: usize,
    /// Length of the index table.
    pub index_capacity: usize,
    /// Slot width of the index table.
    pub width: Width,
    /// `filled / index_capacity`.
    pub load_factor: f64,
    /// Bytes taken by index slots.
    pub index_bytes: usize,
    /// Bytes reserved by the entry store.
    pub entry_bytes: usize,
    /// Entry store bytes beyond the live entries.
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Compact Table Debug Statistics ===");
        println!(
            "Population: {} live, {} tombstones, {}/{} slots filled ({:.2}% load)",
            self.populated,
            self.tombstones,
            self.filled,
            self.index_capacity,
            self.load_factor * 100.0
        );
        println!(
            "Index: {:?} slots, {} bytes",
            self.width, self.index_bytes
        );
        println!("Entries: {} bytes", self.entry_bytes);
        let total = self.index_bytes + self.entry_bytes;
        println!(
            "Memory: {} bytes total, {} bytes wasted ({:.02}%)",
            total,
            self.wasted_bytes,
            if total == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / total as f64) * 100.0
            }
        );
    }
}

/// Test/stats-only: how many probe steps each live entry sits away from its
/// first candidate slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `counts[n]` is the number of entries found after `n` extra probes.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Longest probe walk any entry needs.
    pub fn max_probe(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "probe histogram ({} entries):",
            self.counts.iter().sum::<usize>()
        );
        for (steps, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", steps, "█".repeat(width), count);
        }
    }
}

/// An insertion-ordered hash table over `(hash, key, value)` entries.
///
/// Entries live contiguously in insertion order. An open-addressing index of
/// minimal slot width maps hashes to entry positions, so the per-entry cost
/// is the key, the value, a 32-bit hash and 1.5 to 3 index slots of 1, 2 or
/// 4 bytes.
///
/// Removal swaps the last entry into the vacated position. Iteration order is
/// therefore insertion order until the first removal, after which only the
/// moved entry is out of place.
///
/// Structural changes (a new key, a removal, a clear) bump a version counter
/// that [`Cursor`](crate::cursor::Cursor)s use to detect modification.
/// Overwriting the value of an existing key does not.
///
/// # Examples
///
/// ```rust
/// # use compact_hash::compact_table::CompactTable;
/// #
/// let mut table: CompactTable<u32, u32> = CompactTable::new();
/// let hash = |n: u32| n.wrapping_mul(0x9e37_79b9);
///
/// for n in [3u32, 1, 2] {
///     table.entry(hash(n), |&k| k == n).or_insert(n, n * 10);
/// }
///
/// assert_eq!(table.find(hash(1), |&k| k == 1), Some((&1, &10)));
/// let keys: Vec<u32> = table.iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, [3, 1, 2]);
/// ```
#[derive(Clone)]
pub struct CompactTable<K, V> {
    index: IndexTable,
    entries: EntryStore<K, V>,
    filled: usize,
    version: u64,
}

impl<K, V> Debug for CompactTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompactTable")
            .field("index", &self.index)
            .field("used", &self.entries.len())
            .field("filled", &self.filled)
            .field("version", &self.version)
            .finish()
    }
}

impl<K, V> Default for CompactTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CompactTable<K, V> {
    /// Creates an empty table with an index of the minimum size, 8 slots.
    pub fn new() -> Self {
        Self {
            index: IndexTable::make(MIN_CAPACITY),
            entries: EntryStore::new(),
            filled: 0,
            version: 0,
        }
    }

    /// Creates an empty table that holds `capacity` entries before its index
    /// needs rebuilding.
    ///
    /// ```rust
    /// # use compact_hash::compact_table::CompactTable;
    /// let table: CompactTable<u64, u64> = CompactTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// assert!(table.index_capacity().is_power_of_two());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: IndexTable::make(index_capacity_for(capacity)),
            entries: EntryStore::with_capacity(capacity),
            filled: 0,
            version: 0,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that can be inserted, counting the ones already
    /// present, before the index is rebuilt.
    ///
    /// Tombstones left by removals count against this until the next rebuild.
    pub fn capacity(&self) -> usize {
        let tombstones = self.filled - self.entries.len();
        (self.index.capacity() * 2 / 3).saturating_sub(tombstones)
    }

    /// Length of the index table, always a power of two of at least 8.
    pub fn index_capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Structural modification counter.
    ///
    /// Increases on every insertion of a new key, every removal and every
    /// clear. Replacing the value of an existing key leaves it unchanged.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Walks the probe sequence for `hash`, returning where the matching key
    /// lives or, if absent, the slot an insertion should use.
    fn lookup(&self, hash: u32, mut eq: impl FnMut(&K) -> bool) -> Lookup {
        debug_assert!(self.filled < self.index.capacity());

        let mut reusable = None;
        for slot in ProbeSeq::new(hash, self.index.mask()) {
            match self.index.slot(slot) {
                Slot::Empty => {
                    return match reusable {
                        Some(slot) => Lookup::Tombstone { slot },
                        None => Lookup::Free { slot },
                    };
                }
                Slot::Tombstone => {
                    reusable.get_or_insert(slot);
                }
                Slot::Entry(pos) => {
                    if self.entries.hash(pos) == hash && eq(self.entries.key(pos)) {
                        return Lookup::Found { pos, slot };
                    }
                }
            }
        }

        unreachable!("probe sequences never end")
    }

    /// Finds the slot that references entry position `pos`, walking the probe
    /// sequence of the entry's `hash`. Returns `None` if an empty slot is
    /// reached first, which means `pos` is not indexed.
    fn lookup_for_index(&self, pos: usize, hash: u32) -> Option<usize> {
        for slot in ProbeSeq::new(hash, self.index.mask()) {
            match self.index.slot(slot) {
                Slot::Entry(found) if found == pos => return Some(slot),
                Slot::Empty => return None,
                _ => {}
            }
        }

        unreachable!("probe sequences never end")
    }

    /// Like [`lookup_for_index`](Self::lookup_for_index), for positions known
    /// to be live.
    #[inline]
    fn slot_of_live(&self, pos: usize) -> usize {
        let hash = self.entries.hash(pos);
        match self.lookup_for_index(pos, hash) {
            Some(slot) => slot,
            None => panic!("index table lost track of live entry at position {pos}"),
        }
    }

    /// Returns the position of the entry matching `hash` and `eq`.
    #[inline]
    pub fn find_index(&self, hash: u32, eq: impl FnMut(&K) -> bool) -> Option<usize> {
        match self.lookup(hash, eq) {
            Lookup::Found { pos, .. } => Some(pos),
            Lookup::Free { .. } | Lookup::Tombstone { .. } => None,
        }
    }

    /// Returns the key and value of the entry matching `hash` and `eq`.
    #[inline]
    pub fn find(&self, hash: u32, eq: impl FnMut(&K) -> bool) -> Option<(&K, &V)> {
        self.find_index(hash, eq).map(|pos| {
            let (_, key, value) = self.entries.get(pos);
            (key, value)
        })
    }

    /// Returns the key and a mutable reference to the value of the entry
    /// matching `hash` and `eq`.
    #[inline]
    pub fn find_mut(&mut self, hash: u32, eq: impl FnMut(&K) -> bool) -> Option<(&K, &mut V)> {
        self.find_index(hash, eq)
            .map(|pos| self.entries.get_mut(pos))
    }

    /// Returns the entry at `pos` in iteration order.
    #[inline]
    pub fn get_index(&self, pos: usize) -> Option<(&K, &V)> {
        if pos >= self.entries.len() {
            return None;
        }
        let (_, key, value) = self.entries.get(pos);
        Some((key, value))
    }

    /// Returns the entry at `pos` in iteration order, with a mutable value.
    #[inline]
    pub fn get_index_mut(&mut self, pos: usize) -> Option<(&K, &mut V)> {
        if pos >= self.entries.len() {
            return None;
        }
        Some(self.entries.get_mut(pos))
    }

    /// Looks up the entry matching `hash` and `eq` for in-place manipulation.
    ///
    /// ```rust
    /// # use compact_hash::compact_table::CompactTable;
    /// # use compact_hash::compact_table::Entry;
    /// let mut table: CompactTable<&str, u32> = CompactTable::new();
    ///
    /// match table.entry(7, |&k| k == "seven") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("seven", 7);
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// match table.entry(7, |&k| k == "seven") {
    ///     Entry::Occupied(mut entry) => assert_eq!(entry.insert(8), 7),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert_eq!(table.find(7, |&k| k == "seven"), Some((&"seven", &8)));
    /// ```
    #[inline]
    pub fn entry(&mut self, hash: u32, eq: impl FnMut(&K) -> bool) -> Entry<'_, K, V> {
        match self.lookup(hash, eq) {
            Lookup::Found { pos, slot } => Entry::Occupied(OccupiedEntry {
                table: self,
                pos,
                slot,
            }),
            Lookup::Free { slot } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                slot,
                reuses_tombstone: false,
            }),
            Lookup::Tombstone { slot } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                slot,
                reuses_tombstone: true,
            }),
        }
    }

    /// Removes the entry matching `hash` and `eq`, returning its key and
    /// value.
    ///
    /// The last entry in iteration order takes the removed entry's position.
    #[inline]
    pub fn remove(&mut self, hash: u32, eq: impl FnMut(&K) -> bool) -> Option<(K, V)> {
        match self.lookup(hash, eq) {
            Lookup::Found { pos, slot } => Some(self.remove_at(slot, pos)),
            Lookup::Free { .. } | Lookup::Tombstone { .. } => None,
        }
    }

    /// Removes the entry at position `pos` in iteration order, moving the last
    /// entry into its place. Returns `None` if `pos` is out of bounds.
    ///
    /// ```rust
    /// # use compact_hash::compact_table::CompactTable;
    /// let mut table: CompactTable<u32, ()> = CompactTable::new();
    /// for n in 0..4u32 {
    ///     table.entry(n, |&k| k == n).or_insert(n, ());
    /// }
    ///
    /// assert_eq!(table.swap_remove_index(1), Some((1, ())));
    /// let keys: Vec<u32> = table.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [0, 3, 2]);
    /// ```
    pub fn swap_remove_index(&mut self, pos: usize) -> Option<(K, V)> {
        if pos >= self.entries.len() {
            return None;
        }
        let slot = self.slot_of_live(pos);
        Some(self.remove_at(slot, pos))
    }

    /// Tombstones `slot`, then keeps the entry store dense by moving the last
    /// entry into `pos` and re-pointing its slot.
    fn remove_at(&mut self, slot: usize, pos: usize) -> (K, V) {
        self.index.set_tombstone(slot);

        let last = self.entries.len() - 1;
        if pos != last {
            let moved = self.slot_of_live(last);
            debug_assert_ne!(moved, slot);
            self.index.set_entry(moved, pos);
        }

        self.version += 1;
        self.entries.swap_remove(pos)
    }

    /// Removes every entry and shrinks the index back to 8 slots.
    pub fn clear(&mut self) {
        self.index = IndexTable::make(MIN_CAPACITY);
        self.entries = EntryStore::new();
        self.filled = 0;
        self.version += 1;
    }

    /// Reserves room for at least `additional` more entries without another
    /// index rebuild.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);

        let filled = self.filled.checked_add(additional).expect("capacity overflow");
        if over_load_limit(filled, self.index.capacity()) {
            let used = self.entries.len() + additional;
            self.resize(index_capacity_for(used));
        }
    }

    /// Rebuilds the index at the next power of two at or above
    /// `min_capacity`, dropping every tombstone.
    #[cold]
    #[inline(never)]
    fn resize(&mut self, min_capacity: usize) {
        let capacity = min_capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .expect("capacity overflow");

        let mut index = IndexTable::make(capacity);
        for (pos, &hash) in self.entries.hashes().iter().enumerate() {
            let slot = first_empty(&index, hash);
            index.set_entry(slot, pos);
        }

        self.index = index;
        self.filled = self.entries.len();
        debug_assert!(!over_load_limit(self.filled, self.index.capacity()));
    }

    /// Returns an iterator over the entries in iteration order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: self.entries.keys().iter(),
            values: self.entries.values().iter(),
        }
    }

    /// Returns an iterator over the entries in iteration order, with mutable
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (keys, values) = self.entries.split_mut();
        IterMut {
            keys: keys.iter(),
            values: values.iter_mut(),
        }
    }

    /// Removes every entry, yielding them in iteration order.
    ///
    /// The table is empty as soon as this returns, even if the iterator is
    /// dropped early.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        let entries = core::mem::take(&mut self.entries);
        self.clear();
        Drain {
            inner: IntoIter::from_store(entries),
            _table: PhantomData,
        }
    }

    /// Returns the values in iteration order, as a slice.
    pub fn values_slice(&self) -> &[V] {
        self.entries.values()
    }

    /// Test/stats-only: probe distances of every live entry.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = vec![0usize; 1];
        for (pos, &hash) in self.entries.hashes().iter().enumerate() {
            let steps = ProbeSeq::new(hash, self.index.mask())
                .position(|slot| self.index.slot(slot) == Slot::Entry(pos))
                .unwrap_or_else(|| unreachable!("probe sequences never end"));
            if steps >= counts.len() {
                counts.resize(steps + 1, 0);
            }
            counts[steps] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Test/stats-only: detailed utilization statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let live_bytes = self.entries.len()
            * (core::mem::size_of::<u32>() + core::mem::size_of::<K>() + core::mem::size_of::<V>());
        DebugStats {
            populated: self.entries.len(),
            filled: self.filled,
            tombstones: self.index.tombstones(),
            index_capacity: self.index.capacity(),
            width: self.index.width(),
            load_factor: self.filled as f64 / self.index.capacity() as f64,
            index_bytes: self.index.bytes(),
            entry_bytes: self.entries.bytes(),
            wasted_bytes: self.entries.bytes() - live_bytes,
        }
    }

    /// Test-only: checks every structural invariant.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let used = self.entries.len();
        assert!(used <= self.filled, "used {used} > filled {}", self.filled);
        assert!(self.filled < self.index.capacity());
        assert!(self.index.capacity().is_power_of_two());
        assert!(self.index.capacity() >= MIN_CAPACITY);

        let mut referenced = vec![false; used];
        let mut occupied = 0;
        for slot in 0..self.index.capacity() {
            match self.index.slot(slot) {
                Slot::Entry(pos) => {
                    assert!(pos < used, "slot {slot} points past the end");
                    assert!(!referenced[pos], "position {pos} indexed twice");
                    referenced[pos] = true;
                    occupied += 1;
                }
                Slot::Tombstone => occupied += 1,
                Slot::Empty => {}
            }
        }
        assert_eq!(occupied, self.filled);
        assert!(referenced.iter().all(|&r| r));

        for pos in 0..used {
            let slot = self.lookup_for_index(pos, self.entries.hash(pos));
            assert!(slot.is_some(), "position {pos} unreachable by probing");
        }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// Constructed by [`CompactTable::entry`].
pub enum Entry<'a, K, V> {
    /// The key is not present in the table.
    Vacant(VacantEntry<'a, K, V>),
    /// The key is present in the table.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `key` and `value` if the entry is vacant, and returns a mutable
    /// reference to the value now stored.
    ///
    /// If the entry is occupied, `key` and `value` are dropped.
    pub fn or_insert(self, key: K, value: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(key, value),
        }
    }

    /// Inserts the pair produced by `default` if the entry is vacant.
    pub fn or_insert_with(self, default: impl FnOnce() -> (K, V)) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (key, value) = default();
                entry.insert(key, value)
            }
        }
    }
}

/// A view into a vacant entry in the table.
pub struct VacantEntry<'a, K, V> {
    table: &'a mut CompactTable<K, V>,
    hash: u32,
    slot: usize,
    reuses_tombstone: bool,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Appends the entry to the end of the iteration order and returns a
    /// mutable reference to its value.
    ///
    /// May rebuild the index at a larger size. The caller must pass a key that
    /// matches the hash and predicate used to find this entry.
    pub fn insert(mut self, key: K, value: V) -> &'a mut V {
        let pos = self.insert_index(key, value);
        let table = self.table;
        table.entries.value_mut(pos)
    }

    /// Like [`insert`](Self::insert), returning the new entry's position.
    pub fn insert_index(&mut self, key: K, value: V) -> usize {
        let table = &mut *self.table;
        let pos = table.entries.push(self.hash, key, value);
        table.index.set_entry(self.slot, pos);
        table.version += 1;

        if !self.reuses_tombstone {
            table.filled += 1;
            if over_load_limit(table.filled, table.index.capacity()) {
                table.resize(table.entries.len().saturating_mul(4));
            }
        }
        pos
    }
}

/// A view into an occupied entry in the table.
pub struct OccupiedEntry<'a, K, V> {
    table: &'a mut CompactTable<K, V>,
    pos: usize,
    slot: usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Position of the entry in iteration order.
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Gets a reference to the stored key.
    pub fn key(&self) -> &K {
        self.table.entries.key(self.pos)
    }

    /// Gets a reference to the value.
    pub fn get(&self) -> &V {
        self.table.entries.value(self.pos)
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.entries.value_mut(self.pos)
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        table.entries.value_mut(self.pos)
    }

    /// Replaces the value, returning the old one. Not a structural change.
    pub fn insert(&mut self, value: V) -> V {
        self.table.entries.set_value(self.pos, value)
    }

    /// Removes the entry, moving the last entry into its position.
    pub fn remove(self) -> (K, V) {
        self.table.remove_at(self.slot, self.pos)
    }
}

/// An iterator over the entries of a [`CompactTable`], in iteration order.
pub struct Iter<'a, K, V> {
    keys: core::slice::Iter<'a, K>,
    values: core::slice::Iter<'a, V>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?, self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`CompactTable`].
pub struct IterMut<'a, K, V> {
    keys: core::slice::Iter<'a, K>,
    values: core::slice::IterMut<'a, V>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?, self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`CompactTable`].
pub struct IntoIter<K, V> {
    keys: vec::IntoIter<K>,
    values: vec::IntoIter<V>,
}

impl<K, V> IntoIter<K, V> {
    fn from_store(entries: EntryStore<K, V>) -> Self {
        let (keys, values) = entries.into_parts();
        IntoIter {
            keys: keys.into_iter(),
            values: values.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?, self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for CompactTable<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::from_store(self.entries)
    }
}

/// A draining iterator over the entries of a [`CompactTable`].
///
/// Created by [`CompactTable::drain`]. The table is already empty while this
/// is alive; dropping it drops the remaining entries.
pub struct Drain<'a, K, V> {
    inner: IntoIter<K, V>,
    _table: PhantomData<&'a mut CompactTable<K, V>>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
impl<K, V> FusedIterator for Drain<'_, K, V> {}
