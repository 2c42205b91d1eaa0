//! A fail-fast, removal-capable cursor over a [`CompactHashMap`].
//!
//! A [`Cursor`] does not borrow the map between steps. Every call takes the
//! map explicitly and first checks that the map's structural version still
//! matches the one the cursor recorded; if anything other than the cursor
//! itself inserted a new key, removed an entry or cleared the map in the
//! meantime, the step fails with [`CursorError::ConcurrentModification`].
//!
//! ```rust
//! # use compact_hash::CompactHashMap;
//! # use compact_hash::CursorError;
//! let mut map: CompactHashMap<u32, &str> = [(1, "a"), (2, "b"), (3, "c")].into();
//!
//! let mut cursor = map.cursor();
//! while cursor.has_next() {
//!     let (&key, _) = cursor.next(&map)?;
//!     if key == 2 {
//!         cursor.remove(&mut map)?;
//!     }
//! }
//! assert_eq!(map.len(), 2);
//!
//! let mut stale = map.cursor();
//! map.insert(4, "d");
//! assert_eq!(stale.next(&map), Err(CursorError::ConcurrentModification));
//! # Ok::<(), CursorError>(())
//! ```

use crate::error::CursorError;
use crate::hash_map::CompactHashMap;

/// A position in the iteration order of a [`CompactHashMap`], plus the
/// structural version it was last synchronized with.
///
/// Created by [`CompactHashMap::cursor`]. A cursor must only be used with the
/// map that created it.
///
/// Removing through the cursor moves the last entry into the removed
/// position and steps the cursor back one, so the moved entry is yielded
/// next. Every entry present when the cursor started, and not removed, is
/// yielded exactly once.
#[derive(Debug, Clone)]
pub struct Cursor {
    next_pos: usize,
    version: u64,
    len: usize,
    can_remove: bool,
}

impl Cursor {
    pub(crate) fn new<K, V, S>(map: &CompactHashMap<K, V, S>) -> Self {
        Self {
            next_pos: 0,
            version: map.version(),
            len: map.len(),
            can_remove: false,
        }
    }

    #[inline]
    fn check<K, V, S>(&self, map: &CompactHashMap<K, V, S>) -> Result<(), CursorError> {
        if map.version() == self.version {
            Ok(())
        } else {
            Err(CursorError::ConcurrentModification)
        }
    }

    /// Returns `true` if [`next`](Self::next) has an entry to yield, as of the
    /// map size recorded at the last synchronization.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.next_pos < self.len
    }

    /// Position in iteration order of the entry the next call yields.
    #[inline]
    pub fn position(&self) -> usize {
        self.next_pos
    }

    /// Yields the next entry.
    ///
    /// # Errors
    ///
    /// [`CursorError::ConcurrentModification`] if the map was structurally
    /// modified outside this cursor, checked first.
    /// [`CursorError::Exhausted`] if every entry has been yielded.
    pub fn next<'m, K, V, S>(
        &mut self,
        map: &'m CompactHashMap<K, V, S>,
    ) -> Result<(&'m K, &'m V), CursorError> {
        self.check(map)?;
        if !self.has_next() {
            return Err(CursorError::Exhausted);
        }

        let entry = map.get_index(self.next_pos).ok_or(CursorError::Exhausted)?;
        self.next_pos += 1;
        self.can_remove = true;
        Ok(entry)
    }

    /// Yields only the key of the next entry. Fails like [`next`](Self::next).
    pub fn next_key<'m, K, V, S>(
        &mut self,
        map: &'m CompactHashMap<K, V, S>,
    ) -> Result<&'m K, CursorError> {
        self.next(map).map(|(key, _)| key)
    }

    /// Yields only the value of the next entry. Fails like
    /// [`next`](Self::next).
    pub fn next_value<'m, K, V, S>(
        &mut self,
        map: &'m CompactHashMap<K, V, S>,
    ) -> Result<&'m V, CursorError> {
        self.next(map).map(|(_, value)| value)
    }

    /// Removes the entry most recently yielded by [`next`](Self::next) and
    /// returns it.
    ///
    /// The cursor resynchronizes with the map afterwards, so it stays valid.
    ///
    /// # Errors
    ///
    /// [`CursorError::NothingToRemove`] if `next` has not yielded an entry
    /// since the cursor was created or since the last removal, checked first.
    /// [`CursorError::ConcurrentModification`] if the map was structurally
    /// modified outside this cursor.
    pub fn remove<K, V, S>(
        &mut self,
        map: &mut CompactHashMap<K, V, S>,
    ) -> Result<(K, V), CursorError> {
        if !self.can_remove {
            return Err(CursorError::NothingToRemove);
        }
        self.check(map)?;

        let pos = self.next_pos - 1;
        let removed = map
            .swap_remove_index(pos)
            .ok_or(CursorError::ConcurrentModification)?;

        self.next_pos = pos;
        self.version = map.version();
        self.len = map.len();
        self.can_remove = false;
        Ok(removed)
    }
}
