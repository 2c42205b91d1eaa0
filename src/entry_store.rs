//! Dense, insertion-ordered storage of `(hash, key, value)` triples.

use alloc::vec::Vec;

/// Three parallel sequences holding every live entry at positions
/// `0..len()`, with no gaps.
///
/// Physical order is insertion order, except where [`swap_remove`] moved the
/// last entry into a vacated position. The store knows nothing about key
/// equality; that belongs to the index built on top of it.
///
/// [`swap_remove`]: EntryStore::swap_remove
#[derive(Clone)]
pub struct EntryStore<K, V> {
    hashes: Vec<u32>,
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K, V> Default for EntryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EntryStore<K, V> {
    pub const fn new() -> Self {
        Self {
            hashes: Vec::new(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hashes: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Number of entries the backing sequences hold without reallocating.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.hashes
            .capacity()
            .min(self.keys.capacity())
            .min(self.values.capacity())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.hashes.reserve(additional);
        self.keys.reserve(additional);
        self.values.reserve(additional);
    }

    /// Appends an entry and returns its position. Backing storage doubles when
    /// full.
    #[inline]
    pub fn push(&mut self, hash: u32, key: K, value: V) -> usize {
        let pos = self.hashes.len();
        self.hashes.push(hash);
        self.keys.push(key);
        self.values.push(value);
        pos
    }

    #[inline]
    pub fn hash(&self, pos: usize) -> u32 {
        self.hashes[pos]
    }

    #[inline]
    pub fn key(&self, pos: usize) -> &K {
        &self.keys[pos]
    }

    #[inline]
    pub fn value(&self, pos: usize) -> &V {
        &self.values[pos]
    }

    #[inline]
    pub fn value_mut(&mut self, pos: usize) -> &mut V {
        &mut self.values[pos]
    }

    #[inline]
    pub fn get(&self, pos: usize) -> (u32, &K, &V) {
        (self.hashes[pos], &self.keys[pos], &self.values[pos])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: usize) -> (&K, &mut V) {
        (&self.keys[pos], &mut self.values[pos])
    }

    /// Replaces the value at `pos`, returning the old one.
    #[inline]
    pub fn set_value(&mut self, pos: usize, value: V) -> V {
        core::mem::replace(&mut self.values[pos], value)
    }

    /// Removes the entry at `pos` by moving the last entry into its place,
    /// shrinking the store by one. Returns the removed key and value.
    ///
    /// Only the moved entry changes position; the caller must re-point its
    /// index slot.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    #[inline]
    pub fn swap_remove(&mut self, pos: usize) -> (K, V) {
        self.hashes.swap_remove(pos);
        (self.keys.swap_remove(pos), self.values.swap_remove(pos))
    }

    pub fn hashes(&self) -> &[u32] {
        &self.hashes
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Splits into key and mutable value slices of equal length.
    pub fn split_mut(&mut self) -> (&[K], &mut [V]) {
        (&self.keys, &mut self.values)
    }

    /// Consumes the store into its key and value sequences.
    pub fn into_parts(self) -> (Vec<K>, Vec<V>) {
        (self.keys, self.values)
    }

    /// Heap bytes reserved by the backing sequences.
    #[cfg(any(test, feature = "stats"))]
    pub fn bytes(&self) -> usize {
        self.hashes.capacity() * core::mem::size_of::<u32>()
            + self.keys.capacity() * core::mem::size_of::<K>()
            + self.values.capacity() * core::mem::size_of::<V>()
    }
}
