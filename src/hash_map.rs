use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::DefaultHashBuilder;
use crate::compact_table;
use crate::compact_table::CompactTable;
use crate::compact_table::Entry as TableEntry;
use crate::cursor::Cursor;
use crate::transform::Transformed;

/// Hashes `key` with `hash_builder` and folds the result to the 32 bits the
/// table stores per entry.
#[inline]
pub(crate) fn make_hash<Q, S>(hash_builder: &S, key: &Q) -> u32
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    let hash = hash_builder.hash_one(key);
    (hash ^ (hash >> 32)) as u32
}

/// Key equality that short-circuits on identity before calling `Eq`.
#[inline]
fn equivalent_key<Q, K>(key: &Q) -> impl Fn(&K) -> bool + '_
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    move |candidate| {
        let candidate: &Q = candidate.borrow();
        core::ptr::eq(candidate, key) || candidate == key
    }
}

/// An insertion-ordered hash map with a compact memory layout.
///
/// Entries are stored densely in insertion order, with a separate
/// open-addressing index whose slots are 1, 2 or 4 bytes wide depending on
/// the table size. Keys implement `Hash + Eq`, and a configurable hasher
/// builder `S` hashes them.
///
/// Iteration visits entries in insertion order. Removing an entry moves the
/// most recently stored entry into its place, so after removals the order is
/// insertion order except for the moved entries.
///
/// # Performance Characteristics
///
/// - **Memory**: the size of `K` and `V`, a `u32` hash, and 1.5 to 3 index
///   slots of 1, 2 or 4 bytes per entry
/// - **Iteration**: a linear scan over contiguous storage, independent of
///   the index size
///
/// # Examples
///
/// ```rust
/// # use compact_hash::CompactHashMap;
/// let mut map = CompactHashMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// map.insert("c", 3);
///
/// assert_eq!(map.get("a"), Some(&1));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "a", "c"]);
///
/// map.remove("b");
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["c", "a"]);
/// ```
#[derive(Clone)]
pub struct CompactHashMap<K, V, S = DefaultHashBuilder> {
    table: CompactTable<K, V>,
    hash_builder: S,
}

impl<K, V, S> Debug for CompactHashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> CompactHashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<i32, String> = CompactHashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.index_capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map that holds at least `capacity` entries before its
    /// index is rebuilt, using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<i32, String> = CompactHashMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> CompactHashMap<K, V, S> {
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use compact_hash::CompactHashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = CompactHashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: CompactTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with the specified capacity and hasher builder.
    ///
    /// The index is sized to the smallest power of two that keeps `capacity`
    /// entries under the two-thirds load limit.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: CompactTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map = CompactHashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold before its index is
    /// rebuilt.
    ///
    /// Slots left behind by removed entries count against this until the next
    /// rebuild.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the index table.
    pub fn index_capacity(&self) -> usize {
        self.table.index_capacity()
    }

    /// Structural modification counter, as checked by [`Cursor`].
    #[inline]
    pub(crate) fn version(&self) -> u64 {
        self.table.version()
    }

    /// Removes every entry and shrinks the index back to its minimum size.
    ///
    /// Invalidates every outstanding [`Cursor`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<u32, u32> = (0..100).map(|n| (n, n)).collect();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.index_capacity(), 8);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns the entry at position `index` in iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<&str, u32> = [("x", 1), ("y", 2)].into();
    /// assert_eq!(map.get_index(1), Some((&"y", &2)));
    /// assert_eq!(map.get_index(2), None);
    /// ```
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.table.get_index(index)
    }

    /// Returns the entry at position `index` in iteration order, with a
    /// mutable value.
    #[inline]
    pub fn get_index_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        self.table.get_index_mut(index)
    }

    /// Removes the entry at position `index` in iteration order and returns
    /// it. The last entry takes its position.
    ///
    /// Returns `None` if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<char, u32> = [('a', 1), ('b', 2), ('c', 3)].into();
    /// assert_eq!(map.swap_remove_index(0), Some(('a', 1)));
    /// assert_eq!(map.keys().copied().collect::<String>(), "cb");
    /// ```
    pub fn swap_remove_index(&mut self, index: usize) -> Option<(K, V)> {
        self.table.swap_remove_index(index)
    }

    /// Returns an iterator over the entries in iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<&str, u32> = [("a", 1), ("b", 2)].into();
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, [(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries in iteration order, with mutable
    /// values.
    ///
    /// Mutating values is not a structural change.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys in iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<u32, &str> = [(3, "c"), (1, "a")].into();
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [&3, &1]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        let key_of: for<'x> fn((&'x K, &'x V)) -> &'x K = |(key, _)| key;
        Keys {
            inner: Transformed::new(self.iter(), key_of),
        }
    }

    /// Returns an iterator over the values in iteration order.
    pub fn values(&self) -> Values<'_, K, V> {
        let value_of: for<'x> fn((&'x K, &'x V)) -> &'x V = |(_, value)| value;
        Values {
            inner: Transformed::new(self.iter(), value_of),
        }
    }

    /// Returns an iterator over mutable references to the values in iteration
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<&str, u32> = [("a", 1), ("b", 2)].into();
    /// for value in map.values_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map["b"], 20);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        let value_of: for<'x> fn((&'x K, &'x mut V)) -> &'x mut V = |(_, value)| value;
        ValuesMut {
            inner: Transformed::new(self.iter_mut(), value_of),
        }
    }

    /// Consumes the map, returning its keys in iteration order.
    pub fn into_keys(self) -> IntoKeys<K, V> {
        let key_of: fn((K, V)) -> K = |(key, _)| key;
        IntoKeys {
            inner: Transformed::new(self.into_iter(), key_of),
        }
    }

    /// Consumes the map, returning its values in iteration order.
    pub fn into_values(self) -> IntoValues<K, V> {
        let value_of: fn((K, V)) -> V = |(_, value)| value;
        IntoValues {
            inner: Transformed::new(self.into_iter(), value_of),
        }
    }

    /// Removes every entry and returns them in iteration order.
    ///
    /// The map is empty, with its index at the minimum size, as soon as this
    /// returns. Dropping the iterator early drops the remaining entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<u32, char> = [(1, 'a'), (2, 'b')].into();
    /// let drained: Vec<_> = map.drain().collect();
    /// assert_eq!(drained, [(1, 'a'), (2, 'b')]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Starts a fail-fast [`Cursor`] at the first entry.
    ///
    /// The cursor holds no borrow of the map; pass the map to each of its
    /// methods.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    /// Test/stats-only: probe distances of every entry.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> compact_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Test/stats-only: detailed utilization statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> compact_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, S> CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Reserves room for at least `additional` more entries without rebuilding
    /// the index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<u32, u32> = CompactHashMap::new();
    /// map.reserve(1000);
    /// assert!(map.capacity() >= 1000);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was absent, the entry is appended to the iteration order and
    /// `None` is returned. If it was present, its value is replaced in place,
    /// the old value is returned, and the stored key is kept; replacing a value
    /// is not a structural change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map = CompactHashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = make_hash(&self.hash_builder, &key);
        match self.table.entry(hash, |k| *k == key) {
            TableEntry::Occupied(mut entry) => Some(entry.insert(value)),
            TableEntry::Vacant(entry) => {
                entry.insert(key, value);
                None
            }
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map = CompactHashMap::new();
    /// map.insert(String::from("one"), 1);
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and its value for `key`.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table.find(hash, equivalent_key(key))
    }

    /// Returns the position of `key` in iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<&str, u32> = [("a", 1), ("b", 2)].into();
    /// assert_eq!(map.get_index_of("b"), Some(1));
    /// assert_eq!(map.get_index_of("z"), None);
    /// ```
    #[inline]
    pub fn get_index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table.find_index(hash, equivalent_key(key))
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map = CompactHashMap::new();
    /// map.insert(1, 10);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map[&1], 11);
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table
            .find_mut(hash, equivalent_key(key))
            .map(|(_, value)| value)
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_index_of(key).is_some()
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// The last entry in iteration order takes the removed entry's position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut map: CompactHashMap<u32, &str> = [(1, "a"), (2, "b"), (3, "c")].into();
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2]);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the map, returning the stored key and its value.
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table.remove(hash, equivalent_key(key))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let mut letters = CompactHashMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = make_hash(&self.hash_builder, &key);
        match self.table.entry(hash, |k| *k == key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

impl<K, V, S> CompactHashMap<K, V, S>
where
    V: PartialEq,
{
    /// Returns `true` if any entry holds `value`. Runs in linear time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_hash::CompactHashMap;
    /// let map: CompactHashMap<u32, &str> = [(1, "a"), (2, "b")].into();
    /// assert!(map.contains_value(&"b"));
    /// assert!(!map.contains_value(&"c"));
    /// ```
    pub fn contains_value(&self, value: &V) -> bool {
        self.table.values_slice().contains(value)
    }
}

impl<K, V, S> Default for CompactHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S, S2> PartialEq<CompactHashMap<K, V, S2>> for CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    /// Maps are equal when they hold the same keys mapped to equal values,
    /// regardless of iteration order or hasher.
    fn eq(&self, other: &CompactHashMap<K, V, S2>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value == theirs))
    }
}

impl<K, V, S> Eq for CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        type FixedHashBuilder = foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        type FixedHashBuilder = core::hash::BuildHasherDefault<std::hash::DefaultHasher>;
    }
}

/// Combines per-entry hashes by wrapping addition, so equal maps hash equally
/// whatever their iteration order or hasher builder.
#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V, S> Hash for CompactHashMap<K, V, S>
where
    K: Hash,
    V: Hash,
{
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        let fixed = FixedHashBuilder::default();
        let sum = self
            .iter()
            .fold(0u64, |sum, entry| sum.wrapping_add(fixed.hash_one(entry)));
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<K, Q, V, S> Index<&Q> for CompactHashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S> Extend<(K, V)> for CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            iter.size_hint().0.div_ceil(2)
        };
        self.reserve(reserve);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for CompactHashMap<K, V, S>
where
    K: Hash + Eq + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K, V, S> FromIterator<(K, V)> for CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S, const N: usize> From<[(K, V); N]> for CompactHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a map from pairs; later duplicates overwrite earlier values but
    /// keep the first position.
    fn from(pairs: [(K, V); N]) -> Self {
        let mut map = Self::with_capacity_and_hasher(N, S::default());
        map.extend(pairs);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a CompactHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut CompactHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for CompactHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`CompactHashMap`].
///
/// [`entry`]: CompactHashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: compact_table::VacantEntry<'a, K, V>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the entry to the iteration order and returns a mutable
    /// reference to its value.
    pub fn insert(self, value: V) -> &'a mut V {
        self.entry.insert(self.key, value)
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: compact_table::OccupiedEntry<'a, K, V>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        self.entry.key()
    }

    /// Position of the entry in iteration order.
    pub fn index(&self) -> usize {
        self.entry.index()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.entry.get()
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.entry.get_mut()
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        self.entry.into_mut()
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        self.entry.insert(value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

macro_rules! forward_iterator {
    ($name:ident<$($lt:lifetime,)? $k:ident, $v:ident>, $item:ty) => {
        impl<$($lt,)? $k, $v> Iterator for $name<$($lt,)? $k, $v> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next()
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<$($lt,)? $k, $v> ExactSizeIterator for $name<$($lt,)? $k, $v> {}
        impl<$($lt,)? $k, $v> FusedIterator for $name<$($lt,)? $k, $v> {}
    };
}

macro_rules! forward_double_ended {
    ($name:ident<$($lt:lifetime,)? $k:ident, $v:ident>) => {
        impl<$($lt,)? $k, $v> DoubleEndedIterator for $name<$($lt,)? $k, $v> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back()
            }
        }
    };
}

/// An iterator over the entries of a [`CompactHashMap`], in iteration order.
pub struct Iter<'a, K, V> {
    inner: compact_table::Iter<'a, K, V>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Debug, V: Debug> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

forward_iterator!(Iter<'a, K, V>, (&'a K, &'a V));
forward_double_ended!(Iter<'a, K, V>);

/// A mutable iterator over the entries of a [`CompactHashMap`].
pub struct IterMut<'a, K, V> {
    inner: compact_table::IterMut<'a, K, V>,
}

forward_iterator!(IterMut<'a, K, V>, (&'a K, &'a mut V));
forward_double_ended!(IterMut<'a, K, V>);

/// An iterator over the keys of a [`CompactHashMap`], in iteration order.
pub struct Keys<'a, K, V> {
    inner: Transformed<Iter<'a, K, V>, fn((&'a K, &'a V)) -> &'a K>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

forward_iterator!(Keys<'a, K, V>, &'a K);
forward_double_ended!(Keys<'a, K, V>);

/// An iterator over the values of a [`CompactHashMap`], in iteration order.
pub struct Values<'a, K, V> {
    inner: Transformed<Iter<'a, K, V>, fn((&'a K, &'a V)) -> &'a V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

forward_iterator!(Values<'a, K, V>, &'a V);
forward_double_ended!(Values<'a, K, V>);

/// A mutable iterator over the values of a [`CompactHashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: Transformed<IterMut<'a, K, V>, fn((&'a K, &'a mut V)) -> &'a mut V>,
}

forward_iterator!(ValuesMut<'a, K, V>, &'a mut V);
forward_double_ended!(ValuesMut<'a, K, V>);

/// An owning iterator over the entries of a [`CompactHashMap`].
pub struct IntoIter<K, V> {
    inner: compact_table::IntoIter<K, V>,
}

forward_iterator!(IntoIter<K, V>, (K, V));
forward_double_ended!(IntoIter<K, V>);

/// An owning iterator over the keys of a [`CompactHashMap`].
pub struct IntoKeys<K, V> {
    inner: Transformed<IntoIter<K, V>, fn((K, V)) -> K>,
}

forward_iterator!(IntoKeys<K, V>, K);
forward_double_ended!(IntoKeys<K, V>);

/// An owning iterator over the values of a [`CompactHashMap`].
pub struct IntoValues<K, V> {
    inner: Transformed<IntoIter<K, V>, fn((K, V)) -> V>,
}

forward_iterator!(IntoValues<K, V>, V);
forward_double_ended!(IntoValues<K, V>);

/// A draining iterator over the entries of a [`CompactHashMap`].
pub struct Drain<'a, K, V> {
    inner: compact_table::Drain<'a, K, V>,
}

forward_iterator!(Drain<'a, K, V>, (K, V));

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;
    use core::hash::BuildHasherDefault;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::index_table::Width;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes every key to the same value.
    #[derive(Default)]
    struct ConstantHasher;

    impl Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _: &[u8]) {}
    }

    /// A key whose hash only distinguishes it from keys more than 8 apart.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Clustered(u32);

    impl Hash for Clustered {
        fn hash<H: Hasher>(&self, state: &mut H) {
            state.write_u32(self.0 >> 3);
        }
    }

    /// A key that is never equal to anything, itself included.
    #[derive(Debug)]
    struct Unequal(u32);

    impl PartialEq for Unequal {
        fn eq(&self, _: &Self) -> bool {
            false
        }
    }

    impl Eq for Unequal {}

    impl Hash for Unequal {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.0.hash(state);
        }
    }

    /// Passes `write_u64` through untouched, so tests can pick table hashes.
    #[derive(Default)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.0 = (self.0 << 8) | byte as u64;
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    fn keys_of<K: Clone, V, S>(map: &CompactHashMap<K, V, S>) -> Vec<K> {
        map.keys().cloned().collect()
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: CompactHashMap<i32, String, SipHashBuilder> = CompactHashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);

        let map2 = CompactHashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.index_capacity(), 8);
    }

    #[test]
    fn test_with_capacity() {
        let map: CompactHashMap<i32, String> = CompactHashMap::with_capacity(100);
        assert!(map.capacity() >= 100);
        assert!(map.is_empty());

        let map2 = CompactHashMap::<i32, String, _>::with_capacity_and_hasher(
            200,
            SipHashBuilder::default(),
        );
        assert!(map2.capacity() >= 200);
        assert!(map2.index_capacity().is_power_of_two());
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), None);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_get_mut() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_contains() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        assert!(!map.contains_key(&1));

        map.insert(1, "value".to_string());
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
        assert!(map.contains_value(&"value".to_string()));
        assert!(!map.contains_value(&"other".to_string()));
    }

    #[test]
    fn test_remove() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove(&3), None);
    }

    #[test]
    fn test_remove_entry() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        assert_eq!(map.remove_entry(&1), Some((1, "hello".to_string())));
        assert_eq!(map.len(), 0);
        assert_eq!(map.remove_entry(&1), None);
    }

    #[test]
    fn test_clear() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..100 {
            map.insert(i, i.to_string());
        }

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(!map.contains_key(&1));
        assert_eq!(map.index_capacity(), 8);

        map.insert(7, "seven".to_string());
        assert_eq!(keys_of(&map), [7]);
    }

    #[test]
    fn test_reserve() {
        let mut map = CompactHashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());

        map.reserve(1000);
        assert!(map.capacity() >= 1001);

        let index_capacity = map.index_capacity();
        for i in 2..=1001 {
            map.insert(i, i.to_string());
        }
        assert_eq!(map.index_capacity(), index_capacity);
    }

    #[test]
    fn test_entry_api() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.get(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: CompactHashMap<i32, Vec<i32>, SipHashBuilder> =
            CompactHashMap::with_hasher(SipHashBuilder::default());

        map.entry(1).or_default().push(42);
        assert_eq!(map.get(&1), Some(&vec![42]));

        map.entry(1).or_default().push(24);
        assert_eq!(map.get(&1), Some(&vec![42, 24]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(0, "zero".to_string());
        map.insert(1, "hello".to_string());
        map.insert(2, "two".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.index(), 1);
                assert_eq!(entry.get(), &"hello".to_string());

                *entry.get_mut() = "world".to_string();
                assert_eq!(entry.get(), &"world".to_string());

                let old_value = entry.insert("new".to_string());
                assert_eq!(old_value, "world".to_string());
                assert_eq!(entry.get(), &"new".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert_eq!(keys_of(&map), [0, 2]);
    }

    #[test]
    fn test_vacant_entry() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);

                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));

        match map.entry(2) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 2),
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iterators_follow_insertion_order() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(3, "three".to_string());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());

        let pairs: Vec<(i32, String)> = map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(
            pairs,
            [
                (3, "three".to_string()),
                (1, "one".to_string()),
                (2, "two".to_string())
            ]
        );
        assert_eq!(map.iter().len(), 3);
        assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), [2, 1, 3]);

        let values: Vec<&str> = map.values().map(String::as_str).collect();
        assert_eq!(values, ["three", "one", "two"]);

        for value in map.values_mut() {
            value.make_ascii_uppercase();
        }
        for (_, value) in &mut map {
            value.push('!');
        }
        assert_eq!(map[&1], "ONE!");

        let keys: Vec<i32> = map.clone().into_keys().collect();
        assert_eq!(keys, [3, 1, 2]);
        let values: Vec<String> = map.into_values().collect();
        assert_eq!(values, ["THREE!", "ONE!", "TWO!"]);
    }

    #[test]
    fn test_drain() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let drained: Vec<(i32, String)> = map.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(map.is_empty());
        assert_eq!(drained[0], (1, "one".to_string()));
        assert_eq!(drained[2], (3, "three".to_string()));

        map.insert(4, "four".to_string());
        let mut drain = map.drain();
        assert_eq!(drain.len(), 1);
        drop(drain.next());
        drop(drain);
        assert!(map.is_empty());
    }

    #[test]
    fn test_multiple_insertions() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        for i in 0..100 {
            map.insert(i, format!("value_{}", i));
        }

        assert_eq!(map.len(), 100);

        for i in 0..100 {
            assert_eq!(map.get(&i), Some(&format!("value_{}", i)));
            assert_eq!(map.get_index_of(&i), Some(i as usize));
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_remove_every_other() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        for i in 0..1000 {
            map.insert(i, i * 2);
        }

        assert_eq!(map.len(), 1000);

        for i in (0..1000).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * 2));
        }

        assert_eq!(map.len(), 500);

        for i in (1..1000).step_by(2) {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }
        for i in (0..1000).step_by(2) {
            assert_eq!(map.get(&i), None);
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_removal_swaps_last_entry_into_place() {
        let mut map: CompactHashMap<char, u32> =
            [('a', 1), ('b', 2), ('c', 3), ('d', 4), ('e', 5)].into();

        map.remove(&'b');
        assert_eq!(keys_of(&map), ['a', 'e', 'c', 'd']);
        map.remove(&'d');
        assert_eq!(keys_of(&map), ['a', 'e', 'c']);
        map.insert('f', 6);
        assert_eq!(keys_of(&map), ['a', 'e', 'c', 'f']);
        assert_eq!(map.swap_remove_index(0), Some(('a', 1)));
        assert_eq!(keys_of(&map), ['f', 'e', 'c']);
        assert_eq!(map.get_index_of(&'f'), Some(0));
        assert_eq!(map.swap_remove_index(3), None);
    }

    #[test]
    fn test_overwrite_keeps_position_and_key() {
        let mut map = CompactHashMap::new();
        map.insert(1, 'a');
        map.insert(2, 'b');
        map.insert(1, 'c');
        assert_eq!(keys_of(&map), [1, 2]);
        assert_eq!(map.get_index(0), Some((&1, &'c')));
    }

    #[test]
    fn test_string_keys() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        map.insert("rust".to_string(), 3);

        assert_eq!(map.get("hello"), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get_key_value("rust"), Some((&"rust".to_string(), &3)));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.remove("world"), Some(2));
    }

    #[test]
    fn test_identity_matches_before_equality() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        map.insert(Unequal(1), "first");
        map.insert(Unequal(1), "second");
        assert_eq!(map.len(), 2);

        assert_eq!(map.get(&Unequal(1)), None);
        let (stored, _) = map.get_index(1).unwrap();
        assert_eq!(map.get(stored), Some(&"second"));
    }

    #[test]
    fn test_constant_hash() {
        let mut map: CompactHashMap<u32, u32, BuildHasherDefault<ConstantHasher>> =
            CompactHashMap::default();
        for i in 0..500 {
            assert_eq!(map.insert(i, i), None);
        }
        for i in 0..500 {
            assert_eq!(map.get(&i), Some(&i));
        }
        for i in (0..500).filter(|i| i % 3 == 0) {
            assert_eq!(map.remove(&i), Some(i));
        }
        assert_eq!(map.len(), 333);
        for i in 0..500 {
            assert_eq!(map.contains_key(&i), i % 3 != 0);
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_clustered_hashes() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..2000 {
            map.insert(Clustered(i), i);
        }
        for i in (0..2000).step_by(3) {
            assert_eq!(map.remove(&Clustered(i)), Some(i));
        }
        for i in 0..2000 {
            let expected = (i % 3 != 0).then_some(&i);
            assert_eq!(map.get(&Clustered(i)), expected);
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_negative_and_min_hashes() {
        let mut map: CompactHashMap<u64, u64, BuildHasherDefault<IdentityHasher>> =
            CompactHashMap::default();
        // Fold to i32::MIN, -1, -2 and 1 respectively.
        let keys = [0x8000_0000u64, 0xffff_ffff, 0xffff_fffe, 1];
        for &key in &keys {
            map.insert(key, key);
        }
        for &key in &keys {
            assert_eq!(map.get(&key), Some(&key));
        }
        assert_eq!(map.remove(&0xffff_ffff), Some(0xffff_ffff));
        assert_eq!(map.get(&0xffff_fffe), Some(&0xffff_fffe));
        map.table.assert_invariants();
    }

    #[test]
    fn test_width_boundaries() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..20u32 {
            map.insert(i, i);
        }
        assert_eq!(map.debug_stats().width, Width::Byte);

        for i in 20..1000u32 {
            map.insert(i, i);
        }
        assert_eq!(map.debug_stats().width, Width::Short);

        for i in 1000..40_000u32 {
            map.insert(i, i);
        }
        assert_eq!(map.debug_stats().width, Width::Int);

        for i in (0..40_000u32).step_by(7) {
            assert_eq!(map.remove(&i), Some(i));
        }
        for i in 0..40_000u32 {
            assert_eq!(map.get(&i).is_some(), i % 7 != 0);
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_churn_does_not_grow() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..10 {
            map.insert(i, i);
        }
        let index_capacity = map.index_capacity();
        for i in 10..100_000 {
            map.insert(i, i);
            map.remove(&(i - 10));
        }
        assert_eq!(map.len(), 10);
        assert!(map.index_capacity() <= index_capacity * 2);
        map.table.assert_invariants();
    }

    #[test]
    fn test_equality_ignores_order() {
        let forward: CompactHashMap<u32, u32> = (0..50).map(|i| (i, i * i)).collect();
        let backward: CompactHashMap<u32, u32, SipHashBuilder> =
            (0..50).rev().map(|i| (i, i * i)).collect();
        assert!(forward == backward);

        let mut hashed_forward = SipHasher::new();
        forward.hash(&mut hashed_forward);
        let reversed: CompactHashMap<u32, u32> = (0..50).rev().map(|i| (i, i * i)).collect();
        let mut hashed_reversed = SipHasher::new();
        reversed.hash(&mut hashed_reversed);
        assert_eq!(forward, reversed);
        assert_eq!(hashed_forward.finish(), hashed_reversed.finish());

        let mut different = reversed.clone();
        different.insert(7, 0);
        assert_ne!(forward, different);
        different.insert(7, 49);
        assert_eq!(forward, different);
        different.insert(50, 2500);
        assert_ne!(forward, different);
    }

    #[test]
    fn test_extend_and_from() {
        let mut map: CompactHashMap<u32, char> = [(1, 'a'), (2, 'b'), (1, 'z')].into();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], 'z');
        assert_eq!(keys_of(&map), [1, 2]);

        let more = [(3, 'c'), (4, 'd')];
        map.extend(more.iter().map(|(k, v)| (k, v)));
        map.extend([(5, 'e')]);
        assert_eq!(keys_of(&map), [1, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn test_index_missing_panics() {
        let map: CompactHashMap<u32, u32> = CompactHashMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_debug_format() {
        let map: CompactHashMap<u32, &str> = [(2, "b"), (1, "a")].into();
        assert_eq!(format!("{map:?}"), r#"{2: "b", 1: "a"}"#);
        assert_eq!(format!("{:?}", map.iter()), r#"[(2, "b"), (1, "a")]"#);
    }

    #[test]
    fn test_complex_values() {
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());

        let vec1 = vec![1, 2, 3];
        let vec2 = vec![4, 5, 6];

        map.insert("first".to_string(), vec1.clone());
        map.insert("second".to_string(), vec2.clone());

        assert_eq!(map.get("first"), Some(&vec1));
        assert_eq!(map.get("second"), Some(&vec2));

        if let Some(v) = map.get_mut("first") {
            v.push(4);
        }

        assert_eq!(map.get("first"), Some(&vec![1, 2, 3, 4]));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_random_operations_match_std() {
        let mut rng = SmallRng::seed_from_u64(0x5eed_c0de);
        let mut map = CompactHashMap::with_hasher(SipHashBuilder::default());
        let mut model = std::collections::HashMap::new();

        for step in 0..100_000 {
            let key = rng.random_range(0..5_000u32);
            match rng.random_range(0..10) {
                0..=5 => {
                    let value = rng.random::<u64>();
                    assert_eq!(map.insert(key, value), model.insert(key, value));
                }
                6..=8 => assert_eq!(map.remove(&key), model.remove(&key)),
                _ => assert_eq!(map.get(&key), model.get(&key)),
            }
            if step % 10_000 == 0 {
                map.table.assert_invariants();
            }
        }

        assert_eq!(map.len(), model.len());
        assert_eq!(map.iter().count(), model.len());
        for (key, value) in &map {
            assert_eq!(model.get(key), Some(value));
        }
        map.table.assert_invariants();
    }
}
