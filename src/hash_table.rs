use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

/// Number of slots allocated by a table created without a capacity hint.
const INITIAL_CAPACITY: usize = 4;

#[inline(always)]
fn slot_count_for(capacity: usize) -> usize {
    capacity
        .max(INITIAL_CAPACITY)
        .checked_next_power_of_two()
        .expect("capacity overflow")
}

fn empty_slots<V>(count: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(count);
    slots.resize_with(count, || Slot::Empty);
    slots
}

/// State of a single slot.
///
/// `Deleted` marks a slot whose value was removed. It does not stop a probe,
/// since keys inserted after it may live further along the run, but it can
/// be reused by the next insertion that passes over it.
#[derive(Clone)]
enum Slot<V> {
    Empty,
    Occupied { hash: u64, value: V },
    Deleted,
}

impl<V> Slot<V> {
    #[inline(always)]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline(always)]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline(always)]
    fn into_value(self) -> Option<V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Outcome of walking a probe sequence.
enum Probe {
    /// The slot at this index holds a matching value.
    Found(usize),
    /// No match. Holds the slot a new value should go into: the first
    /// tombstone on the probe path, else the `Empty` slot that ended it.
    /// `None` when every slot is occupied.
    Vacant(Option<usize>),
}

/// Debug statistics for probe-length analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Number of tombstoned slots
    pub deleted: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance between a value and its home slot
    pub max_probe: usize,
    /// Mean distance between a value and its home slot
    pub mean_probe: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Tombstones: {}", self.deleted);
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe, self.mean_probe
        );
    }
}

/// An open-addressing hash table using linear probing.
///
/// `HashTable<V>` stores values of type `V` in a single contiguous slot
/// array. Callers provide both the hash value and an equality predicate for
/// each operation, which lets the table serve maps, sets, and other keyed
/// layouts without knowing how keys are stored.
///
/// A value lives in the first free slot at or after its home slot
/// `hash % capacity`, wrapping at the end of the array. The table starts
/// with four slots and doubles, rehashing every value, when an insertion
/// finds it full.
///
/// ## Example
///
/// ```rust
/// # use core::hash::BuildHasher;
/// #
/// # use basic_containers::HashKind;
/// # use basic_containers::hash_table::Entry;
/// # use basic_containers::hash_table::HashTable;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// let mut table = HashTable::new();
/// let hash = HashKind::Integer.hash_one(123u64);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    deleted: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        let slots = self
            .slots
            .chunks(16)
            .map(|row| {
                row.iter()
                    .map(|slot| match slot {
                        Slot::Empty => "..".to_string(),
                        Slot::Deleted => "xx".to_string(),
                        Slot::Occupied { hash, .. } => format!("{:02x}", hash & 0xFF),
                    })
                    .collect::<Vec<String>>()
                    .join(", ")
            })
            .collect::<Vec<_>>();

        f.debug_struct("HashTable")
            .field("slots", &slots)
            .field("populated", &self.populated)
            .field("deleted", &self.deleted)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the initial capacity of four slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new hash table with room for at least `capacity` values.
    ///
    /// The slot count is rounded up to a power of two, and is never below
    /// four.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let table: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 4);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(slot_count_for(capacity)),
            populated: 0,
            deleted: 0,
        }
    }

    /// Returns an iterator over the values in slot order.
    ///
    /// The iterator is forward-only: it scans from the first slot to the
    /// last, yields each occupied slot once, and returns `None` from then on.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use basic_containers::HashKind;
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for word in ["a", "b"] {
    ///     let hash = HashKind::String.hash_one(word);
    ///     table.entry(hash, |s: &String| s == word).or_insert(word.to_string());
    /// }
    ///
    /// let mut values: Vec<_> = table.iter().cloned().collect();
    /// values.sort();
    /// assert_eq!(values, ["a", "b"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to the values in slot
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Removes every value from the table, yielding them in slot order.
    ///
    /// The capacity is kept. Values not consumed by the iterator are dropped
    /// when the iterator is.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots. `len() <= capacity()` always holds.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.deleted
    }

    /// Drops every value. The capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.deleted = 0;
    }

    /// Shrinks the slot array to the smallest power of two (at least four)
    /// that holds the current values, dropping all tombstones.
    pub fn shrink_to_fit(&mut self) {
        let target = slot_count_for(self.populated);
        if target < self.capacity() || self.deleted > 0 {
            self.resize_rehash(target);
        }
    }

    /// Reserves room for at least `additional` more values without growing.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self
            .populated
            .checked_add(additional)
            .expect("capacity overflow");
        if needed > self.capacity() {
            self.resize_rehash(slot_count_for(needed));
        }
    }

    /// Finds the value matching `hash` and `eq`.
    ///
    /// The probe starts at the home slot and stops at the first `Empty` slot,
    /// or after visiting every slot once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use basic_containers::HashKind;
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = HashKind::Integer.hash_one(7u32);
    /// table.entry(hash, |&v: &u32| v == 7).or_insert(7);
    ///
    /// assert_eq!(table.find(hash, |&v| v == 7), Some(&7));
    /// assert_eq!(table.find(HashKind::Integer.hash_one(8u32), |&v| v == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => self.slots[index].value(),
            Probe::Vacant(_) => None,
        }
    }

    /// Finds the value matching `hash` and `eq`, returning a mutable
    /// reference.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => self.slots[index].value_mut(),
            Probe::Vacant(_) => None,
        }
    }

    /// Removes and returns the value matching `hash` and `eq`.
    ///
    /// The slot becomes a tombstone, so values further along the same probe
    /// run stay reachable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use basic_containers::HashKind;
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = HashKind::Integer.hash_one(42u64);
    /// table.entry(hash, |&v: &u64| v == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(hash, |&v| v == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(hash, |&v| v == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            Probe::Found(index) => Some(self.take(index)),
            Probe::Vacant(_) => None,
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// A vacant entry grows the table when a value is inserted into a full
    /// table; an occupied entry allows the value to be replaced in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use basic_containers::HashKind;
    /// # use basic_containers::hash_table::Entry;
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = HashKind::String.hash_one("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// table
    ///     .entry(hash, |s: &String| s == "hello")
    ///     .or_insert("unused".to_string());
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        self.maybe_purge_tombstones();
        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    #[inline(always)]
    fn home_index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() { 0 } else { next }
    }

    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mut index = self.home_index(hash);
        let mut first_tombstone = None;

        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.or(Some(index))),
                Slot::Deleted => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return Probe::Found(index);
                    }
                }
            }
            index = self.next_index(index);
        }

        Probe::Vacant(first_tombstone)
    }

    /// First non-occupied slot on the probe path of `hash`. The caller must
    /// ensure the table has one.
    fn find_insert_slot(&self, hash: u64) -> usize {
        let mut index = self.home_index(hash);
        loop {
            if !matches!(self.slots[index], Slot::Occupied { .. }) {
                return index;
            }
            index = self.next_index(index);
        }
    }

    fn take(&mut self, index: usize) -> V {
        let slot = core::mem::replace(&mut self.slots[index], Slot::Deleted);
        self.populated -= 1;
        self.deleted += 1;
        match slot.into_value() {
            Some(value) => value,
            None => unreachable!("probe returned an unoccupied slot"),
        }
    }

    fn put(&mut self, index: usize, hash: u64, value: V) -> &mut V {
        if matches!(self.slots[index], Slot::Deleted) {
            self.deleted -= 1;
        }
        self.populated += 1;
        self.slots[index] = Slot::Occupied { hash, value };
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }

    /// Once no `Empty` slot is left, misses have to walk the whole table.
    /// Rebuilding at the same size turns the tombstones back into `Empty`
    /// when they make up at least a quarter of the slots. With fewer
    /// tombstones a same-size rebuild would free only a handful of slots, so
    /// the table doubles instead.
    fn maybe_purge_tombstones(&mut self) {
        if self.deleted == 0 || self.populated + self.deleted < self.capacity() {
            return;
        }

        if self.deleted >= self.capacity() / 4 {
            tracing::debug!(
                capacity = self.capacity(),
                tombstones = self.deleted,
                "purging tombstones"
            );
            self.resize_rehash(self.capacity());
        } else {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let capacity = self
            .capacity()
            .checked_mul(2)
            .expect("capacity overflow");
        self.resize_rehash(capacity);
    }

    fn resize_rehash(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.populated);
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity = capacity,
            populated = self.populated,
            "rehashing table"
        );

        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.deleted = 0;

        for slot in old {
            if let Slot::Occupied { hash, value } = slot {
                let index = self.find_insert_slot(hash);
                self.slots[index] = Slot::Occupied { hash, value };
            }
        }
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// The probe length of a value is its forward distance from its home slot,
    /// so a value sitting in its home slot counts in bin 0. The returned
    /// vector is as long as the longest probe plus one.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; 1];
        for (distance, _) in self.probe_lengths() {
            if distance >= hist.len() {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }
        hist
    }

    /// Returns probe-length and utilization statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut max_probe = 0;
        let mut total_probe = 0;
        for (distance, _) in self.probe_lengths() {
            max_probe = max_probe.max(distance);
            total_probe += distance;
        }

        DebugStats {
            populated: self.populated,
            deleted: self.deleted,
            capacity: self.capacity(),
            load_factor: self.populated as f64 / self.capacity() as f64,
            max_probe,
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
        }
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_lengths(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        let capacity = self.capacity();
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                Slot::Occupied { hash, value } => {
                    let home = (*hash % capacity as u64) as usize;
                    Some(((index + capacity - home) % capacity, value))
                }
                _ => None,
            })
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.populated);
        for (i, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", i, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use basic_containers::HashKind;
    /// # use basic_containers::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = HashKind::String.hash_one("key");
    ///
    /// let value = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("other".to_string());
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    ///
    /// Returns the mutable reference to the value if the entry was occupied,
    /// `None` otherwise.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(&mut *value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// [`entry`]: HashTable::entry
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: Option<usize>,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    ///
    /// If the table is full it is doubled and rehashed first.
    pub fn insert(self, value: V) -> &'a mut V {
        let index = match self.index {
            Some(index) => index,
            None => {
                self.table.grow();
                self.table.find_insert_slot(self.hash)
            }
        };
        self.table.put(index, self.hash, value)
    }
}

/// A view into an occupied entry in the hash table.
///
/// [`entry`]: HashTable::entry
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match self.table.slots[self.index].value() {
            Some(value) => value,
            None => unreachable!("occupied entry points at an unoccupied slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        match self.table.slots[self.index].value_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry points at an unoccupied slot"),
        }
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match self.table.slots[self.index].value_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry points at an unoccupied slot"),
        }
    }

    /// Removes the value from the table, leaving a tombstone.
    pub fn remove(self) -> V {
        self.table.take(self.index)
    }
}

/// An iterator over the values of a [`HashTable`], in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(value) = slot.value() {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the values of a [`HashTable`], in slot order.
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(value) = slot.value_mut() {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
/// It yields owned `V` values and empties the table as it iterates.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.table.slots.get_mut(self.index) {
            self.index += 1;
            match core::mem::replace(slot, Slot::Empty) {
                Slot::Occupied { value, .. } => {
                    self.table.populated -= 1;
                    return Some(value);
                }
                Slot::Deleted => self.table.deleted -= 1,
                Slot::Empty => {}
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
impl<V> FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`], in slot order.
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(value) = slot.into_value() {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::BuildHasher;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hash::HashKind;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn insert_new(table: &mut HashTable<Item>, hash: u64, item: Item) {
        let key = item.key;
        match table.entry(hash, |v| v.key == key) {
            Entry::Vacant(v) => {
                v.insert(item);
            }
            Entry::Occupied(_) => panic!("unexpected occupied entry for {key}: {table:#?}"),
        }
    }

    #[test]
    fn starts_with_four_empty_slots() {
        let table: HashTable<Item> = HashTable::new();
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 0);
        assert_eq!(table.tombstones(), 0);
        assert!(table.iter().next().is_none());
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            insert_new(
                &mut table,
                hash,
                Item {
                    key: k,
                    value: (k as i32) * 2,
                },
            );
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            assert_eq!(table.find(hash, |v| v.key == k).map(|v| v.value), Some(k as i32 * 2));
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn doubles_when_full_and_keeps_every_value() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..4u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 4);

        insert_new(&mut table, 4, Item { key: 4, value: 0 });
        assert_eq!(table.capacity(), 8);

        for k in 0..5u64 {
            assert!(table.find(k, |v| v.key == k).is_some(), "lost {k} after growth");
        }
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(&state, k);

        insert_new(&mut table, hash, Item { key: k, value: 7 });

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                let prev_value = occ.get().value;
                *occ.get_mut() = Item { key: k, value: 11 };
                assert_eq!(prev_value, 7, "{:#?}", table);
            }
            Entry::Vacant(_) => panic!("should be occupied: {}#{:02X} in {:#?}", k, hash, table),
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
    }

    #[test]
    fn find_mut_and_modify() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5u64 {
            insert_new(&mut table, hash_key(&state, k), Item { key: k, value: 1 });
        }

        for k in 0..5u64 {
            if let Some(v) = table.find_mut(hash_key(&state, k), |v| v.key == k) {
                v.value += 9;
            }
        }
        for k in 0..5u64 {
            let v = table.find(hash_key(&state, k), |v| v.key == k).unwrap();
            assert_eq!(v.value, 10);
        }
    }

    #[test]
    fn remove_items() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..8u64 {
            insert_new(
                &mut table,
                hash_key(&state, k),
                Item {
                    key: k,
                    value: k as i32,
                },
            );
        }
        assert_eq!(table.len(), 8);
        for k in [0u64, 3, 7] {
            let removed = table
                .remove(hash_key(&state, k), |v| v.key == k)
                .expect("should remove");
            assert_eq!(removed.key, k);
        }
        assert_eq!(table.len(), 5);
        assert_eq!(table.tombstones(), 3);

        assert!(table.remove(hash_key(&state, 1000), |v| v.key == 1000).is_none());
        assert!(table.remove(hash_key(&state, 3), |v| v.key == 3).is_none());
    }

    #[test]
    fn explicit_collision() {
        // Every value shares home slot 0, so they form a single run.
        let mut table: HashTable<Item> = HashTable::with_capacity(8);
        for k in 0..6u64 {
            insert_new(&mut table, 0, Item { key: k, value: 0 });
        }
        assert_eq!(table.probe_histogram(), vec![1, 1, 1, 1, 1, 1]);

        // Removing from the middle of the run must not hide the tail.
        assert!(table.remove(0, |v| v.key == 2).is_some());
        for k in [0u64, 1, 3, 4, 5] {
            assert!(table.find(0, |v| v.key == k).is_some(), "lost {k}: {table:#?}");
        }
        assert!(table.find(0, |v| v.key == 2).is_none());
    }

    #[test]
    fn tombstone_is_reused_by_insert() {
        let mut table: HashTable<Item> = HashTable::with_capacity(8);
        for k in 0..3u64 {
            insert_new(&mut table, 0, Item { key: k, value: 0 });
        }
        table.remove(0, |v| v.key == 1);
        assert_eq!(table.tombstones(), 1);

        insert_new(&mut table, 0, Item { key: 9, value: 0 });
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.probe_histogram(), vec![1, 1, 1]);
    }

    #[test]
    fn insert_after_tombstone_does_not_duplicate_later_key() {
        let mut table: HashTable<Item> = HashTable::with_capacity(8);
        for k in 0..3u64 {
            insert_new(&mut table, 0, Item { key: k, value: 0 });
        }
        table.remove(0, |v| v.key == 0);

        // Key 2 sits past the tombstone; the entry must find it, not the hole.
        match table.entry(0, |v| v.key == 2) {
            Entry::Occupied(mut e) => e.get_mut().value = 5,
            Entry::Vacant(_) => panic!("key 2 should be occupied: {table:#?}"),
        }
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(0, |v| v.key == 2).unwrap().value, 5);
    }

    #[test]
    fn probe_terminates_when_no_empty_slot_is_left() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..4u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        for k in 0..4u64 {
            table.remove(k, |v| v.key == k);
        }
        assert_eq!(table.tombstones(), 4);
        assert!(table.find(2, |v| v.key == 2).is_none());
        assert!(table.remove(1, |v| v.key == 1).is_none());

        // The next entry purges the tombstones before probing.
        insert_new(&mut table, 1, Item { key: 1, value: 1 });
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn iter_and_drain() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..10u64 {
            insert_new(
                &mut table,
                hash_key(&state, k),
                Item {
                    key: k,
                    value: k as i32,
                },
            );
        }

        let mut keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        let mut iter = table.iter();
        assert_eq!(iter.len(), 10);
        for _ in 0..10 {
            assert!(iter.next().is_some());
        }
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());

        for v in table.iter_mut() {
            v.value += 1;
        }

        let capacity = table.capacity();
        let mut drained: Vec<Item> = table.drain().collect();
        drained.sort_by_key(|v| v.key);
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[3].value, 4);
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert!(table.iter().next().is_none());
    }

    #[test]
    fn partial_drain_empties_table() {
        let mut table: HashTable<String> = HashTable::new();
        for s in ["a", "b", "c"] {
            let hash = HashKind::String.hash_one(s);
            table.entry(hash, |v| v == s).or_insert(s.to_string());
        }

        let first = table.drain().next();
        assert!(first.is_some());
        assert!(table.is_empty());
        assert!(table.find(HashKind::String.hash_one("b"), |v| v == "b").is_none());
    }

    #[test]
    fn forgotten_drain_keeps_counts_in_step() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..3u64 {
            insert_new(&mut table, k, Item { key: k, value: k as i32 });
        }
        table.remove(2, |v| v.key == 2);
        insert_new(&mut table, 3, Item { key: 3, value: 3 });

        core::mem::forget(table.drain());
        assert_eq!(table.len(), 3);
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.find(1, |v| v.key == 1).map(|v| v.value), Some(1));

        match table.entry(0, |v| v.key == 0) {
            Entry::Occupied(e) => assert_eq!(e.remove().value, 0),
            Entry::Vacant(_) => panic!("key 0 should still be present: {table:#?}"),
        }
        assert_eq!(table.len(), 2);

        let mut drain = table.drain();
        assert_eq!(drain.len(), 2);
        assert!(drain.next().is_some());
        assert_eq!(drain.len(), 1);
        core::mem::forget(drain);
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn few_tombstones_in_a_full_table_grow_it() {
        let mut table: HashTable<Item> = HashTable::with_capacity(8);
        for k in 0..7u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        table.remove(0, |v| v.key == 0);
        insert_new(&mut table, 7, Item { key: 7, value: 0 });
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.len() + table.tombstones(), table.capacity());

        // One tombstone out of eight slots is not worth a same-size rebuild.
        insert_new(&mut table, 8, Item { key: 8, value: 0 });
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.len(), 8);

        // Churn at a steady length now only leaves tombstones behind.
        for k in 9..16u64 {
            table.remove(k - 8, |v| v.key == k - 8);
            insert_new(&mut table, k, Item { key: k, value: 0 });
            assert_eq!(table.tombstones(), (k - 8) as usize);
            assert_eq!(table.capacity(), 16);
        }
        for k in 8..16u64 {
            assert!(table.find(k, |v| v.key == k).is_some());
        }
    }

    #[test]
    fn string_values() {
        let mut table: HashTable<String> = HashTable::new();
        let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
        for w in words {
            let hash = HashKind::String.hash_one(w);
            table.entry(hash, |s| s == w).or_insert(w.to_string());
        }
        assert_eq!(table.len(), words.len());
        for w in words {
            let hash = HashKind::String.hash_one(w);
            assert_eq!(table.find(hash, |s| s == w).map(String::as_str), Some(w));
        }

        let hash = HashKind::String.hash_one("gamma");
        assert_eq!(table.remove(hash, |s| s == "gamma"), Some("gamma".to_string()));
        assert!(table.find(hash, |s| s == "gamma").is_none());
    }

    #[test]
    fn entry_helpers() {
        let mut table: HashTable<Item> = HashTable::new();
        let item = table
            .entry(5, |v| v.key == 5)
            .or_insert_with(|| Item { key: 5, value: 1 });
        item.value += 1;

        let modified = table.entry(5, |v| v.key == 5).and_modify(|v| v.value *= 10);
        assert_eq!(modified.map(|v| v.value), Some(20));
        assert!(table.entry(6, |v| v.key == 6).and_modify(|_| {}).is_none());

        let mut counts: HashTable<u32> = HashTable::new();
        *counts.entry(1, |_| true).or_default() += 3;
        assert_eq!(counts.find(1, |_| true), Some(&3));

        match table.entry(5, |v| v.key == 5) {
            Entry::Occupied(e) => assert_eq!(e.remove().value, 20),
            Entry::Vacant(_) => unreachable!(),
        }
        assert!(table.is_empty());
    }

    #[test]
    fn random_workload_matches_model() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let mut table: HashTable<(u32, u32)> = HashTable::new();
        let mut model = std::collections::HashMap::new();

        for _ in 0..5000 {
            let key: u32 = rng.random_range(0..256);
            let hash = HashKind::Integer.hash_one(key);
            if rng.random_bool(0.6) {
                let value: u32 = rng.random();
                match table.entry(hash, |&(k, _)| k == key) {
                    Entry::Occupied(mut e) => e.get_mut().1 = value,
                    Entry::Vacant(e) => {
                        e.insert((key, value));
                    }
                }
                model.insert(key, value);
            } else {
                let removed = table.remove(hash, |&(k, _)| k == key).map(|(_, v)| v);
                assert_eq!(removed, model.remove(&key));
            }
            assert_eq!(table.len(), model.len());
            assert!(table.len() <= table.capacity());
        }

        for (key, value) in &model {
            let hash = HashKind::Integer.hash_one(key);
            assert_eq!(table.find(hash, |&(k, _)| k == *key).map(|e| e.1), Some(*value));
        }
    }

    #[test]
    fn test_clone() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..20u64 {
            insert_new(&mut table, k * 7, Item { key: k, value: 1 });
        }
        table.remove(0, |v| v.key == 0);

        let cloned = table.clone();
        assert_eq!(cloned.len(), table.len());
        assert_eq!(cloned.capacity(), table.capacity());
        for k in 1..20u64 {
            assert_eq!(cloned.find(k * 7, |v| v.key == k), table.find(k * 7, |v| v.key == k));
        }
    }

    #[test]
    fn test_shrink_to_fit_after_removals() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..100u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        assert_eq!(table.capacity(), 128);
        for k in 0..95u64 {
            table.remove(k, |v| v.key == k);
        }

        table.shrink_to_fit();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.tombstones(), 0);
        for k in 95..100u64 {
            assert!(table.find(k, |v| v.key == k).is_some());
        }
    }

    #[test]
    fn test_reserve_and_clear() {
        let mut table: HashTable<Item> = HashTable::new();
        table.reserve(100);
        assert_eq!(table.capacity(), 128);

        for k in 0..100u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        assert_eq!(table.capacity(), 128);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 128);
        assert!(table.find(5, |v| v.key == 5).is_none());
    }

    #[test]
    fn debug_stats_reflect_layout() {
        let mut table: HashTable<Item> = HashTable::with_capacity(8);
        insert_new(&mut table, 0, Item { key: 0, value: 0 });
        insert_new(&mut table, 0, Item { key: 1, value: 0 });
        insert_new(&mut table, 3, Item { key: 2, value: 0 });

        let stats = table.debug_stats();
        assert_eq!(stats.populated, 3);
        assert_eq!(stats.capacity, 8);
        assert_eq!(stats.max_probe, 1);
        assert!((stats.mean_probe - 1.0 / 3.0).abs() < 1e-9);
        #[cfg(feature = "std")]
        stats.print();
    }

    #[test]
    fn into_iter_yields_owned_values() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..6u64 {
            insert_new(&mut table, k, Item { key: k, value: 0 });
        }
        let mut keys: Vec<u64> = table.into_iter().map(|v| v.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 1, 2, 3, 4, 5]);
    }
}
