use core::fmt;
use core::mem;

use super::Position;
use crate::compare::{Compare, Less};
use crate::raw::{Handle, RawAvlMap};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`crate::AvlTreeMap`].
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
/// use wabi_avl::avl_tree_map::Entry;
///
/// let mut map = AvlTreeMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: crate::AvlTreeMap::entry
pub enum Entry<'a, K: 'a, V: 'a, C = Less> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Entry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in an `AvlTreeMap`.
/// It is part of the [`Entry`] enum.
pub struct VacantEntry<'a, K, V, C = Less> {
    pub(super) key: K,
    pub(super) tree: &'a mut RawAvlMap<K, V, C>,
}

impl<K: fmt::Debug, V, C> fmt::Debug for VacantEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(&self.key).finish()
    }
}

/// A view into an occupied entry in an `AvlTreeMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
/// use wabi_avl::avl_tree_map::Entry;
///
/// let mut map = AvlTreeMap::new();
/// map.insert("oz", 1);
///
/// if let Entry::Occupied(mut o) = map.entry("oz") {
///     *o.get_mut() += 1;
/// }
/// assert_eq!(map["oz"], 2);
/// ```
pub struct OccupiedEntry<'a, K, V, C = Less> {
    pub(super) handle: Handle,
    pub(super) tree: &'a mut RawAvlMap<K, V, C>,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OccupiedEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K, V, C: Compare<K>> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) if vacant (insertion), O(1) if occupied.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting, if empty, the result of the default
    /// function called with the entry's key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    ///
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[must_use]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(o) = &mut self {
            f(o.get_mut());
        }
        self
    }

    /// Sets the value of the entry, and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        match self {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o
            }
            Entry::Vacant(v) => v.insert_entry(value),
        }
    }
}

impl<'a, K, V: Default, C: Compare<K>> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<&str, Option<usize>> = AvlTreeMap::new();
    /// map.entry("poneyland").or_default();
    ///
    /// assert_eq!(map["poneyland"], None);
    /// ```
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, C: Compare<K>> VacantEntry<'a, K, V, C> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns a mutable reference to it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_entry(value).into_mut()
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        let (handle, _) = self.tree.insert(self.key, value);
        OccupiedEntry { handle, tree: self.tree }
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    /// Gets a reference to the key in the entry.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.entry_at(self.handle).0
    }

    /// Returns the position of this entry in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    /// use wabi_avl::avl_tree_map::Entry;
    ///
    /// let mut map = AvlTreeMap::from([(7, "seven")]);
    /// let position = match map.entry(7) {
    ///     Entry::Occupied(o) => o.position(),
    ///     Entry::Vacant(_) => unreachable!(),
    /// };
    /// assert_eq!(position, map.find(&7));
    /// ```
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.handle)
    }

    /// Take ownership of the key and value from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    /// use wabi_avl::avl_tree_map::Entry;
    ///
    /// let mut map: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     // We delete the entry from the map.
    ///     o.remove_entry();
    /// }
    ///
    /// // If now try to get the value, it will panic:
    /// // println!("{}", map["poneyland"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry(self) -> (K, V) {
        self.tree.remove_handle(self.handle)
    }

    /// Gets a reference to the value in the entry.
    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.entry_at(self.handle).1
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.entry_at_mut(self.handle).1
    }

    /// Converts the entry into a mutable reference to its value.
    ///
    /// If you need multiple references to the `OccupiedEntry`, see [`get_mut`].
    ///
    /// [`get_mut`]: OccupiedEntry::get_mut
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.entry_at_mut(self.handle).1
    }

    /// Sets the value of the entry with the `OccupiedEntry`'s key,
    /// and returns the entry's old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    /// use wabi_avl::avl_tree_map::Entry;
    ///
    /// let mut map: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("poneyland") {
    ///     assert_eq!(o.insert(15), 12);
    /// }
    /// assert_eq!(map["poneyland"], 15);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::AvlTreeMap;
    use crate::avl_tree_map::Entry;
    use alloc::format;

    #[test]
    fn vacant_entry_keeps_key_until_insert() {
        let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
        let Entry::Vacant(v) = map.entry(4) else {
            panic!("expected a vacant entry");
        };
        assert_eq!(format!("{v:?}"), "VacantEntry(4)");
        assert_eq!(v.into_key(), 4);
        assert!(map.is_empty());
    }

    #[test]
    fn insert_entry_on_both_variants() {
        let mut map = AvlTreeMap::from([(1, "one")]);
        let o = map.entry(1).insert_entry("uno");
        assert_eq!(o.get(), &"uno");
        let o = map.entry(2).insert_entry("dos");
        assert_eq!(o.key(), &2);
        assert_eq!(o.remove(), "dos");
        assert_eq!(map.len(), 1);
        map.raw.validate_invariants();
    }

    #[test]
    fn occupied_entry_survives_rebalancing_elsewhere() {
        let mut map: AvlTreeMap<i32, i32> = (0..32).map(|k| (k, k)).collect();
        let Entry::Occupied(mut o) = map.entry(16) else {
            panic!("expected an occupied entry");
        };
        *o.get_mut() = -16;
        assert_eq!(o.remove_entry(), (16, -16));
        assert_eq!(map.len(), 31);
        map.raw.validate_invariants();
    }
}
