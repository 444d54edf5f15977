use alloc::collections::TryReserveError;

use super::{AvlTreeMap, Position};
use crate::compare::{Compare, Less};
use crate::raw::{Handle, RawAvlMap};

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTreeMap::with_capacity_and_comparator(capacity, Less)
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Creates an empty map ordered by `compare` with capacity for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        AvlTreeMap {
            raw: RawAvlMap::with_capacity(capacity, compare),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    ///
    /// Slots freed by removals count towards this capacity.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the largest number of elements any map can hold.
    ///
    /// Inserting past this limit panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<u8, ()> = AvlTreeMap::new();
    /// assert!(map.max_len() >= u16::MAX as usize);
    /// ```
    #[must_use]
    pub fn max_len(&self) -> usize {
        Handle::MAX_SLOTS
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, 1)]);
    /// map.reserve(10);
    /// assert!(map.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, or the allocator reports a failure, then an error is returned
    /// and the map is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }
}

impl<K, V, C: Compare<K>> AvlTreeMap<K, V, C> {
    /// Inserts a key-value pair like [`insert`](AvlTreeMap::insert), reporting allocation
    /// failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns the allocation error if storage for a new entry could not be reserved. The map is
    /// unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// let (_, inserted) = map.try_insert(1, "a").expect("out of memory");
    /// assert!(inserted);
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), TryReserveError> {
        let (handle, inserted) = self.raw.try_insert(key, value)?;
        Ok((Position::new(handle), inserted))
    }
}
