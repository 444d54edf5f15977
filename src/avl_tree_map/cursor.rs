use core::fmt;

use super::AvlTreeMap;
use crate::compare::Less;
use crate::raw::Handle;

/// A location in an [`AvlTreeMap`]: one of its entries, [`end`](AvlTreeMap::end), or
/// [`before_begin`](AvlTreeMap::before_begin).
///
/// Positions are plain `Copy` values compared by identity. One stays attached to its entry
/// while other entries are inserted or removed, and while the map is swapped with another
/// map. After its own entry is removed a position is stale: reading through it yields `None`
/// until the storage is reused by a later insertion, after which it may observe that new entry.
///
/// A position belongs to the map that produced it (or, after [`swap`](AvlTreeMap::swap), the
/// map now holding its entry). Using it with any other map is a logic error: reads return
/// `None` or an unrelated entry, and stepping may panic. The sentinels from
/// [`end`](AvlTreeMap::end) and [`before_begin`](AvlTreeMap::before_begin) are the same for every
/// map and are always safe to use.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let mut map = AvlTreeMap::from([(1, "a"), (2, "b")]);
/// let (position, _) = map.insert(3, "c");
/// map.remove(&1);
/// assert_eq!(map.get_at(position), Some((&3, &"c")));
/// assert!(map.end().is_end());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(Handle);

impl Position {
    pub(crate) const fn new(handle: Handle) -> Self {
        Position(handle)
    }

    pub(crate) const fn handle(self) -> Handle {
        self.0
    }

    /// Returns `true` for the position one past the last entry.
    #[must_use]
    pub fn is_end(self) -> bool {
        self.0 == Handle::PAST_LAST
    }

    /// Returns `true` for the position one before the first entry.
    #[must_use]
    pub fn is_before_begin(self) -> bool {
        self.0 == Handle::BEFORE_FIRST
    }
}

/// A read-only cursor over an [`AvlTreeMap`].
///
/// The cursor rests on an entry or on one of the two positions outside the ordering. Moving
/// forward from the last entry reaches the end position, moving back from the first entry
/// reaches the before-begin position, and moving further out stays put.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (2, "b")]);
/// let mut cursor = map.cursor_at(map.before_begin());
/// assert_eq!(cursor.key_value(), None);
/// cursor.move_next();
/// assert_eq!(cursor.key_value(), Some((&1, &"a")));
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.position().is_end());
/// cursor.move_next();
/// assert!(cursor.position().is_end());
/// cursor.move_prev();
/// assert_eq!(cursor.key(), Some(&2));
/// ```
pub struct Cursor<'a, K, V, C = Less> {
    map: &'a AvlTreeMap<K, V, C>,
    position: Handle,
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        Cursor {
            map: self.map,
            position: self.position,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(super) fn new(map: &'a AvlTreeMap<K, V, C>, position: Handle) -> Self {
        Cursor { map, position }
    }

    /// Returns the position the cursor rests on.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.position)
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Returns the entry under the cursor, or `None` outside the ordering.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.map.raw.key_value(self.position)
    }

    /// Moves to the next entry in key order.
    ///
    /// # Panics
    ///
    /// Panics if the cursor rests on an entry that has since been removed, or on a position
    /// taken from another map.
    pub fn move_next(&mut self) {
        self.position = self.map.raw.next(self.position);
    }

    /// Moves to the previous entry in key order.
    ///
    /// # Panics
    ///
    /// Panics if the cursor rests on an entry that has since been removed, or on a position
    /// taken from another map.
    pub fn move_prev(&mut self) {
        self.position = self.map.raw.prev(self.position);
    }

    /// Returns the entry the cursor would reach with [`move_next`](Self::move_next).
    #[must_use]
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        self.map.raw.key_value(self.map.raw.next(self.position))
    }

    /// Returns the entry the cursor would reach with [`move_prev`](Self::move_prev).
    #[must_use]
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        self.map.raw.key_value(self.map.raw.prev(self.position))
    }
}

/// A cursor over an [`AvlTreeMap`] that can update values and remove entries.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let mut map: AvlTreeMap<i32, i32> = (1..=5).map(|k| (k, k)).collect();
/// let begin = map.begin();
/// let mut cursor = map.cursor_at_mut(begin);
/// while let Some((key, value)) = cursor.key_value_mut() {
///     if key % 2 == 0 {
///         cursor.remove_current();
///     } else {
///         *value *= 10;
///         cursor.move_next();
///     }
/// }
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 10), (3, 30), (5, 50)]);
/// ```
pub struct CursorMut<'a, K, V, C = Less> {
    map: &'a mut AvlTreeMap<K, V, C>,
    position: Handle,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.map.raw.key_value(self.position)).finish()
    }
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub(super) fn new(map: &'a mut AvlTreeMap<K, V, C>, position: Handle) -> Self {
        CursorMut { map, position }
    }

    /// Returns the position the cursor rests on.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.position)
    }

    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.map.raw.key_value(self.position).map(|(k, _)| k)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.key_value_mut().map(|(_, v)| v)
    }

    /// Returns the entry under the cursor with a mutable value, or `None` outside the ordering.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.raw.key_value_mut(self.position)
    }

    /// Moves to the next entry in key order.
    ///
    /// # Panics
    ///
    /// Panics if the cursor rests on an entry that has since been removed, or on a position
    /// taken from another map.
    pub fn move_next(&mut self) {
        self.position = self.map.raw.next(self.position);
    }

    /// Moves to the previous entry in key order.
    ///
    /// # Panics
    ///
    /// Panics if the cursor rests on an entry that has since been removed, or on a position
    /// taken from another map.
    pub fn move_prev(&mut self) {
        self.position = self.map.raw.prev(self.position);
    }

    /// Removes the entry under the cursor and moves to the entry that followed it.
    ///
    /// Returns `None`, and does not move, when the cursor is outside the ordering.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        if !self.map.raw.contains_handle(self.position) {
            return None;
        }
        let next = self.map.raw.next(self.position);
        let entry = self.map.raw.remove_handle(self.position);
        self.position = next;
        Some(entry)
    }

    /// Returns a read-only cursor at the same position, borrowing this one.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self.map, self.position)
    }
}

impl<'a, K, V, C> From<CursorMut<'a, K, V, C>> for Cursor<'a, K, V, C> {
    /// Gives up mutable access, keeping the position.
    fn from(cursor: CursorMut<'a, K, V, C>) -> Self {
        Cursor::new(cursor.map, cursor.position)
    }
}
