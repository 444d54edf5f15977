use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Bound, Index, RangeBounds};

use crate::compare::{Compare, Less, ValueCompare};
use crate::raw::{Arena, Handle, Node, RawAvlMap, traverse};

mod capacity;
mod cursor;
mod entry;

pub use cursor::{Cursor, CursorMut, Position};
pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Validates that the start bound does not come after the end bound under `compare`.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, C, R>(compare: &C, range: &R)
where
    T: ?Sized,
    C: Compare<T>,
    R: RangeBounds<T>,
{
    match (range.start_bound(), range.end_bound()) {
        (Bound::Excluded(start), Bound::Excluded(end)) => {
            assert!(compare.less(start, end), "range start is not before range end in AvlTreeMap");
        }
        (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) => {
            assert!(!compare.less(end, start), "range start is greater than range end in AvlTreeMap");
        }
        _ => {}
    }
}

/// An ordered map based on an [AVL tree].
///
/// Entries are kept in key order as decided by the map's comparator `C`, a
/// [`Compare`] implementation that defaults to [`Less`] (ascending by [`Ord`]). Any strict
/// weak order can be supplied through [`AvlTreeMap::with_comparator`]; two keys that are
/// ordered neither way are *equivalent*, and the map holds at most one of them.
///
/// Every entry lives in its own tree node, reachable through a [`Position`]. Positions are
/// cheap `Copy` handles that stay valid across rotations and across the removal of other
/// entries, and two extra positions stand outside the ordering: [`before_begin`] (one before
/// the first entry) and [`end`] (one past the last). Stepping from either of them with
/// [`next_position`]/[`prev_position`] enters the map from that side.
///
/// Iterators obtained from functions such as [`AvlTreeMap::iter`], [`AvlTreeMap::into_iter`],
/// [`AvlTreeMap::values`], or [`AvlTreeMap::keys`] produce their items in key order, walk the
/// tree without any auxiliary stack, and take worst-case logarithmic and amortized constant
/// time per item returned.
///
/// Unlike the standard `BTreeMap`, [`insert`] never overwrites: inserting an equivalent key
/// leaves the stored entry untouched and reports where it is. Use [`get_mut`] or the
/// [`entry`] API to update values in place.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `AvlTreeMap` that observed the logic error and not result in undefined behavior. This could
/// include panics, incorrect results, aborts, memory leaks, and non-termination.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `AvlTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = AvlTreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///        Some(review) => println!("{movie}: {review}"),
///        None => println!("{movie} is unreviewed.")
///     }
/// }
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// Positions let you walk the map in both directions from any entry:
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (3, "c"), (5, "e")]);
/// let mut position = map.lower_bound(&2);
/// assert_eq!(map.get_at(position), Some((&3, &"c")));
/// position = map.next_position(position);
/// assert_eq!(map.get_at(position), Some((&5, &"e")));
/// position = map.next_position(position);
/// assert_eq!(position, map.end());
/// assert_eq!(map.get_at(position), None);
/// ```
///
/// ## `Entry` API
///
/// `AvlTreeMap` implements an [`Entry API`], which allows for complex
/// methods of getting, setting, updating and removing keys and their values:
///
/// [`Entry API`]: AvlTreeMap::entry
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let mut player_stats = AvlTreeMap::new();
///
/// // insert a key only if it doesn't already exist
/// player_stats.entry("health").or_insert(100);
///
/// // update a key, guarding against the key possibly not being set
/// let stat = player_stats.entry("attack").or_insert(100);
/// *stat += 42;
///
/// // modify an entry before an insert with in-place mutation
/// player_stats.entry("mana").and_modify(|mana| *mana += 200).or_insert(100);
/// assert_eq!(player_stats["attack"], 142);
/// ```
///
/// # Background
///
/// An AVL tree is a binary search tree in which the heights of the two child subtrees of
/// every node differ by at most one. After each insertion or removal the nodes on the path
/// back to the root have their heights recomputed, and any node that became unbalanced is
/// repaired with one or two rotations. A tree of `n` entries is therefore never taller than
/// about 1.44 log<sub>2</sub>(n + 2), which bounds every lookup, insertion, and removal by
/// O(log n) comparisons.
///
/// Nodes and values are stored in slot arenas and linked by compact handles, with a parent
/// link on every node so that iteration can step to the in-order successor or predecessor
/// without keeping a stack.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [`before_begin`]: AvlTreeMap::before_begin
/// [`end`]: AvlTreeMap::end
/// [`next_position`]: AvlTreeMap::next_position
/// [`prev_position`]: AvlTreeMap::prev_position
/// [`insert`]: AvlTreeMap::insert
/// [`get_mut`]: AvlTreeMap::get_mut
/// [`entry`]: AvlTreeMap::entry
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct AvlTreeMap<K, V, C = Less> {
    raw: RawAvlMap<K, V, C>,
}

/// The not-yet-yielded stretch `front..=back` of a borrowing iterator.
#[derive(Clone, Copy)]
struct Span {
    front: Handle,
    back: Handle,
    done: bool,
}

impl Span {
    const EMPTY: Span = Span {
        front: Handle::PAST_LAST,
        back: Handle::BEFORE_FIRST,
        done: true,
    };

    fn new(front: Handle, back: Handle) -> Self {
        Span {
            front,
            back,
            done: front.is_sentinel() || back.is_sentinel(),
        }
    }

    fn whole<K, V, C>(raw: &RawAvlMap<K, V, C>) -> Self {
        match (raw.first(), raw.last()) {
            (Some(front), Some(back)) => Span::new(front, back),
            _ => Span::EMPTY,
        }
    }

    fn pop_front<K>(&mut self, nodes: &Arena<Node<K>>, root: Option<Handle>) -> Option<Handle> {
        if self.done {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.done = true;
        } else {
            self.front = traverse::successor(nodes, root, current);
        }
        Some(current)
    }

    fn pop_back<K>(&mut self, nodes: &Arena<Node<K>>, root: Option<Handle>) -> Option<Handle> {
        if self.done {
            return None;
        }
        let current = self.back;
        if current == self.front {
            self.done = true;
        } else {
            self.back = traverse::predecessor(nodes, root, current);
        }
        Some(current)
    }
}

/// Shared view of the parts of a map the borrowing iterators read.
struct Walk<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: &'a Arena<V>,
    root: Option<Handle>,
}

impl<K, V> Clone for Walk<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Walk<'_, K, V> {}

impl<'a, K, V> Walk<'a, K, V> {
    fn new<C>(raw: &'a RawAvlMap<K, V, C>) -> Self {
        Walk {
            nodes: raw.nodes(),
            values: raw.values(),
            root: raw.root(),
        }
    }

    fn entry(self, handle: Handle) -> (&'a K, &'a V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }
}

/// Links borrowed shared, values borrowed exclusively, for the mutable iterators.
struct WalkMut<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: *mut Arena<V>,
    root: Option<Handle>,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: WalkMut behaves as (&K, &mut V) for the entries it visits.
unsafe impl<K: Sync, V: Send> Send for WalkMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for WalkMut<'_, K, V> {}

impl<'a, K, V> WalkMut<'a, K, V> {
    fn new<C>(raw: &'a mut RawAvlMap<K, V, C>) -> Self {
        let (nodes, values, root) = raw.split_mut();
        WalkMut {
            nodes,
            values: values as *mut Arena<V>,
            root,
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// Each live `handle` may be passed at most once over the lifetime `'a`.
    unsafe fn entry(&mut self, handle: Handle) -> (&'a K, &'a mut V) {
        let node = self.nodes.get(handle);
        // SAFETY: The values arena is exclusively borrowed for `'a` and never resized while we
        // hold it. Caller guarantees no other reference to this value was handed out.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        (node.key(), value)
    }
}

/// An iterator over the entries of an `AvlTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use wabi_avl::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    walk: Option<Walk<'a, K, V>>,
    span: Span,
    remaining: usize,
}

/// A mutable iterator over the entries of an `AvlTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`AvlTreeMap`]. See its
/// documentation for more.
///
/// [`iter_mut`]: AvlTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    walk: Option<WalkMut<'a, K, V>>,
    span: Span,
    remaining: usize,
}

/// An owning iterator over the entries of an `AvlTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `AvlTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`AvlTreeMap`].
///
/// [`keys`]: AvlTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`AvlTreeMap`].
///
/// [`values`]: AvlTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`AvlTreeMap`].
///
/// [`values_mut`]: AvlTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `AvlTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`AvlTreeMap`].
///
/// [`into_keys`]: AvlTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`AvlTreeMap`].
///
/// [`into_values`]: AvlTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// An iterator over a sub-range of entries in an `AvlTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`AvlTreeMap`].
///
/// [`range`]: AvlTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K: 'a, V: 'a> {
    walk: Option<Walk<'a, K, V>>,
    span: Span,
}

/// A mutable iterator over a sub-range of entries in an `AvlTreeMap`.
///
/// This `struct` is created by the [`range_mut`] method on [`AvlTreeMap`].
///
/// [`range_mut`]: AvlTreeMap::range_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RangeMut<'a, K: 'a, V: 'a> {
    walk: Option<WalkMut<'a, K, V>>,
    span: Span,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Makes a new, empty `AvlTreeMap` ordered by [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> AvlTreeMap<K, V> {
        AvlTreeMap {
            raw: RawAvlMap::new(Less),
        }
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Makes a new, empty `AvlTreeMap` ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::compare::CompareFn;
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::with_comparator(CompareFn(|a: &&str, b: &&str| a.len() < b.len()));
    /// map.insert("three", 3);
    /// map.insert("two", 2);
    /// assert_eq!(map.first_key_value(), Some((&"two", &2)));
    /// ```
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        AvlTreeMap {
            raw: RawAvlMap::new(compare),
        }
    }

    /// Returns the comparator that orders the keys.
    #[must_use]
    pub fn key_comp(&self) -> &C {
        self.raw.compare()
    }

    /// Returns a comparator that orders `(key, value)` entries by their keys, using the map's
    /// key comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::compare::{Compare, Greater};
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, char, Greater> = AvlTreeMap::with_comparator(Greater);
    /// let mut entries = vec![(1, 'a'), (3, 'c'), (2, 'b')];
    /// entries.sort_by(|a, b| map.value_comp().compare(a, b));
    /// assert_eq!(entries, [(3, 'c'), (2, 'b'), (1, 'a')]);
    /// ```
    #[must_use]
    pub fn value_comp(&self) -> ValueCompare<'_, C> {
        ValueCompare::new(self.raw.compare())
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// Every outstanding [`Position`] other than [`end`](Self::end) and
    /// [`before_begin`](Self::before_begin) becomes invalid.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the height of the underlying tree: 0 when empty, 1 for a single entry.
    ///
    /// This is an extension for inspecting balance; it is never more than about
    /// 1.44 log<sub>2</sub>(len + 2).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = (0..7).map(|k| (k, ())).collect();
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Swaps the contents and comparators of two maps.
    ///
    /// Positions keep referring to the same entries, which now belong to the other map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::from([(1, "a")]);
    /// let mut b = AvlTreeMap::from([(2, "b"), (3, "c")]);
    /// a.swap(&mut b);
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(b.get(&1), Some(&"a"));
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Returns the position of the first entry, or [`end`](Self::end) if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn begin(&self) -> Position {
        Position::new(self.raw.first().unwrap_or(Handle::PAST_LAST))
    }

    /// Returns the position one past the last entry.
    ///
    /// It never refers to an entry and stays the same for the lifetime of the map.
    #[must_use]
    pub fn end(&self) -> Position {
        Position::new(Handle::PAST_LAST)
    }

    /// Returns the position one before the first entry.
    ///
    /// It never refers to an entry and stays the same for the lifetime of the map.
    #[must_use]
    pub fn before_begin(&self) -> Position {
        Position::new(Handle::BEFORE_FIRST)
    }

    /// Returns the position following `position` in key order.
    ///
    /// From [`before_begin`](Self::before_begin) this is the first entry; from the last entry
    /// it is [`end`](Self::end). Stepping forward from `end` stays at `end`.
    ///
    /// # Panics
    ///
    /// Panics if `position` refers to an entry that has been removed and whose slot has not been
    /// reused, or if it was taken from another map (see [`Position`]).
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, amortized O(1) over a full traversal.
    #[must_use]
    pub fn next_position(&self, position: Position) -> Position {
        Position::new(self.raw.next(position.handle()))
    }

    /// Returns the position preceding `position` in key order.
    ///
    /// From [`end`](Self::end) this is the last entry; from the first entry it is
    /// [`before_begin`](Self::before_begin). Stepping back from `before_begin` stays there.
    ///
    /// # Panics
    ///
    /// Panics if `position` refers to an entry that has been removed and whose slot has not been
    /// reused, or if it was taken from another map (see [`Position`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, 'a'), (2, 'b')]);
    /// let last = map.prev_position(map.end());
    /// assert_eq!(map.get_at(last), Some((&2, &'b')));
    /// let first = map.prev_position(last);
    /// assert_eq!(map.prev_position(first), map.before_begin());
    /// ```
    #[must_use]
    pub fn prev_position(&self, position: Position) -> Position {
        Position::new(self.raw.prev(position.handle()))
    }

    /// Returns the entry at `position`, or `None` for [`end`](Self::end),
    /// [`before_begin`](Self::before_begin) and removed entries.
    ///
    /// A position whose entry was removed may observe a different entry once its slot is reused
    /// by a later insertion.
    #[must_use]
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        self.raw.key_value(position.handle())
    }

    /// Returns the entry at `position` with a mutable reference to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, 10)]);
    /// let position = map.begin();
    /// if let Some((_, value)) = map.get_at_mut(position) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map[&1], 11);
    /// ```
    #[must_use]
    pub fn get_at_mut(&mut self, position: Position) -> Option<(&K, &mut V)> {
        self.raw.key_value_mut(position.handle())
    }

    /// Returns a read-only cursor starting at `position`.
    #[must_use]
    pub fn cursor_at(&self, position: Position) -> Cursor<'_, K, V, C> {
        Cursor::new(self, position.handle())
    }

    /// Returns a cursor starting at `position` that can mutate values and remove entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let start = map.find(&2);
    /// let mut cursor = map.cursor_at_mut(start);
    /// assert_eq!(cursor.remove_current(), Some((2, "b")));
    /// assert_eq!(cursor.key(), Some(&3));
    /// ```
    #[must_use]
    pub fn cursor_at_mut(&mut self, position: Position) -> CursorMut<'_, K, V, C> {
        CursorMut::new(self, position.handle())
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.entry_at(handle))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.entry_at(handle))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_handle(handle))
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_handle(handle))
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// Returns `None` if `position` is [`end`](Self::end), [`before_begin`](Self::before_begin),
    /// or an entry that was already removed. Positions of all other entries stay valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, "a"), (2, "b")]);
    /// let position = map.find(&1);
    /// assert_eq!(map.remove_at(position), Some((1, "a")));
    /// assert_eq!(map.remove_at(position), None);
    /// assert_eq!(map.remove_at(map.end()), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_at(&mut self, position: Position) -> Option<(K, V)> {
        let handle = position.handle();
        self.raw.contains_handle(handle).then(|| self.raw.remove_handle(handle))
    }

    /// Removes every entry from `first` up to, but not including, `last`, and returns how many
    /// were removed.
    ///
    /// Removal stops early at [`end`](Self::end). `last` must not come before `first`, or every
    /// entry from `first` to the end of the map is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<_, _> = (1..=6).map(|k| (k, ())).collect();
    /// let first = map.find(&2);
    /// let last = map.find(&5);
    /// assert_eq!(map.remove_range(first, last), 3);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 5, 6]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n) for k removed entries.
    pub fn remove_range(&mut self, first: Position, last: Position) -> usize {
        let mut current = first.handle();
        if current == Handle::BEFORE_FIRST {
            current = self.raw.next(current);
        }

        let mut removed = 0;
        while current != last.handle() && self.raw.contains_handle(current) {
            // The successor's handle survives the removal.
            let next = self.raw.next(current);
            self.raw.remove_handle(current);
            removed += 1;
            current = next;
        }
        removed
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<i32, i32> = (0..8).map(|x| (x, x*10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self.raw.next(Handle::BEFORE_FIRST);
        while current != Handle::PAST_LAST {
            let next = self.raw.next(current);
            let (key, value) = self.raw.entry_at_mut(current);
            if !f(key, value) {
                self.raw.remove_handle(current);
            }
            current = next;
        }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<i32> = a.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(mut self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: IntoIter {
                inner: self.raw.drain_to_vec().into_iter(),
            },
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    pub fn into_values(mut self) -> IntoValues<K, V> {
        IntoValues {
            inner: IntoIter {
                inner: self.raw.drain_to_vec().into_iter(),
            },
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            walk: Some(Walk::new(&self.raw)),
            span: Span::whole(&self.raw),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([
    ///    ("a", 1),
    ///    ("b", 2),
    ///    ("c", 3),
    /// ]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let span = Span::whole(&self.raw);
        let remaining = self.raw.len();
        IterMut {
            walk: Some(WalkMut::new(&mut self.raw)),
            span,
            remaining,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the comparator must order
    /// the borrowed form the same way it orders the key type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// Useful when equivalent keys are not identical, to get hold of the stored one.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::compare::CompareFn;
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::with_comparator(CompareFn(|a: &String, b: &String| {
    ///     a.to_lowercase() < b.to_lowercase()
    /// }));
    /// map.insert("Paris".to_string(), 1);
    /// let probe = "PARIS".to_string();
    /// assert_eq!(map.get_key_value(&probe), Some((&"Paris".to_string(), &1)));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.raw.search(key)?;
        Some(self.raw.entry_at(handle))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Returns the number of entries with a key equivalent to `key`: always 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Returns the position of the entry with a key equivalent to `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, "a")]);
    /// assert_eq!(map.get_at(map.find(&1)), Some((&1, &"a")));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position::new(self.raw.search(key).unwrap_or(Handle::PAST_LAST))
    }

    /// Returns the position of the first entry whose key is not ordered before `key`, or
    /// [`end`](Self::end).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, ()), (3, ()), (5, ()), (7, ())]);
    /// assert_eq!(map.get_at(map.lower_bound(&4)).map(|(k, _)| *k), Some(5));
    /// assert_eq!(map.get_at(map.lower_bound(&5)).map(|(k, _)| *k), Some(5));
    /// assert_eq!(map.lower_bound(&8), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position::new(self.raw.lower_bound(key))
    }

    /// Returns the position of the first entry whose key is ordered strictly after `key`, or
    /// [`end`](Self::end).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, ()), (3, ()), (5, ()), (7, ())]);
    /// assert_eq!(map.get_at(map.upper_bound(&5)).map(|(k, _)| *k), Some(7));
    /// assert_eq!(map.upper_bound(&7), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position::new(self.raw.upper_bound(key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`: the half-open run of entries
    /// equivalent to `key`, which holds at most one entry.
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.remove_entry(key)
    }

    /// Removes the entry with a key equivalent to `key` and returns how many entries were
    /// removed: 0 or 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(5, "five")]);
    /// assert_eq!(map.erase(&5), 1);
    /// assert_eq!(map.erase(&5), 0);
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.raw.remove_entry(key).is_some())
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the map.
    /// The simplest way is to use the range syntax `min..max`, thus `range(min..max)` will
    /// yield elements from min (inclusive) to max (exclusive).
    /// The range may also be entered as `(Bound<T>, Bound<T>)`, so for example
    /// `range((Excluded(4), Included(10)))` will yield a left-exclusive, right-inclusive
    /// range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::Included;
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range((Included(&4), Included(&8))) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each iteration step is O(1) amortized.
    pub fn range<T, R>(&self, range: R) -> Range<'_, K, V>
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Compare<T>,
        R: RangeBounds<T>,
    {
        Range {
            walk: Some(Walk::new(&self.raw)),
            span: self.span_of(&range),
        }
    }

    /// Constructs a mutable double-ended iterator over a sub-range of elements in the map.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<&str, i32> =
    ///     [("Alice", 0), ("Bob", 0), ("Carol", 0), ("Cheryl", 0)].into();
    /// for (_, balance) in map.range_mut("B".."Cheryl") {
    ///     *balance += 100;
    /// }
    /// assert_eq!(map["Alice"], 0);
    /// assert_eq!(map["Carol"], 100);
    /// assert_eq!(map["Cheryl"], 0);
    /// ```
    pub fn range_mut<T, R>(&mut self, range: R) -> RangeMut<'_, K, V>
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Compare<T>,
        R: RangeBounds<T>,
    {
        let span = self.span_of(&range);
        RangeMut {
            walk: Some(WalkMut::new(&mut self.raw)),
            span,
        }
    }

    /// Locates the first and last entries inside `range`.
    fn span_of<T, R>(&self, range: &R) -> Span
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Compare<T>,
        R: RangeBounds<T>,
    {
        validate_range_bounds(self.raw.compare(), range);

        let front = match range.start_bound() {
            Bound::Unbounded => self.raw.next(Handle::BEFORE_FIRST),
            Bound::Included(start) => self.raw.lower_bound(start),
            Bound::Excluded(start) => self.raw.upper_bound(start),
        };
        let back = match range.end_bound() {
            Bound::Unbounded => self.raw.prev(Handle::PAST_LAST),
            Bound::Included(end) => self.raw.prev(self.raw.upper_bound(end)),
            Bound::Excluded(end) => self.raw.prev(self.raw.lower_bound(end)),
        };

        if front.is_sentinel() || back.is_sentinel() {
            return Span::EMPTY;
        }
        // The bounds can select nothing, e.g. `2..3` over `{1, 4}`, leaving back before front.
        let (front_key, _) = self.raw.entry_at(front);
        let (back_key, _) = self.raw.entry_at(back);
        if self.raw.compare().less(back_key.borrow(), front_key.borrow()) {
            return Span::EMPTY;
        }
        Span::new(front, back)
    }
}

impl<K, V, C: Compare<K>> AvlTreeMap<K, V, C> {
    /// Inserts a key-value pair into the map unless an equivalent key is already present.
    ///
    /// Returns the position of the entry holding the key and `true` if the pair was inserted.
    /// If the key was present, the map is unchanged, `value` is dropped, and `false` is returned
    /// alongside the position of the existing entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// let (position, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    /// assert_eq!(map.get_at(position), Some((&37, &"a")));
    ///
    /// let (again, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, position);
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (handle, inserted) = self.raw.insert(key, value);
        (Position::new(handle), inserted)
    }

    /// Inserts a key-value pair like [`insert`](Self::insert) and returns the position of the
    /// entry holding the key.
    ///
    /// The hint is accepted for compatibility and does not affect where the search starts.
    pub fn insert_with_hint(&mut self, _hint: Position, key: K, value: V) -> Position {
        self.insert(key, value).0
    }

    /// Inserts every pair of `iter` in order, skipping keys that are already present
    /// (including keys inserted earlier from the same iterator).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(2, "two")]);
    /// map.insert_range([(1, "one"), (2, "deux"), (1, "un")]);
    /// assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &"one"), (&2, &"two")]);
    /// ```
    pub fn insert_range<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.raw.insert(key, value);
        }
    }

    /// Returns a mutable reference to the value at `key`, inserting `V::default()` first if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    /// *map.get_or_insert_default(10) += 1;
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map[&10], 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let mut count: AvlTreeMap<&str, usize> = AvlTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        match self.raw.search(&key) {
            Some(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            None => Entry::Vacant(VacantEntry {
                key,
                tree: &mut self.raw,
            }),
        }
    }
}

impl<K: Clone, V: Clone, C: Clone + Compare<K>> Clone for AvlTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        let mut map = AvlTreeMap::with_capacity_and_comparator(self.len(), self.raw.compare().clone());
        map.extend(self.iter().map(|(k, v)| (k.clone(), v.clone())));
        map
    }

    /// Destroys the current contents, then re-inserts every entry of `source` in key order,
    /// reusing the storage already allocated.
    fn clone_from(&mut self, source: &Self) {
        self.raw.clear();
        self.raw.compare_mut().clone_from(source.raw.compare());
        self.raw.reserve(source.len());
        self.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<K: Hash, V: Hash, C> Hash for AvlTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for entry in self {
            entry.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for AvlTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for AvlTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for AvlTreeMap<K, V, C> {
    fn default() -> Self {
        AvlTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for AvlTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AvlTreeMap::default();
        map.extend(iter);
        map
    }
}

/// Keys already present keep their values, as with [`AvlTreeMap::insert`].
impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.insert_range(iter);
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for AvlTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.insert_range(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for AvlTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_avl::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for AvlTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Compare<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    /// Converts an `[(K, V); N]` into an `AvlTreeMap<K, V>`. For repeated keys the first
    /// pair wins.
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let walk = self.walk?;
        let handle = self.span.pop_front(walk.nodes, walk.root)?;
        self.remaining -= 1;
        Some(walk.entry(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let walk = self.walk?;
        let handle = self.span.pop_back(walk.nodes, walk.root)?;
        self.remaining -= 1;
        Some(walk.entry(handle))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `avl_tree_map::Iter`.
    ///
    /// ```
    /// # use wabi_avl::avl_tree_map;
    /// let iter: avl_tree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            walk: None,
            span: Span::EMPTY,
            remaining: 0,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            walk: self.walk,
            span: self.span,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let walk = self.walk.as_mut()?;
        let handle = self.span.pop_front(walk.nodes, walk.root)?;
        self.remaining -= 1;
        // SAFETY: The span yields every handle between its ends exactly once.
        Some(unsafe { walk.entry(handle) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let walk = self.walk.as_mut()?;
        let handle = self.span.pop_back(walk.nodes, walk.root)?;
        self.remaining -= 1;
        // SAFETY: Same as in next() - front and back never hand out the same handle.
        Some(unsafe { walk.entry(handle) })
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Default for IterMut<'_, K, V> {
    /// Creates an empty `avl_tree_map::IterMut`.
    ///
    /// ```
    /// # use wabi_avl::avl_tree_map;
    /// let iter: avl_tree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            walk: None,
            span: Span::EMPTY,
            remaining: 0,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Keys { inner: Iter::default() }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Values { inner: Iter::default() }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Default for ValuesMut<'_, K, V> {
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Default for IntoKeys<K, V> {
    fn default() -> Self {
        IntoKeys {
            inner: IntoIter::default(),
        }
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}

impl<K, V> Default for IntoValues<K, V> {
    fn default() -> Self {
        IntoValues {
            inner: IntoIter::default(),
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let walk = self.walk?;
        let handle = self.span.pop_front(walk.nodes, walk.root)?;
        Some(walk.entry(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.span.done { (0, Some(0)) } else { (1, None) }
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let walk = self.walk?;
        let handle = self.span.pop_back(walk.nodes, walk.root)?;
        Some(walk.entry(handle))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Range<'_, K, V> {
    /// Creates an empty `avl_tree_map::Range`.
    ///
    /// ```
    /// # use wabi_avl::avl_tree_map;
    /// let mut iter: avl_tree_map::Range<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.next(), None);
    /// ```
    fn default() -> Self {
        Range {
            walk: None,
            span: Span::EMPTY,
        }
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            walk: self.walk,
            span: self.span,
        }
    }
}

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let walk = self.walk.as_mut()?;
        let handle = self.span.pop_front(walk.nodes, walk.root)?;
        // SAFETY: The span yields every handle between its ends exactly once.
        Some(unsafe { walk.entry(handle) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.span.done { (0, Some(0)) } else { (1, None) }
    }
}

impl<K, V> DoubleEndedIterator for RangeMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let walk = self.walk.as_mut()?;
        let handle = self.span.pop_back(walk.nodes, walk.root)?;
        // SAFETY: Same as in next().
        Some(unsafe { walk.entry(handle) })
    }
}

impl<K, V> FusedIterator for RangeMut<'_, K, V> {}

impl<K, V> fmt::Debug for RangeMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeMut").field("done", &self.span.done).finish_non_exhaustive()
    }
}

impl<K, V> Default for RangeMut<'_, K, V> {
    fn default() -> Self {
        RangeMut {
            walk: None,
            span: Span::EMPTY,
        }
    }
}
