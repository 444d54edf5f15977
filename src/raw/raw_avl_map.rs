use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::traverse;
use crate::compare::Compare;

/// Directions from the root down to a node. Trees of up to about four million entries never
/// spill the inline buffer.
type Route = SmallVec<[Side; 32]>;

/// The core AVL tree backing `AvlTreeMap`.
pub(crate) struct RawAvlMap<K, V, C> {
    /// Arena storing keys and tree links.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes so value iteration never aliases links).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty. Stepping off a sentinel starts here.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
    /// The key ordering.
    compare: C,
}

/// Outcome of a recursive insertion below some subtree.
#[derive(Clone, Copy)]
enum Placement {
    /// A new node was allocated and linked in.
    Inserted(Handle),
    /// An equivalent key was already present; the tree is unchanged.
    Occupied(Handle),
}

impl<K, V, C> RawAvlMap<K, V, C> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(compare: C) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            compare,
        }
    }

    /// Creates a new tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            compare,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries the tree can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.values.capacity())
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.values.reserve(additional);
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.nodes.try_reserve(additional)?;
        self.values.try_reserve(additional)
    }

    /// Destroys every node and value.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn compare(&self) -> &C {
        &self.compare
    }

    /// Height of the whole tree; 0 when empty.
    pub(crate) fn height(&self) -> usize {
        self.root.map_or(0, |root| usize::from(self.nodes.get(root).height()))
    }

    pub(crate) fn compare_mut(&mut self) -> &mut C {
        &mut self.compare
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<K>> {
        &self.nodes
    }

    pub(crate) fn values(&self) -> &Arena<V> {
        &self.values
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Borrows the links shared and the values exclusively, for mutable iteration.
    pub(crate) fn split_mut(&mut self) -> (&Arena<Node<K>>, &mut Arena<V>, Option<Handle>) {
        (&self.nodes, &mut self.values, self.root)
    }

    /// Returns the entry of a live node.
    pub(crate) fn entry_at(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// Returns the entry of a live node with a mutable value.
    pub(crate) fn entry_at_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get_mut(node.value()))
    }

    /// Returns the entry at `handle`, or `None` for a sentinel or a removed node.
    pub(crate) fn key_value(&self, handle: Handle) -> Option<(&K, &V)> {
        let node = self.nodes.try_get(handle)?;
        Some((node.key(), self.values.get(node.value())))
    }

    /// Returns the entry at `handle` with a mutable value, or `None` for a sentinel or a
    /// removed node.
    pub(crate) fn key_value_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        let node = self.nodes.try_get(handle)?;
        Some((node.key(), self.values.get_mut(node.value())))
    }

    /// Returns true if `handle` refers to a live node of this tree.
    pub(crate) fn contains_handle(&self, handle: Handle) -> bool {
        self.nodes.try_get(handle).is_some()
    }

    /// Returns the minimum node, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| traverse::leftmost(&self.nodes, root))
    }

    /// Returns the maximum node, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| traverse::rightmost(&self.nodes, root))
    }

    /// Returns the in-order successor of `handle`, stepping onto and saturating at the sentinels.
    pub(crate) fn next(&self, handle: Handle) -> Handle {
        traverse::successor(&self.nodes, self.root, handle)
    }

    /// Returns the in-order predecessor of `handle`, stepping onto and saturating at the
    /// sentinels.
    pub(crate) fn prev(&self, handle: Handle) -> Handle {
        traverse::predecessor(&self.nodes, self.root, handle)
    }

    /// Removes every entry, returning them in key order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.next(Handle::BEFORE_FIRST);
        while current != Handle::PAST_LAST {
            order.push(current);
            current = self.next(current);
        }

        let entries = order
            .into_iter()
            .map(|handle| {
                let (key, value) = self.nodes.take(handle).into_parts();
                (key, self.values.take(value))
            })
            .collect();
        self.clear();
        entries
    }

    /// Removes the node at `target` and returns its entry.
    ///
    /// Every other handle stays valid: in the two-children case the in-order successor is
    /// relinked into the removed node's place rather than having its entry moved.
    pub(crate) fn remove_handle(&mut self, target: Handle) -> (K, V) {
        let route = self.route_to(target);
        let root = self.root.expect("`RawAvlMap::remove_handle()` - tree is empty!");
        let (new_root, entry) = self.remove_along(root, &route);
        self.set_root(new_root);
        entry
    }

    /// Collects the sides taken from the root down to `target` by climbing parent links.
    fn route_to(&self, target: Handle) -> Route {
        let mut route = Route::new();
        let mut current = target;
        while let Some(parent) = self.nodes.get(current).parent() {
            let side = self.nodes.get(parent).side_of(current).expect("`RawAvlMap::route_to()` - broken parent link!");
            route.push(side);
            current = parent;
        }
        route.reverse();
        route
    }

    fn remove_along(&mut self, handle: Handle, route: &[Side]) -> (Option<Handle>, (K, V)) {
        let Some((&side, rest)) = route.split_first() else {
            return self.unlink(handle);
        };

        let child = self.nodes.get(handle).child(side).expect("`RawAvlMap::remove_along()` - route leaves the tree!");
        let (new_child, entry) = self.remove_along(child, rest);
        self.attach(handle, side, new_child);
        (Some(self.rebalance(handle)), entry)
    }

    /// Takes `handle` out of the tree and returns the subtree that replaces it.
    fn unlink(&mut self, handle: Handle) -> (Option<Handle>, (K, V)) {
        let (parent, left, right) = {
            let node = self.nodes.get(handle);
            (node.parent(), node.left(), node.right())
        };

        let replacement = match (left, right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => {
                self.nodes.get_mut(child).set_parent(parent);
                Some(child)
            }
            (Some(left), Some(right)) => {
                let (rest, successor) = self.detach_min(right);
                self.attach(successor, Side::Left, Some(left));
                self.attach(successor, Side::Right, rest);
                self.nodes.get_mut(successor).set_parent(parent);
                Some(self.rebalance(successor))
            }
        };

        (replacement, self.destroy(handle))
    }

    /// Detaches the minimum of the subtree at `handle`.
    /// Returns the rebalanced remainder of the subtree and the detached node.
    fn detach_min(&mut self, handle: Handle) -> (Option<Handle>, Handle) {
        match self.nodes.get(handle).left() {
            None => (self.nodes.get(handle).right(), handle),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.attach(handle, Side::Left, rest);
                (Some(self.rebalance(handle)), min)
            }
        }
    }

    /// Frees a node that is no longer linked and returns its entry.
    fn destroy(&mut self, handle: Handle) -> (K, V) {
        let (key, value) = self.nodes.take(handle).into_parts();
        self.len -= 1;
        (key, self.values.take(value))
    }

    /// Installs `root` and clears its parent link.
    fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
        if let Some(root) = root {
            self.nodes.get_mut(root).set_parent(None);
        }
    }

    /// Links `child` below `parent` on `side`, fixing the back-reference.
    fn attach(&mut self, parent: Handle, side: Side, child: Option<Handle>) {
        self.nodes.get_mut(parent).set_child(side, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(parent));
        }
    }

    fn child_height(&self, child: Option<Handle>) -> i16 {
        child.map_or(0, |c| i16::from(self.nodes.get(c).height()))
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let tallest = self.child_height(node.left()).max(self.child_height(node.right()));
        // Heights are bounded well below `u8::MAX`.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        self.nodes.get_mut(handle).set_height((tallest + 1) as u8);
    }

    /// Left height minus right height.
    fn balance(&self, handle: Handle) -> i16 {
        let node = self.nodes.get(handle);
        self.child_height(node.left()) - self.child_height(node.right())
    }

    /// Recomputes the height of `handle` and restores the AVL property there.
    /// Returns the root of the (possibly rotated) subtree.
    ///
    /// A child with zero balance gets the single rotation. That only happens after removals;
    /// after an insertion the heavy child is never level, so the choice matches the classic
    /// key-directed LL/LR/RL/RR selection.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.update_height(handle);
        let balance = self.balance(handle);

        if balance > 1 {
            let left = self.nodes.get(handle).left().expect("`RawAvlMap::rebalance()` - left-heavy without a left child!");
            if self.balance(left) < 0 {
                // Left-right case.
                self.rotate_left(left);
            }
            // Left-left case.
            return self.rotate_right(handle);
        }

        if balance < -1 {
            let right =
                self.nodes.get(handle).right().expect("`RawAvlMap::rebalance()` - right-heavy without a right child!");
            if self.balance(right) > 0 {
                // Right-left case.
                self.rotate_right(right);
            }
            // Right-right case.
            return self.rotate_left(handle);
        }

        handle
    }

    fn rotate_left(&mut self, handle: Handle) -> Handle {
        self.rotate(handle, Side::Left)
    }

    fn rotate_right(&mut self, handle: Handle) -> Handle {
        self.rotate(handle, Side::Right)
    }

    /// Rotates `handle` down towards `side`; its child on the other side becomes the subtree
    /// root. Parent links and the parent's child link are rewritten; only the two nodes whose
    /// subtrees changed get new heights.
    fn rotate(&mut self, handle: Handle, side: Side) -> Handle {
        let other = side.opposite();
        let pivot = self.nodes.get(handle).child(other).expect("`RawAvlMap::rotate()` - missing pivot child!");
        let inner = self.nodes.get(pivot).child(side);
        let parent = self.nodes.get(handle).parent();

        self.attach(handle, other, inner);
        self.attach(pivot, side, Some(handle));
        self.nodes.get_mut(pivot).set_parent(parent);
        if let Some(parent) = parent
            && let Some(slot) = self.nodes.get(parent).side_of(handle)
        {
            self.nodes.get_mut(parent).set_child(slot, Some(pivot));
        }

        self.update_height(handle);
        self.update_height(pivot);
        pivot
    }
}

impl<K, V, C> RawAvlMap<K, V, C> {
    /// Searches for a key and returns its node handle if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.compare.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the first node whose key is not ordered before `key`, or `PAST_LAST`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut best = Handle::PAST_LAST;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.compare.less(node.key().borrow(), key) {
                current = node.right();
            } else {
                best = handle;
                current = node.left();
            }
        }
        best
    }

    /// Returns the first node whose key is ordered strictly after `key`, or `PAST_LAST`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut best = Handle::PAST_LAST;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.compare.less(key, node.key().borrow()) {
                best = handle;
                current = node.left();
            } else {
                current = node.right();
            }
        }
        best
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.search(key)?;
        Some(self.values.get(self.nodes.get(handle).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.search(key)?;
        let value = self.nodes.get(handle).value();
        Some(self.values.get_mut(value))
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.search(key)?;
        Some(self.remove_handle(handle))
    }

    /// Inserts `key`/`value` unless an equivalent key is present.
    ///
    /// Returns the handle of the node holding the key and whether it was newly inserted. An
    /// existing entry is left untouched and the offered pair is dropped.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool)
    where
        C: Compare<K>,
    {
        let (root, placement) = self.insert_below(self.root, None, key, value);
        self.set_root(Some(root));
        match placement {
            Placement::Inserted(handle) => (handle, true),
            Placement::Occupied(handle) => (handle, false),
        }
    }

    /// Like [`insert`](Self::insert), but reserves storage first so that allocation failure
    /// leaves the tree untouched.
    pub(crate) fn try_insert(&mut self, key: K, value: V) -> Result<(Handle, bool), TryReserveError>
    where
        C: Compare<K>,
    {
        if let Some(handle) = self.search(&key) {
            return Ok((handle, false));
        }
        self.try_reserve(1)?;
        Ok(self.insert(key, value))
    }

    fn insert_below(&mut self, subtree: Option<Handle>, parent: Option<Handle>, key: K, value: V) -> (Handle, Placement)
    where
        C: Compare<K>,
    {
        let Some(handle) = subtree else {
            // Allocate before linking so a failed allocation leaves the structure intact.
            let value = self.values.alloc(value);
            let handle = self.nodes.alloc(Node::new(key, value, parent));
            self.len += 1;
            return (handle, Placement::Inserted(handle));
        };

        let side = match self.compare.compare(&key, self.nodes.get(handle).key()) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return (handle, Placement::Occupied(handle)),
        };

        let child = self.nodes.get(handle).child(side);
        let (new_child, placement) = self.insert_below(child, Some(handle), key, value);
        if let Placement::Occupied(_) = placement {
            return (handle, placement);
        }
        self.attach(handle, side, Some(new_child));
        (self.rebalance(handle), placement)
    }
}
