//! In-order stepping over the node arena.
//!
//! Everything here works on a shared `Arena<Node<K>>` plus the current root so that the
//! mutable iterators can step through the structure without borrowing the value arena.

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// Returns the leftmost node of the subtree rooted at `handle`.
pub(crate) fn leftmost<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(left) = nodes.get(handle).left() {
        handle = left;
    }
    handle
}

/// Returns the rightmost node of the subtree rooted at `handle`.
pub(crate) fn rightmost<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(right) = nodes.get(handle).right() {
        handle = right;
    }
    handle
}

/// Returns the in-order successor of `handle`.
///
/// The successor of `BEFORE_FIRST` is the minimum (or `PAST_LAST` when the tree is empty).
/// `PAST_LAST` is its own successor.
pub(crate) fn successor<K>(nodes: &Arena<Node<K>>, root: Option<Handle>, handle: Handle) -> Handle {
    if handle == Handle::PAST_LAST {
        return Handle::PAST_LAST;
    }
    if handle == Handle::BEFORE_FIRST {
        return root.map_or(Handle::PAST_LAST, |root| leftmost(nodes, root));
    }

    let node = nodes.get(handle);
    if let Some(right) = node.right() {
        return leftmost(nodes, right);
    }

    // Climb until we leave a left subtree.
    let mut current = handle;
    let mut parent = node.parent();
    while let Some(p) = parent {
        let parent_node = nodes.get(p);
        if parent_node.left() == Some(current) {
            return p;
        }
        current = p;
        parent = parent_node.parent();
    }
    Handle::PAST_LAST
}

/// Returns the in-order predecessor of `handle`.
///
/// The predecessor of `PAST_LAST` is the maximum (or `BEFORE_FIRST` when the tree is empty).
/// `BEFORE_FIRST` is its own predecessor.
pub(crate) fn predecessor<K>(nodes: &Arena<Node<K>>, root: Option<Handle>, handle: Handle) -> Handle {
    if handle == Handle::BEFORE_FIRST {
        return Handle::BEFORE_FIRST;
    }
    if handle == Handle::PAST_LAST {
        return root.map_or(Handle::BEFORE_FIRST, |root| rightmost(nodes, root));
    }

    let node = nodes.get(handle);
    if let Some(left) = node.left() {
        return rightmost(nodes, left);
    }

    let mut current = handle;
    let mut parent = node.parent();
    while let Some(p) = parent {
        let parent_node = nodes.get(p);
        if parent_node.right() == Some(current) {
            return p;
        }
        current = p;
        parent = parent_node.parent();
    }
    Handle::BEFORE_FIRST
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::node::Side;
    use alloc::vec::Vec;

    // Builds the tree
    //
    //         4
    //       /   \
    //      2     6
    //     / \     \
    //    1   3     7
    //
    // by hand and returns the arena, the root and the handles in key order.
    fn sample() -> (Arena<Node<i32>>, Handle, Vec<Handle>) {
        let mut nodes: Arena<Node<i32>> = Arena::new();
        let value = Handle::from_index(0);
        let n4 = nodes.alloc(Node::new(4, value, None));
        let n2 = nodes.alloc(Node::new(2, value, Some(n4)));
        let n6 = nodes.alloc(Node::new(6, value, Some(n4)));
        let n1 = nodes.alloc(Node::new(1, value, Some(n2)));
        let n3 = nodes.alloc(Node::new(3, value, Some(n2)));
        let n7 = nodes.alloc(Node::new(7, value, Some(n6)));
        nodes.get_mut(n4).set_child(Side::Left, Some(n2));
        nodes.get_mut(n4).set_child(Side::Right, Some(n6));
        nodes.get_mut(n2).set_child(Side::Left, Some(n1));
        nodes.get_mut(n2).set_child(Side::Right, Some(n3));
        nodes.get_mut(n6).set_child(Side::Right, Some(n7));
        (nodes, n4, alloc::vec![n1, n2, n3, n4, n6, n7])
    }

    #[test]
    fn forward_walk_visits_in_order() {
        let (nodes, root, order) = sample();
        let mut walked = Vec::new();
        let mut current = successor(&nodes, Some(root), Handle::BEFORE_FIRST);
        while current != Handle::PAST_LAST {
            walked.push(current);
            current = successor(&nodes, Some(root), current);
        }
        assert_eq!(walked, order);
    }

    #[test]
    fn backward_walk_visits_in_reverse_order() {
        let (nodes, root, mut order) = sample();
        order.reverse();
        let mut walked = Vec::new();
        let mut current = predecessor(&nodes, Some(root), Handle::PAST_LAST);
        while current != Handle::BEFORE_FIRST {
            walked.push(current);
            current = predecessor(&nodes, Some(root), current);
        }
        assert_eq!(walked, order);
    }

    #[test]
    fn sentinels_on_empty_tree() {
        let nodes: Arena<Node<i32>> = Arena::new();
        assert_eq!(successor(&nodes, None, Handle::BEFORE_FIRST), Handle::PAST_LAST);
        assert_eq!(predecessor(&nodes, None, Handle::PAST_LAST), Handle::BEFORE_FIRST);
    }

    #[test]
    fn sentinels_saturate() {
        let (nodes, root, _) = sample();
        assert_eq!(successor(&nodes, Some(root), Handle::PAST_LAST), Handle::PAST_LAST);
        assert_eq!(predecessor(&nodes, Some(root), Handle::BEFORE_FIRST), Handle::BEFORE_FIRST);
    }

    #[test]
    fn extremes() {
        let (nodes, root, order) = sample();
        assert_eq!(leftmost(&nodes, root), order[0]);
        assert_eq!(rightmost(&nodes, root), order[order.len() - 1]);
    }
}
