use super::handle::Handle;

/// AVL heights stay below 1.45 * log2(n + 2), so a byte covers any handle width.
pub(crate) type Height = u8;

/// Which child link a descent follows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// A binary search tree node. Sentinels are reserved handles and never get a `Node`.
pub(crate) struct Node<K> {
    key: K,
    // Handle into the value arena. Values live apart from the links so that mutable value
    // iteration never overlaps the structure being walked.
    value: Handle,
    // Leaf = 1; an absent child counts as 0.
    height: Height,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a detached leaf.
    pub(crate) fn new(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            height: 1,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    /// Consumes the node, returning the key and the value handle it owned.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn height(&self) -> Height {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: Height) {
        self.height = height;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Overwrites one child link. The child's parent link is the caller's business.
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs from, if it is a child of this node at all.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }
}
