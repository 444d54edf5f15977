//! Key ordering predicates.
//!
//! An [`AvlTreeMap`](crate::AvlTreeMap) orders its keys with a [`Compare`] implementation
//! instead of requiring `K: Ord` directly. The default, [`Less`], defers to [`Ord`]; any
//! strict weak order can be plugged in through [`CompareFn`] or a custom type.

use core::cmp::Ordering;

/// A strict weak order over `T`.
///
/// `less(a, b)` answers "is `a` ordered before `b`?". Two values are *equivalent* when
/// neither is ordered before the other; a map never holds two equivalent keys.
///
/// Implementations must be irreflexive and transitive, and equivalence must be transitive.
/// A predicate that breaks these rules is a logic error: the map stays memory-safe but its
/// contents and iteration order become unspecified.
///
/// # Examples
///
/// ```
/// use wabi_avl::compare::Compare;
/// use wabi_avl::AvlTreeMap;
///
/// // Orders strings by length only, so "ab" and "cd" are equivalent.
/// struct ByLen;
///
/// impl Compare<&str> for ByLen {
///     fn less(&self, a: &&str, b: &&str) -> bool {
///         a.len() < b.len()
///     }
/// }
///
/// let mut map = AvlTreeMap::with_comparator(ByLen);
/// assert!(map.insert("ab", 1).1);
/// assert!(!map.insert("cd", 2).1);
/// assert_eq!(map.get(&"zz"), Some(&1));
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `a` is ordered strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;

    /// Three-way comparison derived from [`less`](Compare::less).
    ///
    /// Implementations backed by [`Ord`] should override this to compare once.
    fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<T: ?Sized, C: ?Sized + Compare<T>> Compare<T> for &C {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (**self).less(a, b)
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Ascending order by [`Ord`]. The default comparator of [`AvlTreeMap`](crate::AvlTreeMap).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Less;

impl<T: ?Sized + Ord> Compare<T> for Less {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Descending order by [`Ord`].
///
/// # Examples
///
/// ```
/// use wabi_avl::compare::Greater;
/// use wabi_avl::AvlTreeMap;
///
/// let mut map = AvlTreeMap::with_comparator(Greater);
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Greater;

impl<T: ?Sized + Ord> Compare<T> for Greater {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a > b
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Adapts a closure `Fn(&T, &T) -> bool` into a [`Compare`].
///
/// # Examples
///
/// ```
/// use wabi_avl::compare::CompareFn;
/// use wabi_avl::AvlTreeMap;
///
/// let mut map = AvlTreeMap::with_comparator(CompareFn(|a: &i32, b: &i32| a.abs() < b.abs()));
/// map.insert(-3, "minus three");
/// map.insert(1, "one");
/// assert!(!map.insert(3, "three").1);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, -3]);
/// ```
#[derive(Clone, Copy, Default)]
pub struct CompareFn<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for CompareFn<F> {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> core::fmt::Debug for CompareFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("CompareFn").finish_non_exhaustive()
    }
}

/// Orders whole `(key, value)` entries by key alone, using a map's key comparator.
///
/// Returned by [`AvlTreeMap::value_comp`](crate::AvlTreeMap::value_comp).
///
/// # Examples
///
/// ```
/// use wabi_avl::compare::Compare;
/// use wabi_avl::AvlTreeMap;
///
/// let map: AvlTreeMap<i32, char> = AvlTreeMap::new();
/// let by_key = map.value_comp();
/// assert!(by_key.less(&(1, 'z'), &(2, 'a')));
/// assert!(!by_key.less(&(2, 'a'), &(2, 'b')));
/// ```
pub struct ValueCompare<'a, C: ?Sized> {
    compare: &'a C,
}

impl<'a, C: ?Sized> ValueCompare<'a, C> {
    pub(crate) const fn new(compare: &'a C) -> Self {
        ValueCompare { compare }
    }
}

impl<C: ?Sized> Clone for ValueCompare<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for ValueCompare<'_, C> {}

impl<C: ?Sized + core::fmt::Debug> core::fmt::Debug for ValueCompare<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ValueCompare").field(&self.compare).finish()
    }
}

impl<K, V, C: ?Sized + Compare<K>> Compare<(K, V)> for ValueCompare<'_, C> {
    #[inline]
    fn less(&self, a: &(K, V), b: &(K, V)) -> bool {
        self.compare.less(&a.0, &b.0)
    }

    #[inline]
    fn compare(&self, a: &(K, V), b: &(K, V)) -> Ordering {
        self.compare.compare(&a.0, &b.0)
    }
}
