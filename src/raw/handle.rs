use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Number of slots an arena may hand out. The two highest indices are reserved for the
    /// sentinels.
    pub(crate) const MAX_SLOTS: usize = Self::MAX - 1;

    /// The "one before the first element" sentinel. Never backed by an arena slot.
    pub(crate) const BEFORE_FIRST: Self = Self::from_index(Self::MAX);

    /// The "one past the last element" sentinel. Never backed by an arena slot.
    pub(crate) const PAST_LAST: Self = Self::from_index(Self::MAX - 1);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.to_index() >= Self::MAX_SLOTS
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Verify our assumptions about `Handle` and the niche optimization.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn sentinels_are_distinct_and_reserved() {
        assert_ne!(Handle::BEFORE_FIRST, Handle::PAST_LAST);
        assert!(Handle::BEFORE_FIRST.is_sentinel());
        assert!(Handle::PAST_LAST.is_sentinel());
        assert!(!Handle::from_index(Handle::MAX_SLOTS - 1).is_sentinel());
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            assert_eq!(handle.to_index(), index);
        }

        #[test]
        fn slot_handles_are_never_sentinels(index in 0..Handle::MAX_SLOTS) {
            assert!(!Handle::from_index(index).is_sentinel());
        }
    }
}
