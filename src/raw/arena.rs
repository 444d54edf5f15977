use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage standing in for the node allocator: `alloc` acquires and constructs,
/// `take`/`free` destroy and release. Released slots are recycled before the backing
/// vector grows, so a handle stays put for as long as its element is alive.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of additional elements that fit without growing `slots`.
    fn spare(&self) -> usize {
        self.free.len() + (self.slots.capacity() - self.slots.len())
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let spare = self.spare();
        if additional > spare {
            self.slots.reserve(additional - self.free.len());
        }
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let spare = self.spare();
        if additional > spare {
            self.slots.try_reserve(additional - self.free.len())?;
        }
        Ok(())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            // The top two handle values are the sentinels, so they must never be handed out.
            assert!(
                self.slots.len() < Handle::MAX_SLOTS,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX_SLOTS
            );
            // Allocate a new slot/handle.
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Returns the element behind `handle`, or `None` for sentinels and vacant slots.
    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index()).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to an element by handle from a raw pointer, without
    /// creating a reference to any other slot.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>` that outlives `'a`.
    /// - No other reference to the element at `handle` may exist for `'a`.
    /// - The arena must not be grown, shrunk or cleared for `'a`.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        let index = handle.to_index();
        // SAFETY: Caller guarantees ptr is valid. Only the `slots` header is read; the element is
        // reached through the buffer pointer so earlier references to other slots stay valid.
        unsafe {
            let slots = &raw mut (*ptr).slots;
            assert!(index < (*slots).len(), "`Arena::get_mut_ptr()` - `handle` is invalid!");
            (*(*slots).as_mut_ptr().add(index)).as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!")
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
