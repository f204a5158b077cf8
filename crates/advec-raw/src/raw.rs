//! Owned, uninitialised element storage.
//!
//! [`RawStorage`] owns one contiguous block sized for `capacity` values of
//! `T` and nothing else: it never constructs, reads, or drops elements.
//! Tracking which slots are live is the owner's job.
//!
//! Every `unsafe` block in this module carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::contract_assert;
use crate::error::AllocError;

/// A block of uninitialised memory for exactly `capacity` elements of `T`.
///
/// The empty state holds a dangling pointer and capacity 0. Zero-sized
/// element types never touch the allocator; the requested capacity is
/// recorded as-is. The block is released on drop, live elements or not.
///
/// Not `Clone`: ownership moves only through [`take`](Self::take) or
/// [`swap`](Self::swap).
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    /// The storage logically owns `T` values once its owner writes them.
    _owns: PhantomData<T>,
}

// SAFETY: `RawStorage` uniquely owns its block; sending or sharing it is
// exactly as safe as sending or sharing the `T` values it may hold.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: see above; `&RawStorage` hands out only raw pointers.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    /// The empty state: no block, capacity 0.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Reserve uninitialised memory for exactly `capacity` elements.
    ///
    /// `capacity == 0` yields the empty state without calling the allocator.
    /// Fails with [`AllocError::CapacityOverflow`] if the byte size exceeds
    /// `isize::MAX`, or [`AllocError::OutOfMemory`] if the allocator
    /// returns null.
    pub fn allocate(capacity: usize) -> Result<Self, AllocError> {
        let layout = Layout::array::<T>(capacity).map_err(|_| {
            log::debug!("raw storage: {capacity} slots overflow the maximum layout size");
            AllocError::CapacityOverflow
        })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            log::debug!(
                "raw storage: allocation of {} bytes for {capacity} slots failed",
                layout.size()
            );
            return Err(AllocError::OutOfMemory { layout });
        };
        log::trace!(
            "raw storage: allocated {capacity} slots ({} bytes)",
            layout.size()
        );
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Like [`allocate`](Self::allocate), escalating failure through
    /// [`AllocError::handle`].
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::allocate(capacity).unwrap_or_else(|err| err.handle())
    }

    /// Number of element slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the block in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * mem::size_of::<T>()
    }

    /// Address of slot 0. Dangling, but aligned, in the empty state.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable address of slot 0.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` (one past the last slot) is allowed. Larger
    /// offsets violate the contract; that is asserted only in checked
    /// builds. The slot's liveness is never checked: reading through the
    /// pointer is sound only if the owner initialised it.
    pub fn slot(&self, offset: usize) -> *mut T {
        contract_assert!(
            offset <= self.capacity,
            "slot offset {offset} out of range for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Exchange blocks with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the block out, leaving `self` in the empty state.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Layout of the owned block, `None` if nothing was allocated.
    fn layout(&self) -> Option<Layout> {
        if self.capacity == 0 || mem::size_of::<T>() == 0 {
            return None;
        }
        Layout::array::<T>(self.capacity).ok()
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            log::trace!(
                "raw storage: released {} slots ({} bytes)",
                self.capacity,
                layout.size()
            );
            // SAFETY: `ptr` was returned by `alloc::alloc` with this exact
            // layout (same `T`, same capacity) and has not been freed.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T> fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
