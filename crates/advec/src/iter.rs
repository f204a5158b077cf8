//! Owning iterator.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use advec_raw::RawStorage;

/// Iterator that moves elements out of a [`Vector`](crate::Vector).
///
/// Holds the vector's block. Slots `[front, back)` are live; elements not
/// consumed are dropped with the iterator, then the block is released.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    /// Take over `storage` whose first `len` slots are live.
    pub(crate) fn new(storage: RawStorage<T>, len: usize) -> Self {
        Self {
            storage,
            front: 0,
            back: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [front, back) are live.
        unsafe { slice::from_raw_parts(self.storage.slot(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: slot `front` is live and leaves the live range here.
        let item = unsafe { self.storage.slot(self.front).read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: slot `back` was live and is now outside the range.
        Some(unsafe { self.storage.slot(self.back).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest =
            ptr::slice_from_raw_parts_mut(self.storage.slot(self.front), self.back - self.front);
        self.front = self.back;
        // SAFETY: `rest` is exactly the unconsumed live range.
        unsafe { ptr::drop_in_place(rest) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
