//! The growable vector.
//!
//! [`Vector`] owns one [`RawStorage`] and counts how many leading slots hold
//! live values. Every operation that constructs, moves or destroys elements
//! lives here; the storage only hands out memory.
//!
//! # Panic safety
//!
//! User code invoked by the vector (`Clone`, `Default`, emplace closures,
//! `Drop`) may panic. The vector never leaks or double-drops because of it,
//! and these operations leave it exactly as it was when the panic comes from
//! constructing the new value:
//!
//! - every insert and emplace, including the reallocating path,
//! - [`Vector::try_reserve`] / [`Vector::reserve`],
//! - `clone`, and `clone_from` when it has to reallocate.

#![allow(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use advec_raw::{contract_assert, AllocError, GrowthPolicy, RawStorage};

use crate::iter::IntoIter;
use crate::transfer;

/// A contiguous growable array.
///
/// Slots `[0, len)` of the storage are live; `[len, capacity)` are
/// uninitialised. `len <= capacity` holds between every two calls.
///
/// Capacity grows geometrically on insertion (1, 2, 4, 8, ... from empty)
/// and exactly on [`reserve`](Self::reserve) and [`resize`](Self::resize).
/// Growth relocates the elements bitwise and never clones them.
pub struct Vector<T> {
    storage: RawStorage<T>,
    size: usize,
}

impl<T> Vector<T> {
    /// An empty vector. Does not allocate.
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new(),
            size: 0,
        }
    }

    /// An empty vector with room for exactly `capacity` elements.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RawStorage::with_capacity(capacity),
            size: 0,
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Alias of [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots allocated, live or not.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, size) are live and the base pointer is aligned
        // and non-null even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.size) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.size) }
    }

    /// Address of the first element (the `begin` position).
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Mutable address of the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Reference to the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index < len()`. Checked builds assert it.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        contract_assert!(
            index < self.size,
            "unchecked index {index} out of bounds for length {}",
            self.size
        );
        // SAFETY: the caller guarantees the slot is live.
        unsafe { &*self.storage.slot(index) }
    }

    /// Mutable reference to the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index < len()`. Checked builds assert it.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        contract_assert!(
            index < self.size,
            "unchecked index {index} out of bounds for length {}",
            self.size
        );
        // SAFETY: the caller guarantees the slot is live; `&mut self` is unique.
        unsafe { &mut *self.storage.slot(index) }
    }

    /// Grow the capacity to exactly `new_capacity` if it is larger.
    ///
    /// # Panics
    ///
    /// On capacity overflow; allocation failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    #[track_caller]
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve(new_capacity) {
            err.handle();
        }
    }

    /// Fallible [`reserve`](Self::reserve).
    ///
    /// On error the vector is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let mut fresh = RawStorage::allocate(new_capacity)?;
        // SAFETY: `fresh` is a separate block with at least `size` slots. The
        // old slots are dead afterwards and the old block is only released.
        unsafe { transfer::relocate(self.storage.as_ptr(), fresh.as_mut_ptr(), self.size) };
        self.adopt(fresh);
        Ok(())
    }

    /// Resize to `new_size`, filling new slots with values from `fill`.
    ///
    /// Shrinking drops the tail. Growing reserves exactly `new_size`. If
    /// `fill` panics, the values it already produced are dropped and `len`
    /// is unchanged.
    #[track_caller]
    pub fn resize_with(&mut self, new_size: usize, mut fill: impl FnMut() -> T) {
        if new_size <= self.size {
            self.truncate(new_size);
            return;
        }
        self.reserve(new_size);
        // SAFETY: after `reserve`, slots [size, new_size) exist and are empty.
        unsafe {
            transfer::write_n(self.storage.slot(self.size), new_size - self.size, |_| fill());
        }
        self.size = new_size;
    }

    /// Append `value`.
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        self.emplace(self.size, || value);
    }

    /// Append the value built by `make` and return a reference to it.
    #[track_caller]
    pub fn emplace_back(&mut self, make: impl FnOnce() -> T) -> &mut T {
        let index = self.emplace(self.size, make);
        // SAFETY: `index` was initialised by `emplace`.
        unsafe { &mut *self.storage.slot(index) }
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// Returns `index`, the position of the new element.
    ///
    /// # Panics
    ///
    /// If `index > len()`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace(index, || value)
    }

    /// Insert the value built by `make` at `index`.
    ///
    /// `make` runs before any element moves, so if it panics the vector is
    /// left untouched. Returns `index`.
    ///
    /// # Panics
    ///
    /// If `index > len()`.
    #[track_caller]
    pub fn emplace(&mut self, index: usize, make: impl FnOnce() -> T) -> usize {
        if index > self.size {
            position_out_of_bounds("insertion", index, self.size);
        }
        if self.size == self.capacity() {
            self.emplace_realloc(index, make);
        } else if index == self.size {
            let value = make();
            // SAFETY: `size < capacity`, so slot `size` is spare.
            unsafe { self.storage.slot(index).write(value) };
        } else {
            self.emplace_shift(index, make);
        }
        self.size += 1;
        index
    }

    /// Insertion into a full vector: build the new element in a grown block,
    /// then relocate the prefix and suffix around it.
    #[track_caller]
    fn emplace_realloc(&mut self, index: usize, make: impl FnOnce() -> T) {
        let new_capacity =
            GrowthPolicy::next_capacity(self.capacity()).unwrap_or_else(|err| err.handle());
        let mut fresh: RawStorage<T> = RawStorage::with_capacity(new_capacity);
        let value = make();
        // SAFETY: `fresh` holds `size + 1` or more empty slots and does not
        // overlap the current block. Slot `index` takes the new value, the
        // prefix keeps its offsets, the suffix moves up by one.
        unsafe {
            fresh.slot(index).write(value);
            transfer::relocate(self.storage.as_ptr(), fresh.as_mut_ptr(), index);
            transfer::relocate(
                self.storage.slot(index),
                fresh.slot(index + 1),
                self.size - index,
            );
        }
        self.adopt(fresh);
    }

    /// Interior insertion with spare capacity.
    fn emplace_shift(&mut self, index: usize, make: impl FnOnce() -> T) {
        // Built before the shift so a panic leaves no hole behind.
        let value = make();
        // SAFETY: `index < size < capacity`: [index, size) is live and slot
        // `size` is spare, so the overlapping move stays inside the block and
        // leaves slot `index` free for the new value.
        unsafe {
            let hole = self.storage.slot(index);
            ptr::copy(hole, hole.add(1), self.size - index);
            hole.write(value);
        }
    }

    /// Swap in `fresh` as the storage. The old live elements must already
    /// have been relocated out of the current block.
    fn adopt(&mut self, mut fresh: RawStorage<T>) {
        log::trace!(
            "vector: capacity {} -> {} ({} live)",
            self.capacity(),
            fresh.capacity(),
            self.size
        );
        self.storage.swap(&mut fresh);
    }

    /// Remove and return the element at `index`, shifting later elements left.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        if index >= self.size {
            position_out_of_bounds("removal", index, self.size);
        }
        // SAFETY: slot `index` is live. It is read out, then the live tail
        // [index + 1, size) slides over it and the last slot becomes dead.
        unsafe {
            let hole = self.storage.slot(index);
            let value = hole.read();
            ptr::copy(hole.add(1), hole, self.size - index - 1);
            self.size -= 1;
            value
        }
    }

    /// Drop the element at `index`, shifting later elements left.
    ///
    /// Returns `index`, now the position of the element that followed the
    /// erased one (equal to `len()` if it was the last).
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Remove and return the last element, if any.
    pub fn pop(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        self.size -= 1;
        // SAFETY: the slot was live and is now outside [0, size).
        Some(unsafe { self.storage.slot(self.size).read() })
    }

    /// Drop the last element.
    ///
    /// Calling this on an empty vector is a contract violation: checked
    /// builds panic, others do nothing.
    #[track_caller]
    pub fn pop_back(&mut self) {
        contract_assert!(self.size > 0, "pop_back on an empty vector");
        drop(self.pop());
    }

    /// Drop every element past `len`. No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.size {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.storage.slot(len), self.size - len);
        // Shrink first: a panicking destructor must not see the tail as live.
        self.size = len;
        // SAFETY: `tail` covers slots that were live and are no longer counted.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchange blocks and lengths with `other` in O(1).
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.size, &mut other.size);
    }

    /// Move-assign from `source`.
    ///
    /// `self` drops its elements and takes over `source`'s block and length;
    /// `source` is left empty with no block. No element is cloned or moved
    /// individually.
    pub fn take_from(&mut self, source: &mut Self) {
        *self = mem::take(source);
    }

    /// Make room for `additional` more elements, growing geometrically.
    #[track_caller]
    fn grow_for(&mut self, additional: usize) {
        let Some(required) = self.size.checked_add(additional) else {
            AllocError::CapacityOverflow.handle();
        };
        if required <= self.capacity() {
            return;
        }
        let doubled = GrowthPolicy::next_capacity(self.capacity()).unwrap_or(required);
        self.reserve(required.max(doubled));
    }
}

impl<T: Default> Vector<T> {
    /// A vector of `size` default values, with capacity exactly `size`.
    #[track_caller]
    pub fn with_size(size: usize) -> Self {
        let mut vector = Self::with_capacity(size);
        vector.resize_with(size, T::default);
        vector
    }

    /// Resize to `new_size`, filling new slots with `T::default()`.
    #[track_caller]
    pub fn resize(&mut self, new_size: usize) {
        self.resize_with(new_size, T::default);
    }
}

impl<T: Clone> Vector<T> {
    /// Append clones of every element of `items`.
    #[track_caller]
    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.grow_for(items.len());
        // SAFETY: `grow_for` made room for `items.len()` slots past `size`.
        unsafe { transfer::duplicate(items, self.storage.slot(self.size)) };
        self.size += items.len();
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, size) are live. The storage field is dropped
        // afterwards and releases the block, also when a destructor panics.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut storage = RawStorage::with_capacity(self.size);
        // SAFETY: `storage` has exactly `size` empty slots. If a clone
        // panics the written prefix is dropped and `storage` frees the block.
        unsafe { transfer::duplicate(self.as_slice(), storage.as_mut_ptr()) };
        Self {
            storage,
            size: self.size,
        }
    }

    /// Copy-assign, reusing the current block when it is large enough.
    fn clone_from(&mut self, source: &Self) {
        if source.size > self.capacity() {
            let mut copy = source.clone();
            self.swap_with(&mut copy);
            return;
        }

        let shared = self.size.min(source.size);
        for (dst, src) in self.as_mut_slice()[..shared]
            .iter_mut()
            .zip(&source.as_slice()[..shared])
        {
            dst.clone_from(src);
        }

        if self.size > source.size {
            self.truncate(source.size);
        } else {
            let tail = &source.as_slice()[shared..];
            // SAFETY: `source.size <= capacity`, so slots [size, source.size)
            // are spare.
            unsafe { transfer::duplicate(tail, self.storage.slot(self.size)) };
            self.size = source.size;
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Vector<T> {
    type Output = I::Output;

    #[track_caller]
    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for Vector<T> {
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vector<U>> for Vector<T> {
    fn eq(&self, other: &Vector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Vector<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for Vector<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Vector<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.grow_for(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Clone + 'a> Extend<&'a T> for Vector<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.extend(iter);
        vector
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(items: &[T]) -> Self {
        let mut vector = Self::with_capacity(items.len());
        vector.extend_from_slice(items);
        vector
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(items: [T; N]) -> Self {
        let mut vector = Self::with_capacity(N);
        for item in items {
            vector.push_back(item);
        }
        vector
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        let len = mem::replace(&mut this.size, 0);
        IntoIter::new(this.storage.take(), len)
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn position_out_of_bounds(operation: &str, index: usize, len: usize) -> ! {
    panic!("{operation} index {index} out of bounds for length {len}")
}
