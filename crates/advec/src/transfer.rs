//! Element transfer into uninitialised slots.
//!
//! Two strategies move values into a block:
//!
//! - **Relocation** ([`relocate`]): a bitwise move. Rust moves cannot fail,
//!   so growth and insertion always relocate and never need a rollback path.
//! - **Duplication** ([`duplicate`], [`write_n`]): values are produced one at a
//!   time by user code (`Clone`, `Default`, a closure) that may panic. A
//!   guard drops the already-written prefix before the panic leaves.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

/// Move `count` live elements from `src` into the slots starting at `dst`.
///
/// # Safety
///
/// `src` must be valid for reading `count` live elements and `dst` valid for
/// writing `count` elements; the ranges must not overlap. Afterwards the
/// source slots are dead and must not be dropped.
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    // SAFETY: forwarded from the caller.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) }
}

/// Clone every element of `src` into the slots starting at `dst`.
///
/// # Safety
///
/// Same as [`write_n`] with `count == src.len()`.
pub(crate) unsafe fn duplicate<T: Clone>(src: &[T], dst: *mut T) {
    // SAFETY: forwarded from the caller.
    unsafe { write_n(dst, src.len(), |i| src[i].clone()) }
}

/// Write `count` values built by `make(i)` into consecutive slots from `dst`.
///
/// If `make` panics the `i` values already written are dropped, leaving every
/// slot uninitialised again.
///
/// # Safety
///
/// `dst` must be valid for writing `count` elements and the slots must not
/// hold live values.
pub(crate) unsafe fn write_n<T>(dst: *mut T, count: usize, mut make: impl FnMut(usize) -> T) {
    let mut guard = PartialInit { dst, written: 0 };
    while guard.written < count {
        let value = make(guard.written);
        // SAFETY: `written < count`, so the slot is in range and still empty.
        unsafe { dst.add(guard.written).write(value) };
        guard.written += 1;
    }
    mem::forget(guard);
}

/// Drops the first `written` slots from `dst` unless forgotten.
struct PartialInit<T> {
    dst: *mut T,
    written: usize,
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `written` slots were initialised.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.dst, self.written)) }
    }
}
