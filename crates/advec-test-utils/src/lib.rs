//! Test utilities for advec development.
//!
//! Provides lifecycle-counting element types ([`Counters`], [`Tracked`]) and
//! panic helpers for exercising the container's unwinding paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use fixtures::{tracked, Counters, Tracked, CLONE_FUSE_MESSAGE};

/// Run `f`, catching a panic instead of unwinding the test.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(f))
}

/// The message of a caught panic, if it carried a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&'static str>().copied())
}
