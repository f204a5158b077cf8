//! Storage-specific error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// Errors that can occur while reserving raw element storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in a valid layout, or the
    /// next growth step would overflow `usize`.
    CapacityOverflow,
    /// The global allocator could not satisfy the request.
    OutOfMemory {
        /// Layout of the failed request.
        layout: Layout,
    },
}

impl AllocError {
    /// Escalate the error for infallible callers.
    ///
    /// `OutOfMemory` goes through [`std::alloc::handle_alloc_error`] so any
    /// installed OOM hook sees it; `CapacityOverflow` panics.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle(self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::OutOfMemory { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => write!(f, "capacity overflow"),
            Self::OutOfMemory { layout } => {
                write!(
                    f,
                    "memory allocation of {} bytes (align {}) failed",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for AllocError {}
