//! Growth policy and contract-check configuration.

use crate::error::AllocError;

/// Whether [`contract_assert!`](crate::contract_assert) checks are compiled in.
///
/// On in debug builds, and in release builds with the `checked` feature.
pub const CONTRACT_CHECKS: bool = cfg!(any(debug_assertions, feature = "checked"));

/// Capacity growth schedule used when an insert finds the storage full.
///
/// Growth is geometric: the first allocation holds
/// [`INITIAL_CAPACITY`](Self::INITIAL_CAPACITY) elements and every later one
/// multiplies the current capacity by [`FACTOR`](Self::FACTOR).
#[derive(Clone, Copy, Debug)]
pub struct GrowthPolicy;

impl GrowthPolicy {
    /// Capacity of the first block allocated for an empty storage.
    pub const INITIAL_CAPACITY: usize = 1;

    /// Multiplier applied to a full storage's capacity.
    pub const FACTOR: usize = 2;

    /// Capacity to grow to from `current`.
    ///
    /// Returns `max(INITIAL_CAPACITY, current * FACTOR)`, or
    /// [`AllocError::CapacityOverflow`] if the product overflows.
    pub fn next_capacity(current: usize) -> Result<usize, AllocError> {
        current
            .checked_mul(Self::FACTOR)
            .map(|next| next.max(Self::INITIAL_CAPACITY))
            .ok_or(AllocError::CapacityOverflow)
    }
}

/// Assert a caller contract when [`CONTRACT_CHECKS`] is on.
///
/// Compiles to nothing otherwise. Only for conditions whose violation is a
/// programmer error that cannot be turned into recoverable failure.
#[macro_export]
macro_rules! contract_assert {
    ($cond:expr, $($arg:tt)+) => {
        if $crate::config::CONTRACT_CHECKS {
            assert!($cond, $($arg)+);
        }
    };
}
