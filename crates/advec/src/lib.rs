//! advec: a growable contiguous vector built from raw storage up.
//!
//! [`Vector<T>`] has the contract of a standard dynamic array: amortised
//! O(1) append, O(1) indexing, O(n) insertion and removal at arbitrary
//! positions, independent copies through `Clone`, and O(1) moves. It is
//! layered over [`RawStorage<T>`](raw::RawStorage) from `advec-raw`, which
//! owns uninitialised memory and nothing else.
//!
//! # Quick start
//!
//! ```rust
//! use advec::Vector;
//!
//! let mut v = Vector::new();
//! v.push_back(1);
//! v.push_back(2);
//! v.insert(1, 5);
//! assert_eq!(v, [1, 5, 2]);
//!
//! v.erase(1);
//! assert_eq!(v, [1, 2]);
//!
//! let mut bigger = Vector::with_capacity(8);
//! bigger.extend([1, 2, 3, 4, 5]);
//! bigger.clone_from(&Vector::from([9, 9]));
//! assert_eq!(bigger, [9, 9]);
//! assert_eq!(bigger.capacity(), 8);
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`raw`] | `advec-raw`: `RawStorage`, `AllocError`, `GrowthPolicy` |
//! | [`vector`] | `Vector` and its trait impls |
//! | [`iter`] | `IntoIter`, the owning iterator |
//!
//! # Features
//!
//! - `checked`: keep contract assertions (unchecked access, `pop_back` on an
//!   empty vector, raw slot offsets) in release builds.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod iter;
mod transfer;
pub mod vector;

/// Raw element storage, allocation errors and the growth policy (`advec-raw`).
pub use advec_raw as raw;

pub use advec_raw::{AllocError, GrowthPolicy};
pub use iter::IntoIter;
pub use vector::Vector;
