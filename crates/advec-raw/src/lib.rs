//! Owned, uninitialised element storage for the advec vector.
//!
//! This is the leaf crate of the workspace. It owns raw memory and knows
//! nothing about element lifetimes:
//!
//! ```text
//! Vector<T>            (advec: live-object count, construction, destruction)
//! └── RawStorage<T>    (advec-raw: one block, `capacity` uninitialised slots)
//!     └── global allocator
//! ```
//!
//! # Contract checks
//!
//! [`contract_assert!`] guards caller contracts that are programmer errors
//! rather than recoverable failures. It is active in debug builds and, with
//! the `checked` feature, in release builds; otherwise it compiles away.
//!
//! This crate and `advec` are the only ones in the workspace that contain
//! `unsafe` code, confined to the modules that touch raw memory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod raw;

pub use config::GrowthPolicy;
pub use error::AllocError;
pub use raw::RawStorage;
