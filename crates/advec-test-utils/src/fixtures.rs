//! Element fixtures that record their own lifecycle.
//!
//! - [`Counters`]: shared tallies of constructions, clones, clone-assigns
//!   and drops, plus a clone fuse that fails deterministically.
//! - [`Tracked`]: an `i32` payload that reports to a [`Counters`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Panic message raised by a blown clone fuse.
pub const CLONE_FUSE_MESSAGE: &str = "clone fuse blown";

/// Lifecycle tallies shared by every [`Tracked`] built from them.
///
/// Counters are per-test: each test creates its own with [`Counters::new`],
/// so parallel tests never share state.
#[derive(Debug, Default)]
pub struct Counters {
    created: Cell<usize>,
    clones: Cell<usize>,
    assigns: Cell<usize>,
    drops: Cell<usize>,
    /// Clones left before the next one panics; `None` when disarmed.
    fuse: Cell<Option<usize>>,
}

impl Counters {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Values constructed, fresh or cloned.
    pub fn created(&self) -> usize {
        self.created.get()
    }

    /// Successful `clone` calls.
    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    /// Successful `clone_from` calls.
    pub fn assigns(&self) -> usize {
        self.assigns.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    /// Values constructed and not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.drops()
    }

    /// Let `successes` more clones (or clone-assigns) through, then panic on
    /// the following one. The fuse stays blown until [`disarm`](Self::disarm).
    pub fn arm_clone_fuse(&self, successes: usize) {
        self.fuse.set(Some(successes));
    }

    pub fn disarm(&self) {
        self.fuse.set(None);
    }

    fn burn_fuse(&self) {
        match self.fuse.get() {
            Some(0) => panic!("{CLONE_FUSE_MESSAGE}"),
            Some(left) => self.fuse.set(Some(left - 1)),
            None => {}
        }
    }
}

/// An `i32` that counts its clones and drops in a shared [`Counters`].
///
/// Equality compares payloads only.
pub struct Tracked {
    value: i32,
    counters: Rc<Counters>,
}

impl Tracked {
    pub fn new(value: i32, counters: &Rc<Counters>) -> Self {
        counters.created.set(counters.created.get() + 1);
        Self {
            value,
            counters: Rc::clone(counters),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counters.burn_fuse();
        let counters = &self.counters;
        counters.clones.set(counters.clones.get() + 1);
        Self::new(self.value, counters)
    }

    /// Assigns the payload in place; no value is created or dropped.
    fn clone_from(&mut self, source: &Self) {
        self.counters.burn_fuse();
        self.counters.assigns.set(self.counters.assigns.get() + 1);
        self.value = source.value;
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counters.drops.set(self.counters.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// Build one [`Tracked`] per value, all reporting to `counters`.
pub fn tracked(values: impl IntoIterator<Item = i32>, counters: &Rc<Counters>) -> Vec<Tracked> {
    values
        .into_iter()
        .map(|value| Tracked::new(value, counters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catch_panic, panic_message};

    #[test]
    fn clone_and_drop_are_counted() {
        let counters = Counters::new();
        let a = Tracked::new(1, &counters);
        let b = a.clone();
        assert_eq!(b.value(), 1);
        assert_eq!((counters.created(), counters.clones()), (2, 1));
        drop(a);
        drop(b);
        assert_eq!(counters.drops(), 2);
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn clone_from_is_an_assignment() {
        let counters = Counters::new();
        let mut a = Tracked::new(1, &counters);
        let b = Tracked::new(2, &counters);
        a.clone_from(&b);
        assert_eq!(a.value(), 2);
        assert_eq!(counters.assigns(), 1);
        assert_eq!(counters.created(), 2);
        assert_eq!(counters.drops(), 0);
    }

    #[test]
    fn fuse_blows_after_successes() {
        let counters = Counters::new();
        let a = Tracked::new(7, &counters);
        counters.arm_clone_fuse(2);
        let _b = a.clone();
        let _c = a.clone();
        let err = catch_panic(|| a.clone()).unwrap_err();
        assert_eq!(panic_message(&*err), Some(CLONE_FUSE_MESSAGE));
        assert_eq!(counters.clones(), 2);
        assert_eq!(counters.live(), 3);

        counters.disarm();
        let _d = a.clone();
        assert_eq!(counters.clones(), 3);
    }
}
