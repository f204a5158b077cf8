//! Unwinding behaviour when element code panics mid-operation.
//!
//! Growth and every insertion path must leave the vector exactly as it was
//! (same length, capacity, base address and contents) when building the new
//! element panics. Everything else must at least stay valid and leak-free.

use std::rc::Rc;

use advec::Vector;
use advec_test_utils::{
    catch_panic, panic_message, tracked, Counters, Tracked, CLONE_FUSE_MESSAGE,
};

/// Observable state of a vector: length, capacity, base address, payloads.
fn snapshot(v: &Vector<Tracked>) -> (usize, usize, *const Tracked, Vec<i32>) {
    (
        v.len(),
        v.capacity(),
        v.as_ptr(),
        v.iter().map(Tracked::value).collect(),
    )
}

fn filled(
    values: impl IntoIterator<Item = i32>,
    capacity: usize,
    counters: &Rc<Counters>,
) -> Vector<Tracked> {
    let mut v = Vector::with_capacity(capacity);
    for t in tracked(values, counters) {
        v.push_back(t);
    }
    v
}

// ── Strong guarantee ────────────────────────────────────────────

#[test]
fn growing_insert_with_panicking_clone_leaves_vector_untouched() {
    let counters = Counters::new();
    let mut v = filled(0..4, 4, &counters);
    let template = Tracked::new(99, &counters);
    let before = snapshot(&v);
    let live_before = counters.live();

    counters.arm_clone_fuse(0);
    let err = catch_panic(|| {
        v.emplace(2, || template.clone());
    })
    .unwrap_err();

    assert_eq!(panic_message(&*err), Some(CLONE_FUSE_MESSAGE));
    assert_eq!(snapshot(&v), before);
    assert_eq!(counters.live(), live_before);

    counters.disarm();
    v.emplace(2, || template.clone());
    assert_eq!(v.capacity(), 8);
    assert_eq!(v.iter().map(Tracked::value).collect::<Vec<_>>(), vec![0, 1, 99, 2, 3]);
}

#[test]
fn growing_push_with_panicking_constructor_leaves_vector_untouched() {
    let counters = Counters::new();
    let mut v = filled(0..2, 2, &counters);
    let before = snapshot(&v);

    let result = catch_panic(|| {
        v.emplace_back(|| panic!("constructor failed"));
    });

    assert!(result.is_err());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn interior_insert_with_spare_capacity_and_panicking_constructor() {
    let counters = Counters::new();
    let mut v = filled(0..3, 8, &counters);
    let before = snapshot(&v);
    let live_before = counters.live();

    let result = catch_panic(|| {
        v.emplace(1, || panic!("constructor failed"));
    });

    assert!(result.is_err());
    assert_eq!(snapshot(&v), before);
    assert_eq!(counters.live(), live_before);
}

#[test]
fn end_insert_with_spare_capacity_and_panicking_constructor() {
    let counters = Counters::new();
    let mut v = filled(0..3, 8, &counters);
    let before = snapshot(&v);

    let result = catch_panic(|| {
        v.emplace(3, || panic!("constructor failed"));
    });

    assert!(result.is_err());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn clone_with_panicking_element_leaks_nothing() {
    let counters = Counters::new();
    let original = filled(0..6, 6, &counters);
    let before = snapshot(&original);

    counters.arm_clone_fuse(3);
    let result = catch_panic(|| original.clone());

    assert!(result.is_err());
    assert_eq!(snapshot(&original), before);
    assert_eq!(counters.clones(), 3);
    assert_eq!(counters.live(), 6);
}

#[test]
fn reallocating_clone_from_with_panicking_element_leaves_target_untouched() {
    let counters = Counters::new();
    let mut target = filled([1, 2], 2, &counters);
    let source = filled(10..15, 5, &counters);
    let before = snapshot(&target);

    counters.arm_clone_fuse(2);
    let result = catch_panic(|| target.clone_from(&source));

    assert!(result.is_err());
    assert_eq!(snapshot(&target), before);
    assert_eq!(counters.live(), 7);
}

// ── Basic guarantee ─────────────────────────────────────────────

#[test]
fn in_place_clone_from_with_panicking_element_stays_valid() {
    let counters = Counters::new();
    let mut target = filled([1, 2], 8, &counters);
    let source = filled(10..15, 5, &counters);

    // Both assignments succeed, the second tail clone fails.
    counters.arm_clone_fuse(3);
    let result = catch_panic(|| target.clone_from(&source));

    assert!(result.is_err());
    assert_eq!(target.len(), 2);
    assert_eq!(target.capacity(), 8);
    assert_eq!(counters.live(), target.len() + source.len());

    counters.disarm();
    target.clone_from(&source);
    assert_eq!(target, source);
}

#[test]
fn resize_with_panicking_fill_keeps_length() {
    let counters = Counters::new();
    let mut v = filled(0..2, 2, &counters);
    let mut made = 0;

    let result = catch_panic(|| {
        v.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("fill failed");
            }
            Tracked::new(-1, &counters)
        });
    });

    assert!(result.is_err());
    assert_eq!(v.len(), 2);
    assert_eq!(counters.live(), 2);
    assert_eq!(v.iter().map(Tracked::value).collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn extend_from_slice_with_panicking_clone_keeps_length() {
    let counters = Counters::new();
    let mut v = filled([0], 1, &counters);
    let items = tracked([1, 2, 3], &counters);

    counters.arm_clone_fuse(1);
    let result = catch_panic(|| v.extend_from_slice(&items));

    assert!(result.is_err());
    assert_eq!(v.len(), 1);
    assert_eq!(counters.live(), 4);
}

struct Bomb {
    armed: bool,
}

impl Drop for Bomb {
    fn drop(&mut self) {
        if self.armed {
            panic!("bomb went off");
        }
    }
}

#[test]
fn panicking_destructor_during_truncate_leaves_vector_empty() {
    let mut v = Vector::new();
    v.push_back(Bomb { armed: false });
    v.push_back(Bomb { armed: true });
    v.push_back(Bomb { armed: false });

    let result = catch_panic(|| v.truncate(0));

    assert!(result.is_err());
    assert!(v.is_empty());
    v.push_back(Bomb { armed: false });
    assert_eq!(v.len(), 1);
}

#[test]
fn panicking_destructor_during_erase_keeps_remaining_elements() {
    let mut v = Vector::new();
    v.push_back(Bomb { armed: false });
    v.push_back(Bomb { armed: true });
    v.push_back(Bomb { armed: false });

    let result = catch_panic(|| v.erase(1));

    assert!(result.is_err());
    assert_eq!(v.len(), 2);
    assert!(v.iter().all(|b| !b.armed));
}
