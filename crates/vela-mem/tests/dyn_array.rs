mod common;

use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use vela_mem::{CapacityError, CapacityPolicy, DynArray};

use common::{Fragile, Ledger, Tracked, values};

fn tracked(ledger: &Ledger, values: &[i32]) -> DynArray<Tracked> {
    values.iter().map(|&v| ledger.make(v)).collect()
}

#[test]
fn reference_scenario() {
    let mut array = DynArray::<i32>::new();
    array.push_back(1).unwrap();
    array.push_back(2).unwrap();
    array.push_back(3).unwrap();
    assert_eq!(array.len(), 3);
    assert!(array.capacity() >= 3);
    assert_eq!(array, [1, 2, 3]);

    array.insert(1, 99).unwrap();
    assert_eq!(array, [1, 99, 2, 3]);

    array.erase(0);
    assert_eq!(array, [99, 2, 3]);

    array.resize(5).unwrap();
    assert_eq!(array, [99, 2, 3, 0, 0]);

    array.resize(2).unwrap();
    assert_eq!(array, [99, 2]);
    assert_eq!(array.capacity(), 5);
}

#[test]
fn every_constructed_element_is_dropped_once() {
    let ledger = Ledger::new();
    {
        let mut array = tracked(&ledger, &[1, 2, 3, 4]);
        array.insert(2, ledger.make(7)).unwrap();
        array.erase(0);
        array.pop_back();
        array.reserve(32).unwrap();
        array.resize_with(6, || ledger.make(0)).unwrap();
        array.truncate(3);
        assert_eq!(values(&array), [2, 7, 3]);
        assert_eq!(ledger.live(), 3);
    }
    assert_eq!(ledger.live(), 0);
}

#[test]
fn copies_own_independent_storage() {
    let mut a = DynArray::<String>::from(["one".to_string(), "two".to_string()]);
    let b = a.clone();
    assert_eq!(a, b);
    assert_ne!(a.as_ptr(), b.as_ptr());
    assert_eq!(b.capacity(), 2);
    a[0].push('!');
    a.push_back("three".into()).unwrap();
    assert_eq!(b, ["one", "two"]);
    assert_eq!(a, ["one!", "two", "three"]);
}

#[test]
fn take_moves_everything() {
    let mut a = DynArray::<u32>::from([4, 5, 6]);
    let ptr = a.as_ptr();
    let b = a.take();
    assert_eq!(b, [4, 5, 6]);
    assert_eq!(b.as_ptr(), ptr);
    assert_eq!(a.len(), 0);
    assert_eq!(a.capacity(), 0);
}

#[test]
fn move_from_releases_old_elements() {
    let ledger = Ledger::new();
    let mut a = tracked(&ledger, &[1, 2]);
    let mut b = tracked(&ledger, &[8, 9, 10]);
    a.move_from(&mut b);
    assert_eq!(values(&a), [8, 9, 10]);
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 0);
    assert_eq!(ledger.drops(), 2);
    assert_eq!(ledger.live(), 3);
}

#[test]
fn assign_from_larger_source_replaces_storage() {
    let mut a = DynArray::<i32>::from([1]);
    let b = DynArray::<i32>::from([5, 6, 7]);
    a.assign_from(&b).unwrap();
    assert_eq!(a, [5, 6, 7]);
    assert_eq!(a.capacity(), 3);
}

#[test]
fn assign_from_shorter_source_reuses_storage() {
    let ledger = Ledger::new();
    let mut a = tracked(&ledger, &[1, 2, 3, 4]);
    let b = tracked(&ledger, &[9]);
    let ptr = a.as_ptr();
    a.assign_from(&b).unwrap();
    assert_eq!(values(&a), [9]);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(a.capacity(), 4);
    assert_eq!(ledger.live(), 2);
}

#[test]
fn assign_from_longer_source_within_capacity() {
    let mut a = DynArray::<String>::with_capacity(4).unwrap();
    a.push_back("old".into()).unwrap();
    let ptr = a.as_ptr();
    let b = DynArray::<String>::from(["x".into(), "y".into(), "z".into()]);
    a.clone_from(&b);
    assert_eq!(a, ["x", "y", "z"]);
    assert_eq!(a.as_ptr(), ptr);
}

#[test]
fn swap_touches_no_elements() {
    let ledger = Ledger::new();
    let mut a = tracked(&ledger, &[1, 2, 3]);
    let mut b = DynArray::<Tracked>::with_capacity(10).unwrap();
    b.push_back(ledger.make(42)).unwrap();
    let drops = ledger.drops();
    a.swap_with(&mut b);
    assert_eq!(ledger.drops(), drops);
    assert_eq!(values(&a), [42]);
    assert_eq!(a.capacity(), 10);
    assert_eq!(values(&b), [1, 2, 3]);
    assert_eq!(b.capacity(), 3);
}

#[test]
fn failed_reserve_leaves_array_untouched() {
    let mut array = DynArray::<u64>::from([1, 2, 3]);
    let ptr = array.as_ptr();
    let err = array.reserve(usize::MAX / 4).unwrap_err();
    assert_eq!(err, CapacityError::CapacityOverflow { requested: usize::MAX / 4 });
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(array.capacity(), 3);
    assert_eq!(array.as_ptr(), ptr);
}

struct Stalled {}

impl CapacityPolicy for Stalled {

    fn can_grow() -> bool {
        true
    }

    fn grow(current: usize) -> Result<usize, CapacityError> {
        Ok(current)
    }
}

#[test]
fn stalled_growth_policy_is_refused() {
    let mut array = DynArray::<u64, Stalled>::new();
    assert_eq!(array.push_back(7).err(), Some(CapacityError::FixedCapacity { capacity: 0 }));
    assert_eq!(array.insert(0, 7), Err(CapacityError::FixedCapacity { capacity: 0 }));
    assert!(array.is_empty());

    array.reserve(2).unwrap();
    array.push_back(1).unwrap();
    array.push_back(2).unwrap();
    let ptr = array.as_ptr();
    assert_eq!(array.push_back(3).err(), Some(CapacityError::FixedCapacity { capacity: 2 }));
    assert_eq!(array.insert(0, 3), Err(CapacityError::FixedCapacity { capacity: 2 }));
    assert_eq!(array, [1, 2]);
    assert_eq!(array.as_ptr(), ptr);
}

#[test]
fn panicking_sized_construction_cleans_up() {
    let ledger = Ledger::new();
    let mut made = 0;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        DynArray::<Tracked>::with_len_with(5, || {
            if made == 3 {
                panic!("fourth element failed");
            }
            made += 1;
            ledger.make(made)
        })
    }));
    assert!(result.is_err());
    assert_eq!(ledger.live(), 0);
    assert_eq!(ledger.drops(), 3);
}

#[test]
fn panicking_append_on_full_array_changes_nothing() {
    let ledger = Ledger::new();
    let mut array = tracked(&ledger, &[1, 2, 3, 4]);
    array.reserve(4).unwrap();
    assert_eq!(array.len(), array.capacity());
    let ptr = array.as_ptr();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        array.emplace_back_with(|| panic!("constructor failed")).map(|_| ())
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [1, 2, 3, 4]);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn panicking_reallocating_insert_changes_nothing() {
    let ledger = Ledger::new();
    let mut array = tracked(&ledger, &[1, 2, 3, 4]);
    array.reserve(4).unwrap();
    let ptr = array.as_ptr();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        array.emplace(1, || panic!("constructor failed"))
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [1, 2, 3, 4]);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn panicking_in_place_insert_changes_nothing() {
    let ledger = Ledger::new();
    let mut array = DynArray::<Tracked>::with_capacity(8).unwrap();
    array.extend([1, 2, 3].map(|v| ledger.make(v)));
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        array.emplace(0, || panic!("constructor failed"))
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [1, 2, 3]);
    assert_eq!(array.capacity(), 8);
    assert_eq!(ledger.live(), 3);
}

#[test]
fn panicking_resize_keeps_old_length() {
    let ledger = Ledger::new();
    let mut array = tracked(&ledger, &[1, 2]);
    let mut made = 0;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        array.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("fill failed");
            }
            ledger.make(0)
        })
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [1, 2]);
    assert_eq!(ledger.live(), 2);
}

#[test]
fn panicking_clone_leaves_source_intact() {
    let budget = Rc::new(Cell::new(2));
    let source: DynArray<Fragile> = (0..4).map(|v| Fragile::new(v, &budget)).collect();
    let result = panic::catch_unwind(AssertUnwindSafe(|| source.try_clone()));
    assert!(result.is_err());
    assert_eq!(source.len(), 4);
    assert_eq!(source.iter().map(|f| f.value).collect::<Vec<_>>(), [0, 1, 2, 3]);
}

#[test]
fn panicking_copy_assignment_into_larger_target_keeps_target() {
    let budget = Rc::new(Cell::new(1));
    let source: DynArray<Fragile> = (0..3).map(|v| Fragile::new(v, &budget)).collect();
    let mut target: DynArray<Fragile> = DynArray::new();
    target.push_back(Fragile::new(10, &budget)).unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(|| target.assign_from(&source)));
    assert!(result.is_err());
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].value, 10);
}

#[test]
fn iteration_covers_live_range() {
    let mut array = DynArray::<i32>::from([1, 2, 3, 4]);
    for value in &mut array {
        *value *= 10;
    }
    let forward: Vec<_> = array.iter().copied().collect();
    let backward: Vec<_> = array.iter().rev().copied().collect();
    assert_eq!(forward, [10, 20, 30, 40]);
    assert_eq!(backward, [40, 30, 20, 10]);
    assert_eq!(array.iter().len(), 4);
    assert_eq!(array.back(), Some(&40));
}
