use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tether::ops::{atomic_assign, atomic_fetch, cas};
use tether::{ScalarCell, TypeTag, Value, ValueRef};

#[test]
fn cas_success_swaps_and_returns_previous() {
    let r1 = ValueRef::new(Value::Int(1));
    let r2 = ValueRef::new(Value::Int(2));
    let cell = ScalarCell::from_value(r1.clone());

    let prev = cas(&cell, &r1, r2.clone()).unwrap();
    assert!(prev.ptr_eq(&r1));
    assert!(cell.atomic_read().ptr_eq(&r2));
}

#[test]
fn cas_failure_leaves_cell_unchanged() {
    let r1 = ValueRef::new(Value::Int(1));
    let r2 = ValueRef::new(Value::Int(2));
    // Structurally equal to r1, but a distinct allocation: never matches.
    let r3 = ValueRef::new(Value::Int(1));
    let cell = ScalarCell::from_value(r1.clone());

    let prev = cas(&cell, &r3, r2).unwrap();
    assert!(prev.ptr_eq(&r1));
    assert!(!prev.ptr_eq(&r3));
    assert!(cell.atomic_read().ptr_eq(&r1));
}

#[test]
fn cas_compares_identity_not_structure() {
    let first = ValueRef::new(Value::str("same"));
    let lookalike = ValueRef::new(Value::str("same"));
    assert_eq!(first, lookalike);
    assert!(!first.ptr_eq(&lookalike));
    assert_ne!(first.identity(), lookalike.identity());

    let cell = ScalarCell::from_value(first.clone());
    let prev = cas(&cell, &lookalike, ValueRef::new(Value::str("new"))).unwrap();
    assert!(prev.ptr_eq(&first), "structural equality must not satisfy CAS");
}

#[test]
fn cas_checks_the_constraint_before_swapping() {
    let r1 = ValueRef::new(Value::Int(1));
    let cell = ScalarCell::with_value(r1.clone(), TypeTag::Int).unwrap();

    let err = cas(&cell, &r1, ValueRef::new(Value::Bool(true))).unwrap_err();
    assert_eq!(err.constraint, TypeTag::Int);
    assert!(cell.atomic_read().ptr_eq(&r1));
}

#[test]
fn facade_and_methods_agree() {
    let initial = ValueRef::new(Value::Int(5));
    let cell = ScalarCell::from_value(initial.clone());

    assert!(atomic_fetch(&cell).ptr_eq(&initial));

    let stored = atomic_assign(&cell, ValueRef::new(Value::Int(6))).unwrap();
    assert!(cell.atomic_read().ptr_eq(&stored));
    assert_eq!(*stored, Value::Int(6));
}

#[test]
fn concurrent_cas_has_exactly_one_winner() {
    const THREADS: usize = 8;

    let initial = ValueRef::new(Value::Int(-1));
    let cell = Arc::new(ScalarCell::from_value(initial.clone()));
    let wins = AtomicUsize::new(0);
    let winner: Mutex<Option<ValueRef>> = Mutex::new(None);

    thread::scope(|s| {
        for i in 0..THREADS {
            let cell = &cell;
            let initial = &initial;
            let wins = &wins;
            let winner = &winner;
            s.spawn(move || {
                let mine = ValueRef::new(Value::Int(i as i64));
                let prev = cas(cell, initial, mine.clone()).unwrap();
                if prev.ptr_eq(initial) {
                    wins.fetch_add(1, Ordering::Relaxed);
                    *winner.lock().unwrap() = Some(mine);
                }
            });
        }
    });

    assert_eq!(wins.load(Ordering::Relaxed), 1);
    let winner = winner.lock().unwrap().clone().expect("one thread must win");
    assert!(cell.atomic_read().ptr_eq(&winner));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "never-written")]
fn atomic_use_before_initialization_asserts_in_debug() {
    let cell = ScalarCell::new(TypeTag::Any);
    let _ = atomic_fetch(&cell);
}
