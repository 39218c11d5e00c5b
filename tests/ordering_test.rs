use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tether::ops::{atomic_assign, atomic_fetch};
use tether::{ScalarCell, TypeTag, Value, ValueRef};

// The plain-accessor counterpart of this test is deliberately absent: a spin
// loop on `read()` waiting for a `write()` from another thread is permitted
// to never terminate, so there is nothing to assert.

#[test]
fn atomic_flag_handshake_terminates() {
    let flag = Arc::new(
        ScalarCell::with_value(ValueRef::new(Value::Bool(false)), TypeTag::Bool).unwrap(),
    );

    thread::scope(|s| {
        let flag = &flag;
        s.spawn(move || {
            atomic_assign(flag, ValueRef::new(Value::Bool(true))).unwrap();
        });

        let deadline = Instant::now() + Duration::from_secs(10);
        while atomic_fetch(flag).as_bool() != Some(true) {
            assert!(
                Instant::now() < deadline,
                "acquire load failed to observe release store"
            );
            std::hint::spin_loop();
        }
    });
}

#[test]
fn release_store_publishes_preceding_writes() {
    // Acquire/release transitivity: once the reader observes the flag, the
    // data store that preceded the flag store on the writer must be visible
    // too, even though the data cell itself was written with a plain store.
    let data = Arc::new(ScalarCell::from_value(ValueRef::new(Value::Int(0))));
    let flag = Arc::new(
        ScalarCell::with_value(ValueRef::new(Value::Bool(false)), TypeTag::Bool).unwrap(),
    );

    thread::scope(|s| {
        let data = &data;
        let flag = &flag;

        s.spawn(move || {
            data.write(ValueRef::new(Value::Int(42))).unwrap();
            atomic_assign(flag, ValueRef::new(Value::Bool(true))).unwrap();
        });

        let deadline = Instant::now() + Duration::from_secs(10);
        while atomic_fetch(flag).as_bool() != Some(true) {
            assert!(Instant::now() < deadline, "flag never observed");
            std::hint::spin_loop();
        }
        assert_eq!(data.atomic_read().as_int(), Some(42));
    });
}

#[test]
fn every_spinning_reader_observes_the_store() {
    const READERS: usize = 4;

    let flag = Arc::new(
        ScalarCell::with_value(ValueRef::new(Value::Bool(false)), TypeTag::Bool).unwrap(),
    );

    thread::scope(|s| {
        for _ in 0..READERS {
            let flag = &flag;
            s.spawn(move || {
                let deadline = Instant::now() + Duration::from_secs(10);
                while atomic_fetch(flag).as_bool() != Some(true) {
                    assert!(Instant::now() < deadline, "reader starved");
                    std::hint::spin_loop();
                }
            });
        }

        let flag = &flag;
        s.spawn(move || {
            thread::sleep(Duration::from_millis(20));
            atomic_assign(flag, ValueRef::new(Value::Bool(true))).unwrap();
        });
    });
}
