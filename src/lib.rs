//! # `tether` — shared scalar containers with atomic access
//!
//! A scalar container (a [`ScalarCell`]) is an indirection cell: names bind
//! to the cell, the cell points at a value. Because aliases share the cell
//! rather than the value, an assignment through one alias is visible through
//! every other, while *rebinding* an alias to a different cell leaves the
//! rest untouched. On top of that identity the cell offers hardware-backed
//! atomic operations — assign, fetch, and identity compare-and-swap —
//! suitable for building lock-free data structures.
//!
//! ## Guarantees
//!
//! - **Stable identity**: assignment swaps a cell's contents, never its
//!   identity; compare-and-swap tests the identity of the *held value
//!   allocation*, not structural equality.
//! - **Ordering**: atomic reads are acquire loads, atomic writes are release
//!   stores, compare-and-swap is a full-fence read-modify-write and is
//!   linearizable per cell. Plain `read`/`write` promise nothing across
//!   threads and must not be used for synchronization.
//! - **One synchronization boundary**: any number of threads may operate on
//!   a shared cell with no external locking; no operation blocks. Multi-cell
//!   atomicity is explicitly unsupported.
//! - **Declared constraints**: a cell optionally carries a type tag fixed at
//!   creation; every store that violates it fails with
//!   [`ConstraintViolation`], never a silent coercion.
//!
//! ## Architecture
//!
//! 1. **Values** ([`value`]): the dynamic [`Value`] model, the shared
//!    [`ValueRef`] handle, and the opaque [`ValueIdentity`] token that makes
//!    reference identity explicit.
//! 2. **Cells** ([`cell`]): the container primitive over a lock-free
//!    `arc-swap` slot.
//! 3. **Operations** ([`ops`]): the atomic facade (`atomic_fetch`,
//!    `atomic_assign`, `cas`) and the retry engine ([`cas_update`]) built on
//!    the facade's CAS.
//! 4. **Bindings** ([`binding`]): the name → cell table, rebinding, unboxed
//!    bindings, and explicit create-or-fetch vivification.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tether::ops::{atomic_fetch, cas};
//! use tether::{ScalarCell, Value, ValueRef};
//!
//! let counter = Arc::new(ScalarCell::from_value(ValueRef::new(Value::Int(0))));
//!
//! let seen = atomic_fetch(&counter);
//! let next = ValueRef::new(Value::Int(seen.as_int().unwrap() + 1));
//! let prev = cas(&counter, &seen, next).unwrap();
//!
//! assert!(prev.ptr_eq(&seen)); // the swap won
//! assert_eq!(*counter.atomic_read(), Value::Int(1));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod binding;
pub mod cell;
pub mod ops;
pub mod value;

pub use binding::{Binding, BindingError, BindingTable};
pub use cell::ScalarCell;
pub use ops::{atomic_assign, atomic_fetch, cas, cas_update};
pub use value::{ConstraintViolation, TypeTag, Value, ValueIdentity, ValueRef};

// Compile-time layout checks for the foundational "thin handle" claims.
const _: () = {
    use core::mem;

    // A value handle is a thin `Arc`: exactly one pointer, niche included.
    assert!(mem::size_of::<ValueRef>() == mem::size_of::<usize>());
    assert!(mem::size_of::<Option<ValueRef>>() == mem::size_of::<usize>());

    // Identity tokens are pointer-sized and `Copy`.
    assert!(mem::size_of::<ValueIdentity>() == mem::size_of::<usize>());

    // The cell is one slot word plus a tag and a flag. The bound is
    // intentionally loose to avoid platform brittleness while still
    // catching accidental growth.
    assert!(mem::size_of::<ScalarCell>() <= mem::size_of::<usize>() * 3);
};
