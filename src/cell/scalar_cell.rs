//! `ScalarCell` — the atomic indirection container.
//!
//! A cell mediates access to one [`ValueRef`]: names alias the cell, the
//! cell points at the value. Assignment swaps which allocation the cell
//! points at; the cell's own identity (the `Arc<ScalarCell>` allocation)
//! never changes. That split is what makes aliasing work: N names can share
//! one cell, every alias observes mutations through it, and rebinding one
//! alias to a different cell leaves the rest untouched.
//!
//! Storage is a lock-free [`ArcSwap`] slot. Compare-and-swap tests the
//! *identity* of the held allocation against the caller's expected handle,
//! never structural equality, so the expected parameter is unambiguous even
//! for values that compare equal structurally.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::value::{ConstraintViolation, TypeTag, Value, ValueRef};

/// The atomic scalar container.
///
/// # Ordering contract
///
/// - [`atomic_read`](Self::atomic_read) is an acquire load: it observes every
///   store to this cell that happened-before it in real time, along with all
///   memory operations that causally preceded the store on the writing
///   thread.
/// - [`atomic_write`](Self::atomic_write) is a release store.
/// - [`compare_and_swap`](Self::compare_and_swap) is a single indivisible
///   read-modify-write with a full fence; concurrent attempts on one cell
///   are linearizable.
/// - [`read`](Self::read) and [`write`](Self::write) carry **no cross-thread
///   ordering contract**. In this implementation they go through the same
///   lock-free slot as the atomic accessors and therefore happen to be
///   stronger than their contract, but callers must not rely on that: a spin
///   loop built on plain `read` is permitted to never observe a plain
///   `write` from another thread.
///
/// # Initialization discipline
///
/// A cell constructed by [`new`](Self::new) holds the [`Value::Nil`]
/// placeholder and reports [`is_initialized`](Self::is_initialized) `false`
/// until the first store. Atomic use of a never-written cell is a caller
/// bug by convention. The [`ops`](crate::ops) facade debug-asserts the
/// discipline; release builds do not detect it (the placeholder is
/// simply observed). Initialization is an explicit step the binding layer
/// must serialize; the cell never vivifies contents on its own.
///
/// No transaction spans multiple cells; multi-cell atomicity is out of
/// scope.
pub struct ScalarCell {
    slot: ArcSwap<Value>,
    constraint: TypeTag,
    initialized: AtomicBool,
}

impl ScalarCell {
    /// Creates an uninitialized cell holding the `Nil` placeholder.
    ///
    /// The placeholder is creation state, not a store: it bypasses the
    /// constraint check, and the cell stays "uninitialized" until a value
    /// is written through any store path.
    pub fn new(constraint: TypeTag) -> Self {
        Self {
            slot: ArcSwap::from_pointee(Value::Nil),
            constraint,
            initialized: AtomicBool::new(false),
        }
    }

    /// Creates an unconstrained cell already holding `initial`.
    pub fn from_value(initial: ValueRef) -> Self {
        Self {
            slot: ArcSwap::new(initial.into_arc()),
            constraint: TypeTag::Any,
            initialized: AtomicBool::new(true),
        }
    }

    /// Creates a constrained cell already holding `initial`.
    ///
    /// # Errors
    /// [`ConstraintViolation`] if `initial` does not satisfy `constraint`.
    pub fn with_value(initial: ValueRef, constraint: TypeTag) -> Result<Self, ConstraintViolation> {
        constraint.check(&initial)?;
        Ok(Self {
            slot: ArcSwap::new(initial.into_arc()),
            constraint,
            initialized: AtomicBool::new(true),
        })
    }

    /// The declared constraint ([`TypeTag::Any`] means "no constraint").
    #[inline]
    pub fn constraint(&self) -> TypeTag {
        self.constraint
    }

    /// Whether a value has ever been stored in this cell.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Plain load of the current value handle.
    ///
    /// No cross-thread ordering contract; see the type-level docs. Prefer
    /// [`atomic_read`](Self::atomic_read) anywhere another thread's store
    /// must become visible.
    #[inline]
    pub fn read(&self) -> ValueRef {
        ValueRef::from_arc(Arc::clone(&self.slot.load()))
    }

    /// Plain store of a new value handle.
    ///
    /// No cross-thread ordering contract; see the type-level docs.
    ///
    /// # Errors
    /// [`ConstraintViolation`] if `value` does not satisfy the declared
    /// constraint. The cell is unchanged on error.
    pub fn write(&self, value: ValueRef) -> Result<(), ConstraintViolation> {
        self.constraint.check(&value)?;
        self.slot.store(value.into_arc());
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Acquire load of the current value handle.
    ///
    /// Guaranteed to observe any store that happened-before it in real
    /// time, and cannot be hoisted out of a spin loop.
    #[inline]
    pub fn atomic_read(&self) -> ValueRef {
        ValueRef::from_arc(self.slot.load_full())
    }

    /// Release store of a new value handle.
    ///
    /// Everything the writing thread did before this store is visible to
    /// any thread whose subsequent [`atomic_read`](Self::atomic_read)
    /// observes it.
    ///
    /// # Errors
    /// [`ConstraintViolation`] under the same rule as [`write`](Self::write).
    pub fn atomic_write(&self, value: ValueRef) -> Result<(), ConstraintViolation> {
        self.constraint.check(&value)?;
        self.slot.store(value.into_arc());
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Atomically replaces the held handle with `new` if the current handle
    /// is identity-equal to `expected`.
    ///
    /// Always returns the handle observed at the moment of the attempt; the
    /// swap happened exactly when the returned handle
    /// [`ptr_eq`](ValueRef::ptr_eq)s `expected`. Comparison is by reference
    /// identity, never value equality: a structurally equal value in a
    /// different allocation does not match. Holding `expected` pins its
    /// allocation, so the identity being tested cannot be recycled out from
    /// under the call.
    ///
    /// # Errors
    /// [`ConstraintViolation`] if `new` does not satisfy the declared
    /// constraint; no swap is attempted.
    pub fn compare_and_swap(
        &self,
        expected: &ValueRef,
        new: ValueRef,
    ) -> Result<ValueRef, ConstraintViolation> {
        self.constraint.check(&new)?;
        let previous = self.slot.compare_and_swap(expected.as_arc(), new.into_arc());
        let previous = ValueRef::from_arc(Arc::clone(&previous));
        if previous.ptr_eq(expected) {
            self.initialized.store(true, Ordering::Release);
        }
        Ok(previous)
    }
}

impl fmt::Debug for ScalarCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCell")
            .field("constraint", &self.constraint)
            .field("value", &self.read())
            .finish()
    }
}
