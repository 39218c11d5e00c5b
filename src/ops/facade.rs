//! Facade entry points over the cell's atomic methods.

use crate::cell::ScalarCell;
use crate::value::{ConstraintViolation, ValueRef};

/// Acquire-loads the cell's current value.
///
/// Equivalent to [`ScalarCell::atomic_read`]; exists so call sites that
/// traffic in cell references read as expressions rather than method chains.
#[inline]
pub fn atomic_fetch(cell: &ScalarCell) -> ValueRef {
    debug_assert!(
        cell.is_initialized(),
        "atomic access to a never-written cell"
    );
    cell.atomic_read()
}

/// Release-stores `value` into the cell and returns the stored handle,
/// assignment-expression style.
///
/// # Errors
/// [`ConstraintViolation`] if `value` does not satisfy the cell's declared
/// constraint.
#[inline]
pub fn atomic_assign(cell: &ScalarCell, value: ValueRef) -> Result<ValueRef, ConstraintViolation> {
    debug_assert!(
        cell.is_initialized(),
        "atomic access to a never-written cell"
    );
    cell.atomic_write(value.clone())?;
    Ok(value)
}

/// Atomically swaps in `new` if the cell currently holds `expected`
/// (compared by identity). Returns the handle observed at the attempt;
/// success iff it [`ptr_eq`](ValueRef::ptr_eq)s `expected`.
///
/// # Errors
/// [`ConstraintViolation`] if `new` does not satisfy the cell's declared
/// constraint; no swap is attempted.
#[inline]
pub fn cas(
    cell: &ScalarCell,
    expected: &ValueRef,
    new: ValueRef,
) -> Result<ValueRef, ConstraintViolation> {
    debug_assert!(
        cell.is_initialized(),
        "atomic access to a never-written cell"
    );
    cell.compare_and_swap(expected, new)
}
