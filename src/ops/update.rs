//! The lock-free retry engine: functional update under compare-and-swap.

use crossbeam_utils::Backoff;

use super::facade::cas;
use crate::cell::ScalarCell;
use crate::value::{ConstraintViolation, ValueRef};

/// Applies a pure transformation to the cell's value under a
/// fetch/compute/CAS/retry loop.
///
/// Each round acquire-loads the current handle, computes
/// `proposed = op(&observed)`, and attempts an identity compare-and-swap.
/// If another writer intervened, the loop adopts the handle the CAS
/// observed and retries. Returns the proposed handle that won — the value
/// the cell holds at the linearization point of the successful swap.
///
/// `op` runs **at least once** and may run arbitrarily many times under
/// contention, so it must be side-effect-free and idempotent. The loop has
/// no retry bound: starvation under extreme contention is an accepted
/// liveness caveat, not an error. A [`Backoff`] spin between failed
/// attempts eases cache-line pressure; it does not change semantics, and
/// the loop never yields or blocks.
///
/// # Errors
/// [`ConstraintViolation`] if a proposed value does not satisfy the cell's
/// declared constraint. The loop aborts with the cell unchanged — the
/// offending proposal was never swapped in. Contention is retried; errors
/// are not.
///
/// # Panics
/// Whatever `op` panics with propagates to the caller uncaught, again with
/// the cell unchanged.
pub fn cas_update<F>(cell: &ScalarCell, mut op: F) -> Result<ValueRef, ConstraintViolation>
where
    F: FnMut(&ValueRef) -> ValueRef,
{
    debug_assert!(
        cell.is_initialized(),
        "atomic access to a never-written cell"
    );
    let backoff = Backoff::new();
    let mut observed = cell.atomic_read();
    loop {
        let proposed = op(&observed);
        let previous = cas(cell, &observed, proposed.clone())?;
        if previous.ptr_eq(&observed) {
            return Ok(proposed);
        }
        observed = previous;
        backoff.spin();
    }
}
