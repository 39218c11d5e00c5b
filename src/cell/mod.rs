//! The scalar container primitive.
//!
//! A [`ScalarCell`] is the one synchronization boundary in this crate: any
//! number of threads may read and write a shared cell with no external
//! locking. See the type-level docs for the full ordering contract.

mod scalar_cell;

pub use scalar_cell::ScalarCell;
