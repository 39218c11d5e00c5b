//! The atomic operation facade and the lock-free retry engine.
//!
//! The facade functions are the canonical entry points the expression layer
//! of a host runtime would lower its atomic forms to. Each delegates 1:1 to
//! the corresponding [`ScalarCell`](crate::ScalarCell) method; the only
//! behavior the facade adds is a debug assertion of the "initialize before
//! atomic use" discipline.
//!
//! [`cas_update`] is built on top of [`cas`]: the functional-update form of
//! compare-and-swap, retrying on contention.

mod facade;
mod update;

pub use facade::{atomic_assign, atomic_fetch, cas};
pub use update::cas_update;
