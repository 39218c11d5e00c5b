//! The binding table: the name → container relation the cell layer assumes.
//!
//! A name is bound to exactly one [`ScalarCell`] at a time, or,
//! exceptionally, directly to a value with no cell at all (an *unboxed*
//! binding, which is immutable: assignment through it is an error, and
//! atomic operations are not defined for it). Rebinding a name replaces
//! which cell the name refers to without mutating any cell, so every other
//! name bound to the old cell keeps observing it.
//!
//! Container creation is an explicit, single-call step:
//! [`BindingTable::ensure_cell`] is the create-or-fetch operation a host
//! runtime's vivification lowers to. The `&mut self` receiver is what
//! serializes it; the cells themselves never create contents implicitly,
//! which is exactly what eliminates the lazy-allocation race.
//!
//! The table itself is a plain single-owner map, not a concurrent one:
//! sharing happens at the cell level (clone the `Arc<ScalarCell>` out and
//! hand it to other threads), not at the name level.
//!
//! ```
//! use std::sync::Arc;
//! use tether::{BindingTable, ScalarCell, TypeTag, Value, ValueRef};
//!
//! let mut names = BindingTable::new();
//! let shared = names.ensure_cell("x", TypeTag::Int).unwrap();
//! names.bind("y", Arc::clone(&shared));
//!
//! names.assign("x", ValueRef::new(Value::Int(7))).unwrap();
//! assert_eq!(*names.fetch("y").unwrap(), Value::Int(7));
//!
//! // Rebinding x to a fresh cell leaves y observing the old one.
//! names.bind("x", Arc::new(ScalarCell::from_value(ValueRef::new(Value::Int(0)))));
//! assert_eq!(*names.fetch("y").unwrap(), Value::Int(7));
//! ```

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cell::ScalarCell;
use crate::value::{ConstraintViolation, TypeTag, ValueRef};

/// What a name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    /// The normal case: the name aliases a shared cell.
    Container(Arc<ScalarCell>),
    /// An unboxed binding: the name is the value, immutably.
    Direct(ValueRef),
}

/// An operation through a binding failed.
#[derive(Clone, Debug, PartialEq)]
pub enum BindingError {
    /// The name is not bound at all.
    Unbound(Box<str>),
    /// The name is bound directly to a value; there is no cell to assign
    /// through or operate on atomically.
    Unboxed(Box<str>),
    /// The bound cell rejected the assigned value.
    Constraint(ConstraintViolation),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::Unbound(name) => write!(f, "name '{name}' is not bound"),
            BindingError::Unboxed(name) => {
                write!(f, "name '{name}' is bound directly to a value and cannot be assigned")
            }
            BindingError::Constraint(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindingError::Constraint(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConstraintViolation> for BindingError {
    fn from(err: ConstraintViolation) -> Self {
        BindingError::Constraint(err)
    }
}

/// Maps names to bindings.
#[derive(Default, Debug)]
pub struct BindingTable {
    slots: FxHashMap<Box<str>, Binding>,
}

impl BindingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `cell`, replacing any previous binding.
    ///
    /// Replacing is rebinding: the previous cell (if any) is not mutated,
    /// and names still bound to it are unaffected.
    pub fn bind(&mut self, name: &str, cell: Arc<ScalarCell>) {
        self.slots.insert(name.into(), Binding::Container(cell));
    }

    /// Binds `name` directly to `value` with no cell, replacing any
    /// previous binding. The binding is immutable.
    pub fn bind_value(&mut self, name: &str, value: ValueRef) {
        self.slots.insert(name.into(), Binding::Direct(value));
    }

    /// Removes and returns the binding for `name`, if any.
    ///
    /// The cell (if this was a container binding) lives on for as long as
    /// any other alias holds it.
    pub fn unbind(&mut self, name: &str) -> Option<Binding> {
        self.slots.remove(name)
    }

    /// The binding for `name`, if any.
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.slots.get(name)
    }

    /// The bound cell for `name`, if `name` is a container binding.
    pub fn cell(&self, name: &str) -> Option<&Arc<ScalarCell>> {
        match self.slots.get(name) {
            Some(Binding::Container(cell)) => Some(cell),
            _ => None,
        }
    }

    /// Create-or-fetch: returns the cell bound to `name`, binding a fresh
    /// uninitialized cell with `constraint` if the name is unbound.
    ///
    /// The returned cell reports `is_initialized() == false` until first
    /// written; callers must store a value before any atomic use. An
    /// existing binding's constraint is left as it was declared —
    /// `constraint` only applies to a cell created by this call.
    ///
    /// # Errors
    /// [`BindingError::Unboxed`] if `name` is bound directly to a value.
    pub fn ensure_cell(
        &mut self,
        name: &str,
        constraint: TypeTag,
    ) -> Result<Arc<ScalarCell>, BindingError> {
        match self.slots.entry(name.into()) {
            Entry::Occupied(entry) => match entry.get() {
                Binding::Container(cell) => Ok(Arc::clone(cell)),
                Binding::Direct(_) => Err(BindingError::Unboxed(name.into())),
            },
            Entry::Vacant(entry) => {
                let cell = Arc::new(ScalarCell::new(constraint));
                entry.insert(Binding::Container(Arc::clone(&cell)));
                Ok(cell)
            }
        }
    }

    /// Reads the value `name` currently denotes: the cell's contents for a
    /// container binding, the value itself for an unboxed one.
    ///
    /// # Errors
    /// [`BindingError::Unbound`] for an unknown name.
    pub fn fetch(&self, name: &str) -> Result<ValueRef, BindingError> {
        match self.slots.get(name) {
            Some(Binding::Container(cell)) => Ok(cell.read()),
            Some(Binding::Direct(value)) => Ok(value.clone()),
            None => Err(BindingError::Unbound(name.into())),
        }
    }

    /// Assigns `value` through the binding for `name`: a plain store into
    /// the bound cell, mutating contents every alias observes.
    ///
    /// # Errors
    /// - [`BindingError::Unbound`] for an unknown name.
    /// - [`BindingError::Unboxed`] for a direct binding: there is no cell
    ///   to store into, and the binding is immutable by construction.
    /// - [`BindingError::Constraint`] if the cell rejects the value.
    pub fn assign(&self, name: &str, value: ValueRef) -> Result<(), BindingError> {
        match self.slots.get(name) {
            Some(Binding::Container(cell)) => Ok(cell.write(value)?),
            Some(Binding::Direct(_)) => Err(BindingError::Unboxed(name.into())),
            None => Err(BindingError::Unbound(name.into())),
        }
    }

    /// Whether `name` has any binding.
    pub fn is_bound(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The number of bound names.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
