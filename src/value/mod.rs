//! The dynamic value model: [`Value`], the shared handle [`ValueRef`], and
//! the reference-identity token [`ValueIdentity`].
//!
//! Everything a [`ScalarCell`](crate::ScalarCell) stores or returns is a
//! `ValueRef`: a cheap, clonable handle to one immutable `Value` allocation.
//! Two handles are *identity-equal* when they point at the same allocation
//! ([`ValueRef::ptr_eq`]); structural equality (`PartialEq`) is a separate,
//! weaker relation and is never what compare-and-swap tests against.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::cell::ScalarCell;

mod ser;
mod tag;

pub use tag::{ConstraintViolation, TypeTag};

/// A dynamically typed value held by a cell.
///
/// Values are immutable once constructed; "mutating" a cell means swapping
/// which `Value` allocation it holds. `PartialEq` is structural, except for
/// the [`Value::Cell`] variant which compares cell identity (comparing live
/// contents would race with concurrent writers).
#[derive(Clone, Debug)]
pub enum Value {
    /// The vacant placeholder a never-written cell holds.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Num(f64),
    /// An immutable string.
    Str(Arc<str>),
    /// A list of value handles.
    List(Vec<ValueRef>),
    /// A nested cell. Permitted but discouraged; a cell reachable from its
    /// own contents will recurse without bound in `Display` and `Serialize`.
    Cell(Arc<ScalarCell>),
}

impl Value {
    /// Builds a `Str` value from anything string-shaped.
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Builds a `List` value from an iterator of handles.
    pub fn list(items: impl IntoIterator<Item = ValueRef>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// The runtime type tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Num(_) => TypeTag::Num,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Cell(_) => TypeTag::Cell,
        }
    }

    /// Returns `true` for the vacant placeholder.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload, if this is a `Num`.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The element handles, if this is a `List`.
    pub fn as_list(&self) -> Option<&[ValueRef]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The nested cell, if this is a `Cell`.
    pub fn as_cell(&self) -> Option<&Arc<ScalarCell>> {
        match self {
            Value::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| **x == **y)
            }
            // Cells compare by identity: structural comparison of live
            // contents would race with concurrent writers.
            (Value::Cell(a), Value::Cell(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", **item)?;
                }
                f.write_str(")")
            }
            // The container stays invisible: print the current snapshot.
            Value::Cell(cell) => write!(f, "{}", cell.read()),
        }
    }
}

/// A shared handle to one immutable [`Value`] allocation.
///
/// Cloning a `ValueRef` is a reference-count bump; the clone is
/// identity-equal to the original. Constructing a new `ValueRef`, even from
/// a structurally equal `Value`, yields a distinct identity.
#[derive(Clone)]
pub struct ValueRef(Arc<Value>);

impl ValueRef {
    /// Allocates a fresh handle for `value`, with a fresh identity.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// The opaque identity token of the held allocation.
    ///
    /// Tokens are only meaningful while something keeps the allocation
    /// alive; once the last handle drops, the token may be reused by an
    /// unrelated later allocation.
    #[inline]
    pub fn identity(&self) -> ValueIdentity {
        ValueIdentity(Arc::as_ptr(&self.0) as usize)
    }

    /// Whether `self` and `other` are handles to the same allocation.
    ///
    /// This is the relation compare-and-swap tests; structurally equal
    /// values in distinct allocations are *not* `ptr_eq`.
    #[inline]
    pub fn ptr_eq(&self, other: &ValueRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn from_arc(arc: Arc<Value>) -> Self {
        Self(arc)
    }

    pub(crate) fn as_arc(&self) -> &Arc<Value> {
        &self.0
    }

    pub(crate) fn into_arc(self) -> Arc<Value> {
        self.0
    }
}

impl Deref for ValueRef {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ValueRef {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl PartialEq for ValueRef {
    /// Structural equality of the held values. Use [`ValueRef::ptr_eq`] for
    /// identity.
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// An opaque, pointer-derived identity token.
///
/// Two tokens compare equal exactly when they were taken from handles to the
/// same live allocation. Hashable, so lock-free structures can key on
/// observed identities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ValueIdentity(usize);
