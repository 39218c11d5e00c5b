//! Declared type constraints and their violation error.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// A declared type tag constraining what a cell may hold.
///
/// A cell's tag is fixed at creation and restricts every subsequent store.
/// [`TypeTag::Any`] means "no constraint". This is the entirety of type
/// checking in the runtime: a one-tag admission test, no coercion, no
/// subtyping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum TypeTag {
    /// Admits every value.
    Any,
    /// Admits only the vacant placeholder.
    Nil,
    /// Admits booleans.
    Bool,
    /// Admits integers.
    Int,
    /// Admits floating-point numbers.
    Num,
    /// Admits strings.
    Str,
    /// Admits lists.
    List,
    /// Admits nested cells.
    Cell,
}

impl TypeTag {
    /// Whether `value` satisfies this constraint.
    pub fn admits(self, value: &Value) -> bool {
        self == TypeTag::Any || value.tag() == self
    }

    /// Admission test in `Result` form, for `?` on store paths.
    pub fn check(self, value: &Value) -> Result<(), ConstraintViolation> {
        if self.admits(value) {
            Ok(())
        } else {
            Err(ConstraintViolation {
                constraint: self,
                found: value.tag(),
            })
        }
    }

    /// `true` unless this tag is [`TypeTag::Any`].
    pub fn is_constrained(self) -> bool {
        self != TypeTag::Any
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Any => "Any",
            TypeTag::Nil => "Nil",
            TypeTag::Bool => "Bool",
            TypeTag::Int => "Int",
            TypeTag::Num => "Num",
            TypeTag::Str => "Str",
            TypeTag::List => "List",
            TypeTag::Cell => "Cell",
        };
        f.write_str(name)
    }
}

/// A store was rejected because the value does not satisfy the cell's
/// declared constraint.
///
/// Always surfaced to the caller; values are never silently coerced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ConstraintViolation {
    /// The cell's declared constraint.
    pub constraint: TypeTag,
    /// The tag of the rejected value.
    pub found: TypeTag,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type constraint violation: cell constrained to {}, rejected a {} value",
            self.constraint, self.found
        )
    }
}

impl std::error::Error for ConstraintViolation {}
