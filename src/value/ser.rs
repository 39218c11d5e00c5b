//! `Serialize` impls for value snapshots.
//!
//! Serialization sees *values*, never containers: a [`Value::Cell`] variant
//! serializes as a plain-read snapshot of its current contents, so nested
//! cells stay invisible on the wire. There is intentionally no `Deserialize`
//! back into cells; deserialization belongs to whatever binding layer decides
//! which slots become containers.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::value::{Value, ValueRef};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Num(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&**item)?;
                }
                seq.end()
            }
            Value::Cell(cell) => cell.read().serialize(serializer),
        }
    }
}

impl Serialize for ValueRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}
