//! Dynamic values passed through the conversion service.
//!
//! [`Value`] is the single runtime representation for everything a converter
//! reads or produces. Scalars report their boxed object type as their runtime
//! type, so `Value::Int64(7)` is a `Long` for resolution purposes. Application
//! objects travel as [`ObjectValue`], an `Arc`-shared payload tagged with the
//! `TypeHash` the application registered for it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{TypeHash, objects};

/// Date format used by the canonical text form of [`Value::Date`].
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// An opaque application object tagged with its type.
#[derive(Clone)]
pub struct ObjectValue {
    type_hash: TypeHash,
    data: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new<T: Any + Send + Sync>(type_hash: TypeHash, value: T) -> Self {
        Self {
            type_hash,
            data: Arc::new(value),
        }
    }

    /// The registered type of the wrapped object.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Borrow the payload as a concrete Rust type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Check if two handles share the same payload.
    pub fn ptr_eq(&self, other: &ObjectValue) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectValue({:?})", self.type_hash)
    }
}

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    /// Absent value.
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Homogeneous array; `element` is the declared element type.
    Array { element: TypeHash, items: Vec<Value> },
    /// Application object.
    Object(ObjectValue),
}

impl Value {
    /// Create an array value.
    pub fn array(element: TypeHash, items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array {
            element,
            items: items.into_iter().collect(),
        }
    }

    /// Wrap an application object.
    pub fn object<T: Any + Send + Sync>(type_hash: TypeHash, value: T) -> Self {
        Value::Object(ObjectValue::new(type_hash, value))
    }

    /// The runtime type of this value, or `None` for `Null`.
    pub fn type_hash(&self) -> Option<TypeHash> {
        let hash = match self {
            Value::Null => return None,
            Value::Bool(_) => objects::BOOLEAN,
            Value::Int8(_) => objects::BYTE,
            Value::Int16(_) => objects::SHORT,
            Value::Int32(_) => objects::INTEGER,
            Value::Int64(_) => objects::LONG,
            Value::Float(_) => objects::FLOAT,
            Value::Double(_) => objects::DOUBLE,
            Value::Char(_) => objects::CHARACTER,
            Value::String(_) => objects::STRING,
            Value::Date(_) => objects::DATE,
            Value::Array { element, .. } => TypeHash::from_array(*element),
            Value::Object(obj) => obj.type_hash(),
        };
        Some(hash)
    }

    /// Get a human-readable name for this value's variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array { .. } => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a number of any width.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int8(_)
                | Value::Int16(_)
                | Value::Int32(_)
                | Value::Int64(_)
                | Value::Float(_)
                | Value::Double(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload widened to i64. Floating point values are not integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            // i64 -> f64 may round for magnitudes above 2^53
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Int8(v) => write!(f, "Int8({v})"),
            Value::Int16(v) => write!(f, "Int16({v})"),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::Int64(v) => write!(f, "Int64({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Date(d) => write!(f, "Date({d})"),
            Value::Array { element, items } => f
                .debug_struct("Array")
                .field("element", element)
                .field("items", items)
                .finish(),
            Value::Object(obj) => write!(f, "Object({obj:?})"),
        }
    }
}

/// Canonical text form, used by the object-to-text converter.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(CANONICAL_DATE_FORMAT)),
            Value::Array { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => write!(f, "<object {}>", obj.type_hash()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (
                Value::Array {
                    element: ea,
                    items: a,
                },
                Value::Array {
                    element: eb,
                    items: b,
                },
            ) => ea == eb && a == b,
            // Objects compare by identity
            (Value::Object(a), Value::Object(b)) => a.type_hash() == b.type_hash() && a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    NaiveDate => Date,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
