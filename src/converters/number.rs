//! Numeric conversions.

use std::fmt;

use morphic_core::{ConvertError, Converter, TypeHash, Value, objects};

/// Boxed numeric target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
}

impl NumberKind {
    pub const ALL: [NumberKind; 6] = [
        NumberKind::Byte,
        NumberKind::Short,
        NumberKind::Integer,
        NumberKind::Long,
        NumberKind::Float,
        NumberKind::Double,
    ];

    pub const fn type_hash(self) -> TypeHash {
        match self {
            NumberKind::Byte => objects::BYTE,
            NumberKind::Short => objects::SHORT,
            NumberKind::Integer => objects::INTEGER,
            NumberKind::Long => objects::LONG,
            NumberKind::Float => objects::FLOAT,
            NumberKind::Double => objects::DOUBLE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumberKind::Byte => "Byte",
            NumberKind::Short => "Short",
            NumberKind::Integer => "Integer",
            NumberKind::Long => "Long",
            NumberKind::Float => "Float",
            NumberKind::Double => "Double",
        }
    }

    pub const fn is_integral(self) -> bool {
        !matches!(self, NumberKind::Float | NumberKind::Double)
    }

    /// Narrow an integer to this kind. Integral kinds are range-checked.
    pub fn from_integer(self, n: i128) -> Result<Value, ConvertError> {
        let out_of_range = |_| ConvertError::out_of_range(n, self.name());
        match self {
            NumberKind::Byte => i8::try_from(n).map(Value::Int8).map_err(out_of_range),
            NumberKind::Short => i16::try_from(n).map(Value::Int16).map_err(out_of_range),
            NumberKind::Integer => i32::try_from(n).map(Value::Int32).map_err(out_of_range),
            NumberKind::Long => i64::try_from(n).map(Value::Int64).map_err(out_of_range),
            NumberKind::Float => Ok(Value::Float(n as f32)),
            NumberKind::Double => Ok(Value::Double(n as f64)),
        }
    }

    /// Convert a floating point number to this kind.
    ///
    /// Integral kinds truncate toward zero and reject NaN, infinities and
    /// values outside their range. `Float` rejects finite values beyond
    /// `f32::MAX`.
    pub fn from_float(self, v: f64) -> Result<Value, ConvertError> {
        match self {
            NumberKind::Double => Ok(Value::Double(v)),
            NumberKind::Float => {
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    Err(ConvertError::out_of_range(v, self.name()))
                } else {
                    Ok(Value::Float(v as f32))
                }
            }
            _ if !v.is_finite() => Err(ConvertError::out_of_range(v, self.name())),
            // Saturates for huge magnitudes, which from_integer then rejects
            _ => self
                .from_integer(v.trunc() as i128)
                .map_err(|_| ConvertError::out_of_range(v, self.name())),
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts any number to the target numeric kind.
///
/// `Null` converts to `Null`.
#[derive(Debug, Clone, Copy)]
pub struct NumberToNumber {
    target: NumberKind,
}

impl NumberToNumber {
    pub fn new(target: NumberKind) -> Self {
        Self { target }
    }

    pub fn target(&self) -> NumberKind {
        self.target
    }
}

impl Converter for NumberToNumber {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some(n) = value.as_i64() {
            return self.target.from_integer(i128::from(n));
        }
        match value.as_f64() {
            Some(v) => self.target.from_float(v),
            None => Err(ConvertError::unexpected("number", value)),
        }
    }
}
