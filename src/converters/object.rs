//! Object to text conversion.

use morphic_core::{ConvertError, Converter, Value};

/// Renders a value in its canonical text form.
///
/// `Null` converts to `Null`. Opaque application objects have no text form
/// and are rejected; register an exact converter for their type instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectToText;

impl Converter for ObjectToText {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Object(_) => Err(ConvertError::unexpected("value with a text form", value)),
            other => Ok(Value::String(other.to_string())),
        }
    }
}
