//! Composed converters for array conversion.

use morphic_core::{ConversionExecutor, ConvertError, Converter, TypeHash, Value};

/// Converts an array element-wise with a resolved element executor.
///
/// `Null` arrays and `Null` elements stay `Null`.
pub(crate) struct ElementWise {
    pub(crate) element: ConversionExecutor,
    pub(crate) target_element: TypeHash,
}

impl Converter for ElementWise {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array { items, .. } => {
                let items = items
                    .iter()
                    .map(|item| match item {
                        Value::Null => Ok(Value::Null),
                        item => self.element.converter().convert(item),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array {
                    element: self.target_element,
                    items,
                })
            }
            other => Err(ConvertError::unexpected("array", other)),
        }
    }
}

/// Wraps a single converted value into a one-element array.
pub(crate) struct Singleton {
    pub(crate) element: ConversionExecutor,
    pub(crate) target_element: TypeHash,
}

impl Converter for Singleton {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        match value {
            Value::Null => Ok(Value::Null),
            value => {
                let item = self.element.converter().convert(value)?;
                Ok(Value::Array {
                    element: self.target_element,
                    items: vec![item],
                })
            }
        }
    }
}
