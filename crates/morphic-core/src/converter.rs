//! Converters and conversion executors.
//!
//! A [`Converter`] is the pluggable conversion logic. A [`ConversionExecutor`]
//! binds one converter to the single (source, target) pair it declares, plus an
//! optional converter id. Executors are immutable and cheap to clone, so the
//! service can cache and hand them out freely.
//!
//! # Example
//!
//! ```
//! use morphic_core::{ConversionExecutor, ConvertError, Value, objects};
//!
//! let upper = ConversionExecutor::new(objects::STRING, objects::STRING, |v: &Value| {
//!     match v {
//!         Value::Null => Ok(Value::Null),
//!         Value::String(s) => Ok(Value::String(s.to_uppercase())),
//!         other => Err(ConvertError::unexpected("string", other)),
//!     }
//! })
//! .with_id("upper");
//!
//! assert_eq!(upper.execute(&Value::from("abc")).unwrap(), Value::from("ABC"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{ConversionFailed, ConvertError, TypeHash, Value};

/// Conversion logic for one (source, target) pair.
///
/// Implementations must be stateless and referentially transparent: the same
/// input always yields the same output, and the input is never mutated.
/// Null handling is up to each converter and should be documented on it.
pub trait Converter: Send + Sync {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(&Value) -> Result<Value, ConvertError> + Send + Sync,
{
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        self(value)
    }
}

/// Returns its input unchanged.
///
/// Backs upcasts (`Integer` to `Number`) and explicitly registered identity
/// pairs such as `Long` to `int64`, which share one value representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        Ok(value.clone())
    }
}

/// Lookup key for executor resolution. Also the resolution cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionRequest {
    pub source: TypeHash,
    pub target: TypeHash,
    pub id: Option<Arc<str>>,
}

impl ConversionRequest {
    pub fn new(source: TypeHash, target: TypeHash) -> Self {
        Self {
            source,
            target,
            id: None,
        }
    }

    pub fn with_id(source: TypeHash, target: TypeHash, id: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            target,
            id: Some(id.into()),
        }
    }
}

/// An immutable binding of a converter to its declared type pair.
#[derive(Clone)]
pub struct ConversionExecutor {
    source: TypeHash,
    target: TypeHash,
    id: Option<Arc<str>>,
    converter: Arc<dyn Converter>,
}

impl ConversionExecutor {
    pub fn new(source: TypeHash, target: TypeHash, converter: impl Converter + 'static) -> Self {
        Self::from_shared(source, target, Arc::new(converter))
    }

    /// Bind an already shared converter (used by two-way and composed executors).
    pub fn from_shared(source: TypeHash, target: TypeHash, converter: Arc<dyn Converter>) -> Self {
        Self {
            source,
            target,
            id: None,
            converter,
        }
    }

    /// An executor that passes values through unchanged.
    pub fn identity(source: TypeHash, target: TypeHash) -> Self {
        Self::new(source, target, IdentityConverter)
    }

    /// Tag the executor with a converter id.
    pub fn with_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Declared source type.
    pub fn source_type(&self) -> TypeHash {
        self.source
    }

    /// Declared target type.
    pub fn target_type(&self) -> TypeHash {
        self.target
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The declared (source, target) pair.
    pub fn pair(&self) -> (TypeHash, TypeHash) {
        (self.source, self.target)
    }

    /// The request this executor answers exactly.
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            source: self.source,
            target: self.target,
            id: self.id.clone(),
        }
    }

    /// Shared handle to the underlying converter.
    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    /// Check if both executors run the same converter instance.
    pub fn same_converter(&self, other: &ConversionExecutor) -> bool {
        Arc::ptr_eq(&self.converter, &other.converter)
    }

    /// Convert one value.
    ///
    /// `Null` is handed to the converter like any other value.
    pub fn execute(&self, value: &Value) -> Result<Value, ConversionFailed> {
        self.converter
            .convert(value)
            .map_err(|cause| ConversionFailed {
                source_type: self.source,
                target_type: self.target,
                value: value.clone(),
                cause,
            })
    }
}

impl fmt::Debug for ConversionExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionExecutor")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects;

    fn parse_int(v: &Value) -> Result<Value, ConvertError> {
        match v {
            Value::Null => Ok(Value::Null),
            Value::String(s) => s
                .parse::<i32>()
                .map(Value::Int32)
                .map_err(|e| ConvertError::parse(s, "Integer", e)),
            other => Err(ConvertError::unexpected("string", other)),
        }
    }

    #[test]
    fn executor_declares_its_pair() {
        let exec = ConversionExecutor::new(objects::STRING, objects::INTEGER, parse_int);
        assert_eq!(exec.source_type(), objects::STRING);
        assert_eq!(exec.target_type(), objects::INTEGER);
        assert_eq!(exec.id(), None);
        assert_eq!(exec.request(), ConversionRequest::new(objects::STRING, objects::INTEGER));
    }

    #[test]
    fn execute_success_and_null() {
        let exec = ConversionExecutor::new(objects::STRING, objects::INTEGER, parse_int);
        assert_eq!(exec.execute(&Value::from("42")).unwrap(), Value::Int32(42));
        assert_eq!(exec.execute(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn execute_failure_carries_value_and_pair() {
        let exec = ConversionExecutor::new(objects::STRING, objects::INTEGER, parse_int);
        let input = Value::from("abc");
        let err = exec.execute(&input).unwrap_err();

        assert_eq!(err.value, input);
        assert_eq!(err.source_type, objects::STRING);
        assert_eq!(err.target_type, objects::INTEGER);
        assert!(matches!(err.cause, ConvertError::Parse { .. }));
    }

    #[test]
    fn identity_passes_through() {
        let exec = ConversionExecutor::identity(objects::LONG, objects::NUMBER);
        assert_eq!(exec.execute(&Value::Int64(9)).unwrap(), Value::Int64(9));
    }
}
