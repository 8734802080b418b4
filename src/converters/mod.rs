//! Built-in converters.
//!
//! - [`TextToBoolean`], [`TextToNumber`], [`TextToCharacter`], [`TextToDate`] -
//!   parse `String` values
//! - [`NumberToNumber`] - range-checked numeric conversion from `Number`
//! - [`ObjectToText`] - canonical text form from `Object`
//! - boxed/primitive identity executors (`Long` <-> `int64`, ...)
//!
//! [`install_defaults`] registers all of them. It never overrides an
//! executor the application registered under the same key.

mod number;
mod object;
mod text;

use std::sync::Arc;

use morphic_core::{
    ConversionExecutor, ConvertError, Converter, PrimitiveKind, TypeHash, Value, objects,
};
use morphic_registry::{ExecutorRegistry, TypeRegistry};

pub use number::{NumberKind, NumberToNumber};
pub use object::ObjectToText;
pub use text::{TextToBoolean, TextToCharacter, TextToDate, TextToNumber};

/// A converter that works in both directions between two types.
pub trait TwoWayConverter: Send + Sync + 'static {
    /// Convert from the declared source to the declared target.
    fn convert_forward(&self, value: &Value) -> Result<Value, ConvertError>;

    /// Convert from the declared target back to the declared source.
    fn convert_reverse(&self, value: &Value) -> Result<Value, ConvertError>;
}

/// Two independent one-way converters used as a pair.
#[derive(Debug, Clone)]
pub struct ConverterPair<F, R> {
    forward: F,
    reverse: R,
}

impl<F, R> ConverterPair<F, R>
where
    F: Converter + 'static,
    R: Converter + 'static,
{
    pub fn new(forward: F, reverse: R) -> Self {
        Self { forward, reverse }
    }
}

impl<F, R> TwoWayConverter for ConverterPair<F, R>
where
    F: Converter + 'static,
    R: Converter + 'static,
{
    fn convert_forward(&self, value: &Value) -> Result<Value, ConvertError> {
        self.forward.convert(value)
    }

    fn convert_reverse(&self, value: &Value) -> Result<Value, ConvertError> {
        self.reverse.convert(value)
    }
}

struct Forward(Arc<dyn TwoWayConverter>);

impl Converter for Forward {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        self.0.convert_forward(value)
    }
}

struct Reverse(Arc<dyn TwoWayConverter>);

impl Converter for Reverse {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        self.0.convert_reverse(value)
    }
}

/// Split a two-way converter into `source -> target` and `target -> source`
/// executors sharing one converter instance and the same id.
pub fn two_way_executors(
    source: TypeHash,
    target: TypeHash,
    id: Option<&str>,
    converter: impl TwoWayConverter,
) -> [ConversionExecutor; 2] {
    let shared: Arc<dyn TwoWayConverter> = Arc::new(converter);
    let forward = ConversionExecutor::new(source, target, Forward(Arc::clone(&shared)));
    let reverse = ConversionExecutor::new(target, source, Reverse(shared));

    match id {
        Some(id) => [forward.with_id(id), reverse.with_id(id)],
        None => [forward, reverse],
    }
}

/// Every built-in executor.
pub fn default_executors() -> Vec<ConversionExecutor> {
    let mut executors = vec![
        ConversionExecutor::new(objects::STRING, objects::BOOLEAN, TextToBoolean),
        ConversionExecutor::new(objects::STRING, objects::CHARACTER, TextToCharacter),
        ConversionExecutor::new(objects::STRING, objects::DATE, TextToDate::new()),
        ConversionExecutor::new(objects::OBJECT, objects::STRING, ObjectToText),
    ];

    for kind in NumberKind::ALL {
        executors.push(ConversionExecutor::new(
            objects::STRING,
            kind.type_hash(),
            TextToNumber::new(kind),
        ));
        executors.push(ConversionExecutor::new(
            objects::NUMBER,
            kind.type_hash(),
            NumberToNumber::new(kind),
        ));
    }

    for kind in PrimitiveKind::ALL {
        executors.push(ConversionExecutor::identity(kind.boxed_hash(), kind.type_hash()));
        executors.push(ConversionExecutor::identity(kind.type_hash(), kind.boxed_hash()));
    }

    executors
}

/// Register the built-in executors whose keys are still free.
pub fn install_defaults(types: &TypeRegistry, executors: &mut ExecutorRegistry) {
    for executor in default_executors() {
        if executors.contains_key(&executor.request()) {
            tracing::debug!(
                source = %types.type_ref(executor.source_type()),
                target = %types.type_ref(executor.target_type()),
                "keeping application converter over built-in"
            );
            continue;
        }
        if let Err(err) = executors.register(types, executor) {
            tracing::warn!(error = %err, "built-in converter not installed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphic_core::primitives;

    #[test]
    fn defaults_cover_standard_pairs() {
        let types = TypeRegistry::with_standard_types();
        let mut executors = ExecutorRegistry::new();
        install_defaults(&types, &mut executors);

        assert_eq!(executors.len(), default_executors().len());

        let parse = executors.find(&types, objects::STRING, objects::LONG).unwrap();
        assert_eq!(parse.execute(&Value::from("12")).unwrap(), Value::Int64(12));

        let unbox = executors.find(&types, objects::LONG, primitives::INT64).unwrap();
        assert_eq!(unbox.execute(&Value::Int64(3)).unwrap(), Value::Int64(3));
    }

    #[test]
    fn defaults_keep_application_converters() {
        let types = TypeRegistry::with_standard_types();
        let mut executors = ExecutorRegistry::new();
        let always_true = |_: &Value| -> Result<Value, ConvertError> { Ok(Value::Bool(true)) };
        let custom = ConversionExecutor::new(objects::STRING, objects::BOOLEAN, always_true);
        executors.register(&types, custom).unwrap();

        install_defaults(&types, &mut executors);

        let found = executors.find(&types, objects::STRING, objects::BOOLEAN).unwrap();
        assert_eq!(found.execute(&Value::from("no")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn two_way_shares_id_and_converter() {
        let [forward, reverse] = two_way_executors(
            objects::STRING,
            objects::DATE,
            Some("us"),
            TextToDate::with_pattern("%m/%d/%Y"),
        );

        assert_eq!(forward.pair(), (objects::STRING, objects::DATE));
        assert_eq!(reverse.pair(), (objects::DATE, objects::STRING));
        assert_eq!(forward.id(), Some("us"));
        assert_eq!(reverse.id(), Some("us"));

        let date = forward.execute(&Value::from("12/25/2023")).unwrap();
        assert_eq!(reverse.execute(&date).unwrap(), Value::from("12/25/2023"));
    }

    #[test]
    fn converter_pair_from_closures() {
        let pair = ConverterPair::new(
            |v: &Value| -> Result<Value, ConvertError> {
                Ok(Value::Int64(v.as_str().map_or(0, str::len) as i64))
            },
            |v: &Value| -> Result<Value, ConvertError> {
                Ok(Value::String("x".repeat(v.as_i64().unwrap_or(0) as usize)))
            },
        );
        let [forward, reverse] = two_way_executors(objects::STRING, objects::LONG, None, pair);

        assert_eq!(forward.execute(&Value::from("abc")).unwrap(), Value::Int64(3));
        assert_eq!(reverse.execute(&Value::Int64(2)).unwrap(), Value::from("xx"));
        assert_eq!(forward.id(), None);
    }
}
