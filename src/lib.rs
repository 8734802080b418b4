//! Morphic - a generic type-conversion service.
//!
//! A [`ConversionService`] takes a value and a desired target type, optionally
//! qualified by a converter id, finds the right conversion executor and runs
//! it, or fails with a typed error.
//!
//! # Architecture
//!
//! - `morphic-core` - type identity, type entries, values, executors, errors
//! - `morphic-registry` - type, alias and executor registries
//! - this crate - the service facade, its builder and configuration, and the
//!   built-in converters
//!
//! # Example
//!
//! ```
//! use morphic::{ConversionService, ErrorKind, Value, objects};
//!
//! let service = ConversionService::new();
//!
//! // Number -> Long is registered once and serves every numeric subtype
//! let long = service.execute_conversion(&Value::Int32(7), objects::LONG).unwrap();
//! assert_eq!(long, Value::Int64(7));
//!
//! let err = service.execute_conversion(&Value::from("abc"), objects::INTEGER).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ConversionFailed);
//! ```

mod builder;
mod config;
pub mod converters;
mod service;

pub use builder::ConversionServiceBuilder;
pub use config::ServiceConfig;
pub use service::ConversionService;

pub use morphic_core::{
    ArrayEntry, CANONICAL_DATE_FORMAT, ClassEntry, ConversionError, ConversionExecutor,
    ConversionFailed, ConversionRequest, ConvertError, Converter, ErrorKind, IdentityConverter,
    InterfaceEntry, ObjectValue, PrimitiveEntry, PrimitiveKind, RegistrationError,
    ResolutionError, TypeEntry, TypeHash, TypeRef, Value, objects, primitives,
};
pub use morphic_registry::{AliasRegistry, DuplicatePolicy, ExecutorRegistry, TypeRegistry};
