//! Error types for the conversion service.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError     - type/alias/converter registration
//! ResolutionError       - finding an executor for a (source, target[, id]) request
//! ConversionFailed      - an executor rejected its input (wraps ConvertError)
//! ConversionError       - service-level wrapper over ResolutionError | ConversionFailed
//! ```
//!
//! Callers branch on [`ErrorKind`] (via `kind()`), never on message text.

use std::fmt;

use thiserror::Error;

use crate::{TypeHash, TypeRef, Value};

/// Discriminant shared by every error in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A name resolved neither as an alias nor as a registered type.
    AliasNotFound,
    /// No direct, upcast, widened or composed executor exists, or the id is unknown.
    ConversionExecutorNotFound,
    /// Two or more equally specific widened candidates.
    AmbiguousConversion,
    /// A converter id exists but is bound to other types.
    ConverterIdTypeMismatch,
    /// An executor rejected the concrete input value.
    ConversionFailed,
    /// A registration would shadow an existing entry.
    DuplicateRegistration,
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while registering types, aliases or converters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A referenced type name was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A registration with this key already exists.
    #[error("duplicate registration: {name} already registered as {kind}")]
    DuplicateRegistration {
        /// The key that was duplicated.
        name: String,
        /// What was already registered under it (e.g. "converter", "type alias").
        kind: String,
    },
}

impl RegistrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistrationError::TypeNotFound(_) => ErrorKind::AliasNotFound,
            RegistrationError::DuplicateType(_)
            | RegistrationError::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
        }
    }
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Errors that occur while resolving a conversion executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A type name could not be resolved.
    #[error("no type or alias named '{alias}'")]
    AliasNotFound { alias: String },

    /// No executor converts between the pair.
    #[error("no conversion executor found for {source_type} -> {target_type}")]
    ExecutorNotFound {
        source_type: TypeRef,
        target_type: TypeRef,
    },

    /// No executor is registered under the id.
    #[error("no conversion executor registered with id '{id}' (requested {source_type} -> {target_type})")]
    ConverterIdNotFound {
        id: String,
        source_type: TypeRef,
        target_type: TypeRef,
    },

    /// Several widened candidates are equally specific.
    #[error(
        "ambiguous conversion {source_type} -> {target_type}: equally specific candidates {}",
        join_names(candidates)
    )]
    AmbiguousConversion {
        source_type: TypeRef,
        target_type: TypeRef,
        /// Declared source types of the competing executors.
        candidates: Vec<TypeRef>,
    },

    /// The id exists but none of its executors fit the pair.
    #[error(
        "converter '{id}' cannot convert {source_type} -> {target_type} (declared: {})",
        join_pairs(declared)
    )]
    ConverterIdTypeMismatch {
        id: String,
        source_type: TypeRef,
        target_type: TypeRef,
        /// (source, target) pairs registered under the id.
        declared: Vec<(TypeRef, TypeRef)>,
    },
}

impl ResolutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolutionError::AliasNotFound { .. } => ErrorKind::AliasNotFound,
            ResolutionError::ExecutorNotFound { .. } | ResolutionError::ConverterIdNotFound { .. } => {
                ErrorKind::ConversionExecutorNotFound
            }
            ResolutionError::AmbiguousConversion { .. } => ErrorKind::AmbiguousConversion,
            ResolutionError::ConverterIdTypeMismatch { .. } => ErrorKind::ConverterIdTypeMismatch,
        }
    }

    /// Check if this is a "not found" failure that a parent service may resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolutionError::AliasNotFound { .. }
                | ResolutionError::ExecutorNotFound { .. }
                | ResolutionError::ConverterIdNotFound { .. }
        )
    }
}

fn join_names(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_pairs(pairs: &[(TypeRef, TypeRef)]) -> String {
    pairs
        .iter()
        .map(|(s, t)| format!("{s} -> {t}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Execution Errors
// ============================================================================

/// Why a converter rejected its input.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Text could not be parsed into the target type.
    #[error("cannot parse {input:?} as {expected}: {reason}")]
    Parse {
        input: String,
        expected: &'static str,
        reason: String,
    },

    /// The value variant is not one the converter accepts.
    #[error("expected a {expected} value, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric value does not fit the target type.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Application-defined failure.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ConvertError {
    pub fn parse(input: &str, expected: &'static str, reason: impl fmt::Display) -> Self {
        ConvertError::Parse {
            input: input.to_string(),
            expected,
            reason: reason.to_string(),
        }
    }

    pub fn unexpected(expected: &'static str, found: &Value) -> Self {
        ConvertError::UnexpectedValue {
            expected,
            found: found.kind_name(),
        }
    }

    pub fn out_of_range(value: impl fmt::Display, target: &'static str) -> Self {
        ConvertError::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    pub fn custom(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConvertError::Custom(Box::new(err))
    }
}

/// An executor was found but rejected the concrete input value.
#[derive(Debug, Error)]
#[error("cannot convert {value:?}: {cause}")]
pub struct ConversionFailed {
    /// Declared source type of the executor.
    pub source_type: TypeHash,
    /// Declared target type of the executor.
    pub target_type: TypeHash,
    /// The rejected input.
    pub value: Value,
    /// Underlying cause.
    #[source]
    pub cause: ConvertError,
}

// ============================================================================
// Service Errors
// ============================================================================

/// Failure of an end-to-end conversion request.
///
/// Always carries the original cause, reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No usable executor for the request.
    #[error("conversion not possible: {0}")]
    Resolution(#[from] ResolutionError),

    /// The executor rejected the value.
    #[error("conversion failed: {0}")]
    Execution(#[from] ConversionFailed),
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Resolution(e) => e.kind(),
            ConversionError::Execution(_) => ErrorKind::ConversionFailed,
        }
    }

    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            ConversionError::Resolution(e) => Some(e),
            ConversionError::Execution(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&ConversionFailed> {
        match self {
            ConversionError::Execution(e) => Some(e),
            ConversionError::Resolution(_) => None,
        }
    }
}
