//! Core types for the morphic conversion service.
//!
//! This crate provides the fundamental types shared by the registries and the
//! service facade:
//!
//! - [`TypeHash`] / [`TypeRef`] - Deterministic type identity
//! - [`TypeEntry`] and friends - Application-supplied type metadata
//! - [`Value`] - The dynamic value being converted
//! - [`Converter`] / [`ConversionExecutor`] - Pluggable conversion units
//! - Error types for registration, resolution and execution

mod converter;
pub mod entries;
mod error;
mod type_hash;
mod value;

pub use converter::{ConversionExecutor, ConversionRequest, Converter, IdentityConverter};
pub use entries::{
    ArrayEntry, ClassEntry, InterfaceEntry, PrimitiveEntry, PrimitiveKind, TypeEntry,
};
pub use error::{
    ConversionError, ConversionFailed, ConvertError, ErrorKind, RegistrationError, ResolutionError,
};
pub use type_hash::{TypeHash, TypeRef, hash_constants, objects, primitives};
pub use value::{CANONICAL_DATE_FORMAT, ObjectValue, Value};
