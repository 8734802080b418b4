//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that uniquely identifies a
//! type known to the conversion service. Hashes are computed from the canonical
//! type name, so:
//!
//! - the same name always yields the same identifier (no registration order)
//! - identifiers can be used before the type entry is registered
//! - well-known identifiers are compile-time constants (see [`primitives`] and
//!   [`objects`])
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants so that a named type and
//! an array type can never share an identifier.
//!
//! # Examples
//!
//! ```
//! use morphic_core::{TypeHash, objects};
//!
//! let long = TypeHash::from_name("Long");
//! assert_eq!(long, objects::LONG);
//!
//! let long_array = TypeHash::from_array(long);
//! assert_ne!(long, long_array);
//! ```

use std::fmt;

use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for named type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Seed for array type hashes (mixed with the element hash)
    pub const ARRAY: u64 = 0x6b1d3e58a90c4f27;
}

/// A deterministic 64-bit hash identifying a type.
///
/// Primitive value types and their boxed object counterparts have distinct
/// hashes (`int64` vs `Long`): they are related through the primitive entry,
/// never equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a canonical type name.
    ///
    /// ```
    /// use morphic_core::TypeHash;
    ///
    /// assert_eq!(TypeHash::from_name("Date"), TypeHash::from_name("Date"));
    /// assert_ne!(TypeHash::from_name("Date"), TypeHash::from_name("date"));
    /// ```
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of the one-dimensional array type with the given element.
    #[inline]
    pub const fn from_array(element: TypeHash) -> Self {
        let bytes = element.0.to_le_bytes();
        TypeHash(xxh64(&bytes, hash_constants::ARRAY))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// A type hash paired with its display name.
///
/// Carried by resolution errors so diagnostics read `Integer -> String`
/// instead of two hex numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub hash: TypeHash,
    pub name: String,
}

impl TypeRef {
    pub fn new(hash: TypeHash, name: impl Into<String>) -> Self {
        Self {
            hash,
            name: name.into(),
        }
    }

    /// A reference for a hash with no registered name.
    pub fn unnamed(hash: TypeHash) -> Self {
        Self {
            hash,
            name: hash.to_string(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Hashes of the primitive value types.
pub mod primitives {
    use super::TypeHash;

    pub const BOOL: TypeHash = TypeHash::from_name("bool");
    pub const INT8: TypeHash = TypeHash::from_name("int8");
    pub const INT16: TypeHash = TypeHash::from_name("int16");
    pub const INT32: TypeHash = TypeHash::from_name("int32");
    pub const INT64: TypeHash = TypeHash::from_name("int64");
    pub const FLOAT: TypeHash = TypeHash::from_name("float");
    pub const DOUBLE: TypeHash = TypeHash::from_name("double");
    pub const CHAR: TypeHash = TypeHash::from_name("char");
}

/// Hashes of the standard object types.
///
/// Scalar [`Value`](crate::Value)s report their boxed object type here as
/// their runtime type.
pub mod objects {
    use super::TypeHash;

    /// Root class of the standard hierarchy.
    pub const OBJECT: TypeHash = TypeHash::from_name("Object");
    /// Abstract base of the boxed numeric types.
    pub const NUMBER: TypeHash = TypeHash::from_name("Number");
    /// Interface implemented by every boxed scalar, `String` and `Date`.
    pub const COMPARABLE: TypeHash = TypeHash::from_name("Comparable");
    /// Interface implemented by `String`.
    pub const CHAR_SEQUENCE: TypeHash = TypeHash::from_name("CharSequence");

    pub const BOOLEAN: TypeHash = TypeHash::from_name("Boolean");
    pub const BYTE: TypeHash = TypeHash::from_name("Byte");
    pub const SHORT: TypeHash = TypeHash::from_name("Short");
    pub const INTEGER: TypeHash = TypeHash::from_name("Integer");
    pub const LONG: TypeHash = TypeHash::from_name("Long");
    pub const FLOAT: TypeHash = TypeHash::from_name("Float");
    pub const DOUBLE: TypeHash = TypeHash::from_name("Double");
    pub const CHARACTER: TypeHash = TypeHash::from_name("Character");
    pub const STRING: TypeHash = TypeHash::from_name("String");
    pub const DATE: TypeHash = TypeHash::from_name("Date");
}
