//! TypeEntry enum for unified type storage.

use crate::{TypeHash, objects};

use super::{ClassEntry, InterfaceEntry, PrimitiveEntry};

/// Registry entry for a one-dimensional array type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    /// Display name (`Integer[]`).
    pub name: String,
    /// Type hash for identity, derived from the element hash.
    pub type_hash: TypeHash,
    /// Element type hash.
    pub element: TypeHash,
}

impl ArrayEntry {
    /// Create the array entry for an element type.
    pub fn new(element: TypeHash, element_name: &str) -> Self {
        Self {
            name: format!("{element_name}[]"),
            type_hash: TypeHash::from_array(element),
            element,
        }
    }
}

/// Unified type entry for registry storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeEntry {
    /// Primitive value type (int64, bool, ...).
    Primitive(PrimitiveEntry),
    /// Object type.
    Class(ClassEntry),
    /// Interface type.
    Interface(InterfaceEntry),
    /// Array type.
    Array(ArrayEntry),
}

impl TypeEntry {
    /// Get the type hash for this entry.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeEntry::Primitive(e) => e.type_hash,
            TypeEntry::Class(e) => e.type_hash,
            TypeEntry::Interface(e) => e.type_hash,
            TypeEntry::Array(e) => e.type_hash,
        }
    }

    /// Get the canonical name.
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Primitive(e) => e.name(),
            TypeEntry::Class(e) => &e.name,
            TypeEntry::Interface(e) => &e.name,
            TypeEntry::Array(e) => &e.name,
        }
    }

    /// Direct supertypes of this type.
    ///
    /// Primitives have none. Arrays are objects, so their only supertype is
    /// the root `Object` class.
    pub fn supertypes(&self) -> Vec<TypeHash> {
        match self {
            TypeEntry::Primitive(_) => Vec::new(),
            TypeEntry::Class(e) => e.supertypes(),
            TypeEntry::Interface(e) => e.base_interfaces.clone(),
            TypeEntry::Array(_) => vec![objects::OBJECT],
        }
    }

    // === Type Checks ===

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeEntry::Primitive(_))
    }

    /// Check if this is a class type.
    pub fn is_class(&self) -> bool {
        matches!(self, TypeEntry::Class(_))
    }

    /// Check if this is an interface type.
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeEntry::Interface(_))
    }

    /// Check if this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, TypeEntry::Array(_))
    }

    // === Accessors ===

    pub fn as_primitive(&self) -> Option<&PrimitiveEntry> {
        match self {
            TypeEntry::Primitive(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassEntry> {
        match self {
            TypeEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceEntry> {
        match self {
            TypeEntry::Interface(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayEntry> {
        match self {
            TypeEntry::Array(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PrimitiveEntry> for TypeEntry {
    fn from(entry: PrimitiveEntry) -> Self {
        TypeEntry::Primitive(entry)
    }
}

impl From<ClassEntry> for TypeEntry {
    fn from(entry: ClassEntry) -> Self {
        TypeEntry::Class(entry)
    }
}

impl From<InterfaceEntry> for TypeEntry {
    fn from(entry: InterfaceEntry) -> Self {
        TypeEntry::Interface(entry)
    }
}

impl From<ArrayEntry> for TypeEntry {
    fn from(entry: ArrayEntry) -> Self {
        TypeEntry::Array(entry)
    }
}
