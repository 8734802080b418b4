//! Class type entry.

use crate::TypeHash;

/// Registry entry for an object type.
///
/// Classes form a single-inheritance tree and may implement any number of
/// interfaces. Both edges take part in widened converter resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Canonical name.
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Base class type hash (single inheritance).
    pub base_class: Option<TypeHash>,
    /// Implemented interface type hashes.
    pub interfaces: Vec<TypeHash>,
    /// Class is abstract (never the runtime type of a value).
    pub is_abstract: bool,
}

impl ClassEntry {
    /// Create a class entry whose hash is computed from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            base_class: None,
            interfaces: Vec::new(),
            is_abstract: false,
        }
    }

    // === Builder Methods ===

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_class = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Mark as abstract.
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Direct supertypes: the base class first, then interfaces in declaration order.
    pub fn supertypes(&self) -> Vec<TypeHash> {
        self.base_class
            .into_iter()
            .chain(self.interfaces.iter().copied())
            .collect()
    }
}
