//! Interface type entry.

use crate::TypeHash;

/// Registry entry for an interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceEntry {
    /// Canonical name.
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Base interface type hashes.
    pub base_interfaces: Vec<TypeHash>,
}

impl InterfaceEntry {
    /// Create an interface entry whose hash is computed from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            base_interfaces: Vec::new(),
        }
    }

    /// Add a base interface.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_interfaces.push(base);
        self
    }
}
