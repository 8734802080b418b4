//! TypeRegistry - application-supplied type metadata.
//!
//! This module provides [`TypeRegistry`], the storage for every type the
//! conversion service knows about. It answers the hierarchy questions that
//! resolution needs: what are the ancestors of a type, how far away is each
//! one, and is one type assignable to another.
//!
//! # Storage Model
//!
//! - **Types**: all entries stored in a single map by `TypeHash`
//! - **Names**: reverse index from canonical name to hash
//! - **Arrays**: registering a primitive, class or interface also registers
//!   its one-dimensional array type (`Integer[]`)
//!
//! Hierarchy edges may reference hashes that are not registered yet. Such
//! edges are followed lazily: an unregistered ancestor simply has no
//! ancestors of its own.
//!
//! # Example
//!
//! ```
//! use morphic_registry::TypeRegistry;
//! use morphic_core::{ClassEntry, objects};
//!
//! let mut types = TypeRegistry::with_standard_types();
//! let money = types
//!     .register(ClassEntry::new("Money").with_base(objects::NUMBER))
//!     .unwrap();
//!
//! assert!(types.is_assignable(money, objects::OBJECT));
//! assert_eq!(types.name_of(money), Some("Money"));
//! ```

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use morphic_core::{
    ArrayEntry, ClassEntry, InterfaceEntry, PrimitiveEntry, PrimitiveKind, RegistrationError,
    TypeEntry, TypeHash, TypeRef, objects,
};

/// Registry of type entries and their hierarchy.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Entries by hash (primary storage).
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Reverse index: canonical name -> hash.
    by_name: FxHashMap<String, TypeHash>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard type set.
    ///
    /// Primitives `bool int8 int16 int32 int64 float double char`, the
    /// `Object` root, the abstract `Number`, the boxed scalars, `String`,
    /// `Date`, the `Comparable` and `CharSequence` interfaces, and the array
    /// type of each.
    pub fn with_standard_types() -> Self {
        let mut registry = Self::new();
        registry.register_standard_types();
        registry
    }

    /// Register the standard type set, skipping entries already present.
    pub fn register_standard_types(&mut self) {
        for kind in PrimitiveKind::ALL {
            self.register_if_absent(PrimitiveEntry::new(kind).into());
        }

        self.register_if_absent(ClassEntry::new("Object").into());
        self.register_if_absent(InterfaceEntry::new("Comparable").into());
        self.register_if_absent(InterfaceEntry::new("CharSequence").into());
        self.register_if_absent(
            ClassEntry::new("Number")
                .with_base(objects::OBJECT)
                .as_abstract()
                .into(),
        );

        for kind in PrimitiveKind::ALL {
            let base = if kind.is_numeric() {
                objects::NUMBER
            } else {
                objects::OBJECT
            };
            self.register_if_absent(
                ClassEntry::new(kind.boxed_name())
                    .with_base(base)
                    .with_interface(objects::COMPARABLE)
                    .into(),
            );
        }

        self.register_if_absent(
            ClassEntry::new("String")
                .with_base(objects::OBJECT)
                .with_interface(objects::COMPARABLE)
                .with_interface(objects::CHAR_SEQUENCE)
                .into(),
        );
        self.register_if_absent(
            ClassEntry::new("Date")
                .with_base(objects::OBJECT)
                .with_interface(objects::COMPARABLE)
                .into(),
        );
    }

    fn register_if_absent(&mut self, entry: TypeEntry) {
        if !self.by_name.contains_key(entry.name()) {
            // Cannot fail: the name was checked above
            let _ = self.register(entry);
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type entry.
    ///
    /// Non-array entries also get their one-dimensional array type registered.
    /// Returns the hash of the registered entry, or an error if a type with the
    /// same name already exists.
    pub fn register(&mut self, entry: impl Into<TypeEntry>) -> Result<TypeHash, RegistrationError> {
        let entry = entry.into();
        let hash = entry.type_hash();

        if self.by_name.contains_key(entry.name()) || self.types.contains_key(&hash) {
            return Err(RegistrationError::DuplicateType(entry.name().to_string()));
        }

        let array = (!entry.is_array()).then(|| ArrayEntry::new(hash, entry.name()));

        self.insert(entry);
        if let Some(array) = array
            && !self.types.contains_key(&array.type_hash)
        {
            self.insert(array.into());
        }

        Ok(hash)
    }

    /// Register the array type of a registered element type.
    ///
    /// Needed for nested arrays (`Integer[][]`), which are not registered
    /// automatically. Registering an existing array type is a no-op.
    pub fn register_array(&mut self, element: TypeHash) -> Result<TypeHash, RegistrationError> {
        let hash = TypeHash::from_array(element);
        if self.types.contains_key(&hash) {
            return Ok(hash);
        }

        let element_name = self
            .name_of(element)
            .ok_or_else(|| RegistrationError::TypeNotFound(element.to_string()))?
            .to_string();
        self.insert(ArrayEntry::new(element, &element_name).into());
        Ok(hash)
    }

    fn insert(&mut self, entry: TypeEntry) {
        let hash = entry.type_hash();
        self.by_name.insert(entry.name().to_string(), hash);
        self.types.insert(hash, entry);
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type by its hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Get a type by its canonical name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeEntry> {
        self.by_name.get(name).and_then(|hash| self.types.get(hash))
    }

    /// Get a type's hash by canonical name.
    pub fn hash_of(&self, name: &str) -> Option<TypeHash> {
        self.by_name.get(name).copied()
    }

    /// Check if a type exists by hash.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Get the canonical name of a registered type.
    pub fn name_of(&self, hash: TypeHash) -> Option<&str> {
        self.types.get(&hash).map(TypeEntry::name)
    }

    /// Pair a hash with its name for diagnostics.
    pub fn type_ref(&self, hash: TypeHash) -> TypeRef {
        match self.name_of(hash) {
            Some(name) => TypeRef::new(hash, name),
            None => TypeRef::unnamed(hash),
        }
    }

    /// Element type of a registered array type.
    pub fn array_element(&self, hash: TypeHash) -> Option<TypeHash> {
        self.types
            .get(&hash)
            .and_then(TypeEntry::as_array)
            .map(|array| array.element)
    }

    /// Iterate over all types.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }

    /// Get the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ==========================================================================
    // Hierarchy
    // ==========================================================================

    /// All ancestors of a type with their distance, nearest first.
    ///
    /// The base class and directly implemented interfaces are at distance 1,
    /// their supertypes at distance 2, and so on. Each ancestor appears once,
    /// at its shortest distance. Within a distance the base class comes before
    /// interfaces, in declaration order. The type itself is not included.
    pub fn ancestors(&self, hash: TypeHash) -> Vec<(TypeHash, usize)> {
        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(hash);
        queue.push_back((hash, 0usize));

        while let Some((current, distance)) = queue.pop_front() {
            let Some(entry) = self.types.get(&current) else {
                continue;
            };
            for parent in entry.supertypes() {
                if visited.insert(parent) {
                    result.push((parent, distance + 1));
                    queue.push_back((parent, distance + 1));
                }
            }
        }

        result
    }

    /// Ancestors grouped by distance, nearest group first.
    pub fn ancestor_levels(&self, hash: TypeHash) -> Vec<Vec<TypeHash>> {
        let mut levels: Vec<Vec<TypeHash>> = Vec::new();
        for (ancestor, distance) in self.ancestors(hash) {
            if levels.len() < distance {
                levels.push(Vec::new());
            }
            if let Some(level) = levels.last_mut() {
                level.push(ancestor);
            }
        }
        levels
    }

    /// Check if a value of type `from` is usable where `to` is expected.
    ///
    /// True when the types are equal or `to` is an ancestor of `from`.
    /// Primitive and boxed types are never assignable to each other.
    pub fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool {
        from == to || self.ancestors(from).iter().any(|(hash, _)| *hash == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphic_core::primitives;

    #[test]
    fn new_registry_is_empty() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn standard_types() {
        let registry = TypeRegistry::with_standard_types();

        // 8 primitives + 8 boxed + Object, Number, String, Date, Comparable,
        // CharSequence, each with its array type
        assert_eq!(registry.len(), 22 * 2);

        assert!(registry.get(primitives::INT64).unwrap().is_primitive());
        assert!(registry.get(objects::LONG).unwrap().is_class());
        assert!(registry.get(objects::COMPARABLE).unwrap().is_interface());
        assert_eq!(registry.hash_of("Integer[]"), Some(TypeHash::from_array(objects::INTEGER)));
        assert!(registry.get(objects::NUMBER).unwrap().as_class().unwrap().is_abstract);

        let long = registry.get_by_name("Long").unwrap();
        assert_eq!(long.type_hash(), objects::LONG);
        assert!(registry.get_by_name("long").is_none());

        assert_eq!(registry.types().count(), registry.len());
        assert_eq!(registry.types().filter(|t| t.is_array()).count(), 22);
    }

    #[test]
    fn register_standard_types_is_repeatable() {
        let mut registry = TypeRegistry::with_standard_types();
        let before = registry.len();
        registry.register_standard_types();
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn register_class_registers_array() {
        let mut registry = TypeRegistry::new();
        let hash = registry.register(ClassEntry::new("Invoice")).unwrap();

        let array = TypeHash::from_array(hash);
        assert_eq!(registry.name_of(array), Some("Invoice[]"));
        assert_eq!(registry.array_element(array), Some(hash));
        assert_eq!(registry.array_element(hash), None);
    }

    #[test]
    fn duplicate_type_error() {
        let mut registry = TypeRegistry::new();
        registry.register(ClassEntry::new("Invoice")).unwrap();

        let result = registry.register(ClassEntry::new("Invoice"));
        assert_eq!(
            result,
            Err(RegistrationError::DuplicateType("Invoice".to_string()))
        );
    }

    #[test]
    fn nested_arrays_need_explicit_registration() {
        let mut registry = TypeRegistry::with_standard_types();
        let ints = TypeHash::from_array(objects::INTEGER);
        let nested = TypeHash::from_array(ints);

        assert!(!registry.contains(nested));
        assert_eq!(registry.register_array(ints).unwrap(), nested);
        assert_eq!(registry.name_of(nested), Some("Integer[][]"));
        assert_eq!(registry.array_element(nested), Some(ints));

        let missing = registry.register_array(TypeHash::from_name("Nope"));
        assert!(matches!(missing, Err(RegistrationError::TypeNotFound(_))));
    }

    #[test]
    fn ancestors_in_distance_order() {
        let registry = TypeRegistry::with_standard_types();
        let ancestors = registry.ancestors(objects::INTEGER);

        assert_eq!(
            ancestors,
            vec![
                (objects::NUMBER, 1),
                (objects::COMPARABLE, 1),
                (objects::OBJECT, 2),
            ]
        );
    }

    #[test]
    fn ancestors_visit_diamonds_once() {
        let mut registry = TypeRegistry::new();
        let top = registry.register(InterfaceEntry::new("Top")).unwrap();
        let left = registry
            .register(InterfaceEntry::new("Left").with_base(top))
            .unwrap();
        let right = registry
            .register(InterfaceEntry::new("Right").with_base(top))
            .unwrap();
        let leaf = registry
            .register(ClassEntry::new("Leaf").with_interface(left).with_interface(right))
            .unwrap();

        assert_eq!(
            registry.ancestors(leaf),
            vec![(left, 1), (right, 1), (top, 2)]
        );
        assert_eq!(
            registry.ancestor_levels(leaf),
            vec![vec![left, right], vec![top]]
        );
    }

    #[test]
    fn unregistered_ancestors_are_leaves() {
        let mut registry = TypeRegistry::new();
        let ghost = TypeHash::from_name("Ghost");
        let child = registry
            .register(ClassEntry::new("Child").with_base(ghost))
            .unwrap();

        assert_eq!(registry.ancestors(child), vec![(ghost, 1)]);
        assert!(registry.ancestors(ghost).is_empty());
    }

    #[test]
    fn assignability() {
        let registry = TypeRegistry::with_standard_types();

        assert!(registry.is_assignable(objects::INTEGER, objects::INTEGER));
        assert!(registry.is_assignable(objects::INTEGER, objects::NUMBER));
        assert!(registry.is_assignable(objects::STRING, objects::CHAR_SEQUENCE));
        assert!(registry.is_assignable(TypeHash::from_array(objects::LONG), objects::OBJECT));
        assert!(!registry.is_assignable(objects::NUMBER, objects::INTEGER));
        assert!(!registry.is_assignable(objects::LONG, primitives::INT64));
        assert!(!registry.is_assignable(primitives::INT64, objects::LONG));
    }

    #[test]
    fn type_ref_falls_back_to_hash() {
        let registry = TypeRegistry::with_standard_types();
        assert_eq!(registry.type_ref(objects::DATE).name, "Date");

        let unknown = TypeHash::from_name("Unknown");
        assert_eq!(registry.type_ref(unknown).name, unknown.to_string());
    }
}
