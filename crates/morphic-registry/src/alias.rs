//! Type alias registry.
//!
//! Maps short names (`"long"`, `"int[]"`) to canonical type hashes. A pure
//! lookup table: no side effects, and unknown aliases are `None`, not errors.

use rustc_hash::FxHashMap;

use morphic_core::{RegistrationError, TypeHash, objects};

/// Suffix marking a one-dimensional array alias.
const ARRAY_SUFFIX: &str = "[]";

/// Split trailing `[]` suffixes off a name: `("int", 2)` for `"int[][]"`.
pub fn split_array_suffixes(name: &str) -> (&str, usize) {
    let mut element = name;
    let mut depth = 0;
    while let Some(rest) = element.strip_suffix(ARRAY_SUFFIX) {
        element = rest;
        depth += 1;
    }
    (element, depth)
}

/// Wrap `element` in `depth` array levels.
pub fn array_of(element: TypeHash, depth: usize) -> TypeHash {
    (0..depth).fold(element, |hash, _| TypeHash::from_array(hash))
}

/// Alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: FxHashMap<String, TypeHash>,
    /// Length of the longest alias; longer names are never looked up.
    longest: usize,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard aliases.
    ///
    /// Every alias maps to the boxed or object type, so `"long"` resolves to
    /// `Long`, not `int64`.
    pub fn with_standard_aliases() -> Self {
        let mut registry = Self::new();
        registry.register_standard_aliases();
        registry
    }

    /// Register the standard aliases, keeping any existing mapping.
    pub fn register_standard_aliases(&mut self) {
        const STANDARD: [(&str, TypeHash); 15] = [
            ("string", objects::STRING),
            ("byte", objects::BYTE),
            ("boolean", objects::BOOLEAN),
            ("bool", objects::BOOLEAN),
            ("character", objects::CHARACTER),
            ("char", objects::CHARACTER),
            ("short", objects::SHORT),
            ("integer", objects::INTEGER),
            ("int", objects::INTEGER),
            ("long", objects::LONG),
            ("float", objects::FLOAT),
            ("double", objects::DOUBLE),
            ("date", objects::DATE),
            ("number", objects::NUMBER),
            ("object", objects::OBJECT),
        ];

        for (alias, target) in STANDARD {
            self.aliases.entry(alias.to_string()).or_insert(target);
        }
    }

    /// Register an alias.
    ///
    /// Re-registering an alias with the same target is a no-op. Registering it
    /// with a different target fails.
    pub fn register(
        &mut self,
        alias: impl Into<String>,
        target: TypeHash,
    ) -> Result<(), RegistrationError> {
        let alias = alias.into();
        match self.aliases.get(&alias) {
            Some(existing) if *existing == target => Ok(()),
            Some(_) => Err(RegistrationError::DuplicateRegistration {
                name: alias,
                kind: "type alias".to_string(),
            }),
            None => {
                self.longest = self.longest.max(alias.len());
                self.aliases.insert(alias, target);
                Ok(())
            }
        }
    }

    /// Resolve an alias to its canonical type.
    ///
    /// A trailing `[]` resolves the element alias and returns the array type,
    /// for any depth (`"int[][]"`). The longest registered prefix wins, so an
    /// alias registered as `"entries[]"` is used for `"entries[][]"`.
    pub fn resolve(&self, alias: &str) -> Option<TypeHash> {
        let mut name = alias;
        let mut depth = 0;
        loop {
            if name.len() <= self.longest
                && let Some(hash) = self.aliases.get(name)
            {
                return Some(array_of(*hash, depth));
            }
            name = name.strip_suffix(ARRAY_SUFFIX)?;
            depth += 1;
        }
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Iterate over (alias, target) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeHash)> {
        self.aliases.iter().map(|(alias, hash)| (alias.as_str(), *hash))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_aliases() {
        let aliases = AliasRegistry::with_standard_aliases();
        assert_eq!(aliases.len(), 15);
        assert_eq!(aliases.resolve("long"), Some(objects::LONG));
        assert_eq!(aliases.resolve("int"), Some(objects::INTEGER));
        assert_eq!(aliases.resolve("bool"), aliases.resolve("boolean"));
        assert_eq!(aliases.resolve("not-an-alias"), None);
    }

    #[test]
    fn array_suffix_resolves_recursively() {
        let aliases = AliasRegistry::with_standard_aliases();
        let ints = TypeHash::from_array(objects::INTEGER);

        assert_eq!(aliases.resolve("int[]"), Some(ints));
        assert_eq!(aliases.resolve("int[][]"), Some(TypeHash::from_array(ints)));
        assert_eq!(aliases.resolve("nope[]"), None);
        assert_eq!(aliases.resolve("[]"), None);
    }

    #[test]
    fn re_registering_same_target_is_noop() {
        let mut aliases = AliasRegistry::new();
        aliases.register("money", objects::DOUBLE).unwrap();
        aliases.register("money", objects::DOUBLE).unwrap();
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn conflicting_alias_fails() {
        let mut aliases = AliasRegistry::with_standard_aliases();
        let err = aliases.register("long", objects::INTEGER).unwrap_err();

        assert_eq!(err.kind(), morphic_core::ErrorKind::DuplicateRegistration);
        assert_eq!(aliases.resolve("long"), Some(objects::LONG));
    }

    #[test]
    fn explicit_alias_wins_over_suffix() {
        let mut aliases = AliasRegistry::new();
        let ledger = TypeHash::from_name("Ledger");
        aliases.register("entries[]", ledger).unwrap();
        assert_eq!(aliases.resolve("entries[]"), Some(ledger));
        assert_eq!(
            aliases.resolve("entries[][]"),
            Some(TypeHash::from_array(ledger))
        );
    }

    #[test]
    fn long_suffix_chain_resolves_without_recursion() {
        let aliases = AliasRegistry::with_standard_aliases();
        let depth = 200_000;
        let name = format!("long{}", "[]".repeat(depth));

        assert_eq!(aliases.resolve(&name), Some(array_of(objects::LONG, depth)));
        assert_eq!(aliases.resolve(&format!("nope{}", "[]".repeat(depth))), None);
    }

    #[test]
    fn split_suffixes() {
        assert_eq!(split_array_suffixes("int[][]"), ("int", 2));
        assert_eq!(split_array_suffixes("int"), ("int", 0));
        assert_eq!(split_array_suffixes("[]"), ("", 1));
        assert_eq!(array_of(objects::INTEGER, 0), objects::INTEGER);
    }
}
