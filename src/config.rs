//! Service configuration.
//!
//! [`ServiceConfig`] is plain serde data so it can live in an application's
//! config file next to everything else:
//!
//! ```
//! use morphic::{DuplicatePolicy, ServiceConfig};
//!
//! let config: ServiceConfig = serde_json::from_str(
//!     r#"{ "duplicate_policy": "replace", "aliases": { "money": "Double" } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
//! assert!(config.default_converters);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use morphic_registry::DuplicatePolicy;

/// Options applied when a [`ConversionService`](crate::ConversionService) is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Handling of registrations that shadow an existing executor.
    pub duplicate_policy: DuplicatePolicy,
    /// Register the standard type set.
    pub standard_types: bool,
    /// Register the built-in converters and the standard aliases.
    pub default_converters: bool,
    /// Extra aliases: alias -> canonical type name (or another alias).
    pub aliases: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            standard_types: true,
            default_converters: true,
            aliases: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Standard types only: no converters and no aliases.
    pub fn unconfigured() -> Self {
        Self {
            default_converters: false,
            ..Self::default()
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), type_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert!(config.standard_types);
        assert!(config.default_converters);
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn empty_json_is_default() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let config = ServiceConfig::unconfigured()
            .with_duplicate_policy(DuplicatePolicy::Replace)
            .with_alias("money", "Double");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""duplicate_policy":"replace""#));

        let parsed: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unknown_policy_rejected() {
        let result = serde_json::from_str::<ServiceConfig>(r#"{ "duplicate_policy": "merge" }"#);
        assert!(result.is_err());
    }
}
