//! Builder for constructing a [`ConversionService`].

use std::sync::Arc;

use morphic_core::{ConversionExecutor, RegistrationError, TypeEntry, TypeHash};

use crate::config::ServiceConfig;
use crate::converters::{self, TwoWayConverter};
use crate::service::{ConversionService, Registries};

/// Accumulates types, aliases and converters, then builds a service.
///
/// Registration errors are collected instead of failing fast, so `build()`
/// reports every problem at once. Built-in converters are installed after
/// the application's, and never take a key the application registered.
///
/// # Example
///
/// ```
/// use morphic::{ClassEntry, ConversionExecutor, ConversionService, Value, objects};
/// use morphic::converters::TextToDate;
///
/// let service = ConversionService::builder()
///     .with_type(ClassEntry::new("Invoice").with_base(objects::OBJECT))
///     .with_alias("day", objects::DATE)
///     .with_converter(
///         ConversionExecutor::new(objects::STRING, objects::DATE, TextToDate::with_pattern("%d.%m.%Y"))
///             .with_id("de"),
///     )
///     .build()
///     .unwrap();
///
/// let date = service
///     .execute_conversion_by_id("de", &Value::from("24.12.2024"), objects::DATE)
///     .unwrap();
/// assert_eq!(date.to_string(), "2024-12-24");
/// ```
#[derive(Default)]
pub struct ConversionServiceBuilder {
    config: ServiceConfig,
    types: Vec<TypeEntry>,
    aliases: Vec<(String, TypeHash)>,
    converters: Vec<ConversionExecutor>,
    parent: Option<Arc<ConversionService>>,
}

impl std::fmt::Debug for ConversionServiceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionServiceBuilder")
            .field("config", &self.config)
            .field("types", &self.types.len())
            .field("aliases", &self.aliases)
            .field("converters", &self.converters.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl ConversionServiceBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_type(mut self, entry: impl Into<TypeEntry>) -> Self {
        self.types.push(entry.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: TypeHash) -> Self {
        self.aliases.push((alias.into(), target));
        self
    }

    pub fn with_converter(mut self, executor: ConversionExecutor) -> Self {
        self.converters.push(executor);
        self
    }

    /// Register both directions of a two-way converter.
    pub fn with_two_way_converter(
        mut self,
        source: TypeHash,
        target: TypeHash,
        id: Option<&str>,
        converter: impl TwoWayConverter,
    ) -> Self {
        self.converters
            .extend(converters::two_way_executors(source, target, id, converter));
        self
    }

    /// Fall back to `parent` for anything this service cannot resolve.
    pub fn with_parent(mut self, parent: Arc<ConversionService>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Build the service, or return every registration error.
    pub fn build(self) -> Result<ConversionService, Vec<RegistrationError>> {
        let mut errors = Vec::new();
        let mut registries = Registries::from_config(&self.config);

        for entry in self.types {
            if let Err(e) = registries.types.register(entry) {
                errors.push(e);
            }
        }

        // Config aliases name their target, so they resolve after all types
        for (alias, type_name) in &self.config.aliases {
            let result = registries
                .resolve_name(type_name)
                .ok_or_else(|| RegistrationError::TypeNotFound(type_name.clone()))
                .and_then(|target| registries.aliases.register(alias.as_str(), target));
            if let Err(e) = result {
                errors.push(e);
            }
        }

        for (alias, target) in self.aliases {
            if let Err(e) = registries.aliases.register(alias, target) {
                errors.push(e);
            }
        }

        for executor in self.converters {
            if let Err(e) = registries.executors.register(&registries.types, executor) {
                errors.push(e);
            }
        }

        if self.config.default_converters {
            converters::install_defaults(&registries.types, &mut registries.executors);
        }

        if errors.is_empty() {
            Ok(ConversionService::from_parts(registries, self.parent))
        } else {
            Err(errors)
        }
    }
}
