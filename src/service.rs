//! ConversionService - the public conversion facade.
//!
//! # Concurrency Model
//!
//! - **Readers** load the current [`ServiceState`] snapshot from an `ArcSwap`
//!   and never take a lock.
//! - **Resolution cache**: a `DashMap` owned by the snapshot, so a newly
//!   published snapshot starts with an empty cache.
//! - **Writers** serialize on a `parking_lot::Mutex`, clone the registries,
//!   apply the change and publish a fresh snapshot. A failed registration
//!   publishes nothing.
//!
//! # Example
//!
//! ```
//! use morphic::{ConversionService, Value, objects};
//!
//! let service = ConversionService::new();
//!
//! let n = service.execute_conversion(&Value::from("42"), objects::INTEGER).unwrap();
//! assert_eq!(n, Value::Int32(42));
//!
//! let long = service.type_for_alias("long").unwrap();
//! assert_eq!(long, objects::LONG);
//! ```

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashSet};

use morphic_core::{
    ConversionError, ConversionExecutor, ConversionRequest, RegistrationError, ResolutionError,
    TypeEntry, TypeHash, TypeRef, Value,
};
use morphic_registry::{
    AliasRegistry, ExecutorRegistry, TypeRegistry, array_of, split_array_suffixes,
};

use crate::ConversionServiceBuilder;
use crate::config::ServiceConfig;
use crate::converters::{self, TwoWayConverter};

/// The three registries a service resolves against.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registries {
    pub(crate) types: TypeRegistry,
    pub(crate) aliases: AliasRegistry,
    pub(crate) executors: ExecutorRegistry,
}

impl Registries {
    /// Registries holding the configured standard content.
    ///
    /// Built-in converters are installed separately, after application
    /// converters, so they never take an application's key.
    pub(crate) fn from_config(config: &ServiceConfig) -> Self {
        let mut registries = Self {
            executors: ExecutorRegistry::with_policy(config.duplicate_policy),
            ..Self::default()
        };
        if config.standard_types {
            registries.types.register_standard_types();
        }
        if config.default_converters {
            registries.aliases.register_standard_aliases();
        }
        registries
    }

    /// Resolve a type name through aliases, literal names and `[]` suffixes.
    pub(crate) fn resolve_name(&self, name: &str) -> Option<TypeHash> {
        self.aliases
            .resolve(name)
            .or_else(|| self.types.hash_of(name))
            .or_else(|| {
                let (element, depth) = split_array_suffixes(name);
                if depth == 0 {
                    return None;
                }
                self.types
                    .hash_of(element)
                    .map(|hash| array_of(hash, depth))
            })
    }
}

/// One published, immutable registry snapshot plus its resolution cache.
struct ServiceState {
    generation: u64,
    registries: Registries,
    cache: DashMap<ConversionRequest, ConversionExecutor, FxBuildHasher>,
}

impl ServiceState {
    fn new(generation: u64, registries: Registries) -> Self {
        Self {
            generation,
            registries,
            cache: DashMap::with_hasher(FxBuildHasher),
        }
    }
}

/// Resolves, caches and runs conversion executors.
///
/// `Send + Sync`; share it behind an `Arc`. Several services can coexist,
/// and a service can fall back to a parent for anything it cannot resolve.
pub struct ConversionService {
    state: ArcSwap<ServiceState>,
    write_lock: Mutex<()>,
    parent: Option<Arc<ConversionService>>,
}

impl ConversionService {
    /// A service with the standard types, aliases and built-in converters.
    pub fn new() -> Self {
        let config = ServiceConfig::default();
        let mut registries = Registries::from_config(&config);
        converters::install_defaults(&registries.types, &mut registries.executors);
        Self::from_parts(registries, None)
    }

    /// A service with the standard types but no converters and no aliases.
    ///
    /// Every lookup fails except identity and upcast conversions.
    pub fn empty() -> Self {
        Self::from_parts(Registries::from_config(&ServiceConfig::unconfigured()), None)
    }

    pub fn builder() -> ConversionServiceBuilder {
        ConversionServiceBuilder::new()
    }

    pub(crate) fn from_parts(registries: Registries, parent: Option<Arc<ConversionService>>) -> Self {
        tracing::debug!(
            types = registries.types.len(),
            executors = registries.executors.len(),
            aliases = registries.aliases.len(),
            "conversion service created"
        );
        Self {
            state: ArcSwap::from_pointee(ServiceState::new(0, registries)),
            write_lock: Mutex::new(()),
            parent,
        }
    }

    pub fn parent(&self) -> Option<&Arc<ConversionService>> {
        self.parent.as_ref()
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Find the executor converting `source` to `target`.
    ///
    /// Tries an exact registration, identity/upcast, supertype widening and
    /// array composition, then the parent service.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn conversion_executor(
        &self,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<ConversionExecutor, ResolutionError> {
        self.resolve(ConversionRequest::new(source, target))
    }

    /// Find the executor registered under `id` for `source` to `target`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn conversion_executor_by_id(
        &self,
        id: &str,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<ConversionExecutor, ResolutionError> {
        self.resolve(ConversionRequest::with_id(source, target, id))
    }

    fn resolve(&self, request: ConversionRequest) -> Result<ConversionExecutor, ResolutionError> {
        let state = self.state.load();
        if let Some(hit) = state.cache.get(&request) {
            return Ok(hit.value().clone());
        }

        let Registries {
            types, executors, ..
        } = &state.registries;

        tracing::debug!(
            source = %types.type_ref(request.source),
            target = %types.type_ref(request.target),
            id = request.id.as_deref(),
            generation = state.generation,
            "resolution cache miss"
        );

        let found = match request.id.as_deref() {
            None => executors.find(types, request.source, request.target),
            Some(id) => executors.find_by_id(types, id, request.source, request.target),
        };

        match found {
            Ok(executor) => {
                state.cache.insert(request, executor.clone());
                Ok(executor)
            }
            Err(err) if err.is_not_found() => self.resolve_in_parent(request, err),
            Err(err) => Err(err),
        }
    }

    /// Not cached here: the parent caches in its own snapshot.
    fn resolve_in_parent(
        &self,
        request: ConversionRequest,
        err: ResolutionError,
    ) -> Result<ConversionExecutor, ResolutionError> {
        let Some(parent) = &self.parent else {
            return Err(err);
        };

        tracing::debug!(error = %err, "delegating resolution to parent service");
        parent.resolve(request).map_err(|parent_err| {
            if parent_err.is_not_found() {
                err
            } else {
                parent_err
            }
        })
    }

    /// Every executor whose declared source is `source` or one of its ancestors.
    ///
    /// Parent executors are appended for keys this service does not have.
    /// The result is a snapshot.
    pub fn conversion_executors(&self, source: TypeHash) -> Vec<ConversionExecutor> {
        let state = self.state.load();
        let mut executors = state
            .registries
            .executors
            .find_all(&state.registries.types, source);

        if let Some(parent) = &self.parent {
            let mut seen: FxHashSet<ConversionRequest> =
                executors.iter().map(ConversionExecutor::request).collect();
            for executor in parent.conversion_executors(source) {
                if seen.insert(executor.request()) {
                    executors.push(executor);
                }
            }
        }

        executors
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// Resolve an alias. `None` when neither this service nor a parent knows it.
    pub fn type_for_alias(&self, alias: &str) -> Option<TypeHash> {
        self.state
            .load()
            .registries
            .aliases
            .resolve(alias)
            .or_else(|| self.parent.as_ref().and_then(|p| p.type_for_alias(alias)))
    }

    /// Resolve a type name: aliases, then registered names, then the `[]`
    /// suffix, then the parent.
    pub fn resolve_type(&self, name: &str) -> Option<TypeHash> {
        self.state
            .load()
            .registries
            .resolve_name(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.resolve_type(name)))
    }

    /// Canonical name of a type known to this service or a parent.
    pub fn type_name(&self, hash: TypeHash) -> Option<String> {
        let state = self.state.load();
        match state.registries.types.name_of(hash) {
            Some(name) => Some(name.to_string()),
            None => self.parent.as_ref().and_then(|p| p.type_name(hash)),
        }
    }

    fn has_converter_id(&self, id: &str) -> bool {
        self.state.load().registries.executors.contains_id(id)
            || self.parent.as_ref().is_some_and(|p| p.has_converter_id(id))
    }

    // ==========================================================================
    // Execution
    // ==========================================================================

    /// Convert a value to `target`.
    ///
    /// `Null` converts to `Null` without resolution.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute_conversion(&self, value: &Value, target: TypeHash) -> Result<Value, ConversionError> {
        let Some(source) = value.type_hash() else {
            return Ok(Value::Null);
        };
        let executor = self.conversion_executor(source, target)?;
        self.run(&executor, value)
    }

    /// Convert a value to `target` with the converter registered under `id`.
    ///
    /// A `Null` value converts to `Null`, but the id must still exist.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute_conversion_by_id(
        &self,
        id: &str,
        value: &Value,
        target: TypeHash,
    ) -> Result<Value, ConversionError> {
        let Some(source) = value.type_hash() else {
            if self.has_converter_id(id) {
                return Ok(Value::Null);
            }
            let state = self.state.load();
            return Err(ResolutionError::ConverterIdNotFound {
                id: id.to_string(),
                source_type: TypeRef::new(TypeHash::EMPTY, "null"),
                target_type: state.registries.types.type_ref(target),
            }
            .into());
        };
        let executor = self.conversion_executor_by_id(id, source, target)?;
        self.run(&executor, value)
    }

    /// Convert a value to the type named `target`.
    ///
    /// Fails with an alias-not-found error when the name cannot be resolved.
    pub fn execute_conversion_to(&self, value: &Value, target: &str) -> Result<Value, ConversionError> {
        let hash = self
            .resolve_type(target)
            .ok_or_else(|| ResolutionError::AliasNotFound {
                alias: target.to_string(),
            })?;
        self.execute_conversion(value, hash)
    }

    fn run(&self, executor: &ConversionExecutor, value: &Value) -> Result<Value, ConversionError> {
        executor.execute(value).map_err(|failure| {
            tracing::trace!(
                value = ?failure.value,
                cause = %failure.cause,
                "conversion failed"
            );
            ConversionError::from(failure)
        })
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type entry (and its array type).
    pub fn add_type(&self, entry: impl Into<TypeEntry>) -> Result<TypeHash, RegistrationError> {
        let entry = entry.into();
        self.update(|registries| registries.types.register(entry))
    }

    /// Register an alias for a type.
    pub fn add_alias(&self, alias: &str, target: TypeHash) -> Result<(), RegistrationError> {
        self.update(|registries| registries.aliases.register(alias, target))
    }

    /// Register a conversion executor.
    pub fn add_converter(&self, executor: ConversionExecutor) -> Result<(), RegistrationError> {
        self.update(|registries| registries.executors.register(&registries.types, executor))
    }

    /// Register both directions of a two-way converter. Either both
    /// executors are registered or neither is.
    pub fn add_two_way_converter(
        &self,
        source: TypeHash,
        target: TypeHash,
        id: Option<&str>,
        converter: impl TwoWayConverter,
    ) -> Result<(), RegistrationError> {
        let pair = converters::two_way_executors(source, target, id, converter);
        self.update(|registries| {
            for executor in pair {
                registries.executors.register(&registries.types, executor)?;
            }
            Ok(())
        })
    }

    /// Apply a change to a copy of the registries and publish it.
    fn update<R>(
        &self,
        change: impl FnOnce(&mut Registries) -> Result<R, RegistrationError>,
    ) -> Result<R, RegistrationError> {
        let _guard = self.write_lock.lock();
        let current = self.state.load_full();

        let mut registries = current.registries.clone();
        let result = change(&mut registries)?;

        let next = ServiceState::new(current.generation + 1, registries);
        tracing::debug!(
            generation = next.generation,
            executors = next.registries.executors.len(),
            "published registry snapshot"
        );
        self.state.store(Arc::new(next));
        Ok(result)
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Number of snapshots published since the service was created.
    pub fn generation(&self) -> u64 {
        self.state.load().generation
    }

    /// Number of cached resolutions in the current snapshot.
    pub fn cached_resolutions(&self) -> usize {
        self.state.load().cache.len()
    }
}

impl Default for ConversionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load();
        f.debug_struct("ConversionService")
            .field("generation", &state.generation)
            .field("types", &state.registries.types.len())
            .field("aliases", &state.registries.aliases.len())
            .field("executors", &state.registries.executors.len())
            .field("cached", &state.cache.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
