//! ExecutorRegistry - conversion executors by type pair and by id.
//!
//! # Storage Model
//!
//! - **Default slots**: one executor per (source, target) pair, used by
//!   id-less lookups. An id-less registration owns its slot. An id'd
//!   registration only fills a vacant slot and yields it to a later id-less one.
//! - **Ids**: executors grouped by converter id, in registration order
//! - **Sources**: every registered executor grouped by declared source type,
//!   in registration order, for enumeration
//!
//! # Resolution
//!
//! [`ExecutorRegistry::find`] tries, in order: the exact default slot, an
//! identity/upcast no-op, supertype widening (nearest ancestor distance wins,
//! ties are ambiguous), and array composition.

use std::iter;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use morphic_core::{
    ConversionExecutor, ConversionRequest, RegistrationError, ResolutionError, TypeHash,
};

use crate::TypeRegistry;
use crate::compose::{ElementWise, Singleton};

/// What to do when a registration has the same key as an existing executor.
///
/// The key is the (source, target) pair for id-less executors and the
/// (id, source, target) triple for id'd ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with a duplicate registration error.
    #[default]
    Reject,
    /// Last registration wins. Always logged as a warning.
    Replace,
}

#[derive(Debug, Clone)]
struct DefaultSlot {
    executor: ConversionExecutor,
    /// Registered without an id.
    explicit: bool,
}

/// Registry of conversion executors.
#[derive(Debug, Clone, Default)]
pub struct ExecutorRegistry {
    defaults: FxHashMap<(TypeHash, TypeHash), DefaultSlot>,
    by_id: FxHashMap<Arc<str>, Vec<ConversionExecutor>>,
    by_source: FxHashMap<TypeHash, Vec<ConversionExecutor>>,
    policy: DuplicatePolicy,
}

impl ExecutorRegistry {
    /// Create an empty registry that rejects duplicates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register an executor.
    ///
    /// `types` is only consulted for names in diagnostics.
    pub fn register(
        &mut self,
        types: &TypeRegistry,
        executor: ConversionExecutor,
    ) -> Result<(), RegistrationError> {
        let pair = executor.pair();

        match executor.request().id {
            None => {
                let occupied = self.defaults.get(&pair).is_some_and(|slot| slot.explicit);
                if occupied {
                    self.on_duplicate(types, &executor)?;
                }
                self.upsert_source(executor.clone());
                self.defaults.insert(
                    pair,
                    DefaultSlot {
                        executor,
                        explicit: true,
                    },
                );
            }
            Some(id) => {
                let existing = self
                    .by_id
                    .get(&id)
                    .and_then(|list| list.iter().position(|e| e.pair() == pair));

                match existing {
                    Some(index) => {
                        self.on_duplicate(types, &executor)?;
                        if let Some(list) = self.by_id.get_mut(&id) {
                            list[index] = executor.clone();
                        }
                        if let Some(slot) = self.defaults.get_mut(&pair)
                            && !slot.explicit
                            && slot.executor.id() == Some(&*id)
                        {
                            slot.executor = executor.clone();
                        }
                    }
                    None => {
                        self.by_id.entry(id).or_default().push(executor.clone());
                        self.defaults.entry(pair).or_insert_with(|| DefaultSlot {
                            executor: executor.clone(),
                            explicit: false,
                        });
                    }
                }
                self.upsert_source(executor);
            }
        }

        Ok(())
    }

    fn on_duplicate(
        &self,
        types: &TypeRegistry,
        executor: &ConversionExecutor,
    ) -> Result<(), RegistrationError> {
        let name = describe(types, executor);
        match self.policy {
            DuplicatePolicy::Reject => Err(RegistrationError::DuplicateRegistration {
                name,
                kind: "converter".to_string(),
            }),
            DuplicatePolicy::Replace => {
                tracing::warn!(converter = %name, "replacing previously registered converter");
                Ok(())
            }
        }
    }

    fn upsert_source(&mut self, executor: ConversionExecutor) {
        let list = self.by_source.entry(executor.source_type()).or_default();
        let request = executor.request();
        match list.iter().position(|e| e.request() == request) {
            Some(index) => list[index] = executor,
            None => list.push(executor),
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Find the executor for a (source, target) pair.
    pub fn find(
        &self,
        types: &TypeRegistry,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<ConversionExecutor, ResolutionError> {
        if let Some(slot) = self.defaults.get(&(source, target)) {
            return Ok(slot.executor.clone());
        }

        if types.is_assignable(source, target) {
            return Ok(ConversionExecutor::identity(source, target));
        }

        if let Some(executor) = self.find_widened(types, source, target)? {
            return Ok(executor);
        }

        if let Some(executor) = self.find_composed(types, source, target)? {
            return Ok(executor);
        }

        Err(ResolutionError::ExecutorNotFound {
            source_type: types.type_ref(source),
            target_type: types.type_ref(target),
        })
    }

    fn find_widened(
        &self,
        types: &TypeRegistry,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<Option<ConversionExecutor>, ResolutionError> {
        for level in types.ancestor_levels(source) {
            let candidates: Vec<&ConversionExecutor> = level
                .iter()
                .filter_map(|ancestor| self.defaults.get(&(*ancestor, target)))
                .map(|slot| &slot.executor)
                .collect();

            match candidates.as_slice() {
                [] => continue,
                [executor] => {
                    tracing::debug!(
                        source = %types.type_ref(source),
                        target = %types.type_ref(target),
                        via = %types.type_ref(executor.source_type()),
                        "resolved widened conversion"
                    );
                    return Ok(Some((*executor).clone()));
                }
                many => {
                    return Err(ResolutionError::AmbiguousConversion {
                        source_type: types.type_ref(source),
                        target_type: types.type_ref(target),
                        candidates: many
                            .iter()
                            .map(|e| types.type_ref(e.source_type()))
                            .collect(),
                    });
                }
            }
        }

        Ok(None)
    }

    fn find_composed(
        &self,
        types: &TypeRegistry,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<Option<ConversionExecutor>, ResolutionError> {
        let Some(target_element) = types.array_element(target) else {
            return Ok(None);
        };

        let source_element = types.array_element(source);
        let element = match self.find(types, source_element.unwrap_or(source), target_element) {
            Ok(element) => element,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        tracing::debug!(
            source = %types.type_ref(source),
            target = %types.type_ref(target),
            "composed array conversion"
        );

        let executor = match source_element {
            Some(_) => ConversionExecutor::new(
                source,
                target,
                ElementWise {
                    element,
                    target_element,
                },
            ),
            None => ConversionExecutor::new(
                source,
                target,
                Singleton {
                    element,
                    target_element,
                },
            ),
        };
        Ok(Some(executor))
    }

    /// Find the executor registered under `id` for a (source, target) pair.
    ///
    /// Picks the executor whose declared source is `source` or its nearest
    /// ancestor, and whose declared target is `target` or a subtype of it.
    /// Within one distance an exact target beats a subtype target.
    pub fn find_by_id(
        &self,
        types: &TypeRegistry,
        id: &str,
        source: TypeHash,
        target: TypeHash,
    ) -> Result<ConversionExecutor, ResolutionError> {
        let Some(list) = self.by_id.get(id) else {
            return Err(ResolutionError::ConverterIdNotFound {
                id: id.to_string(),
                source_type: types.type_ref(source),
                target_type: types.type_ref(target),
            });
        };

        let levels = iter::once(vec![source]).chain(types.ancestor_levels(source));
        for level in levels {
            let mut chosen: Vec<&ConversionExecutor> = list
                .iter()
                .filter(|e| level.contains(&e.source_type()))
                .filter(|e| types.is_assignable(e.target_type(), target))
                .collect();
            if chosen.iter().any(|e| e.target_type() == target) {
                chosen.retain(|e| e.target_type() == target);
            }

            match chosen.as_slice() {
                [] => continue,
                [executor] => return Ok((*executor).clone()),
                many => {
                    return Err(ResolutionError::AmbiguousConversion {
                        source_type: types.type_ref(source),
                        target_type: types.type_ref(target),
                        candidates: many
                            .iter()
                            .map(|e| types.type_ref(e.source_type()))
                            .collect(),
                    });
                }
            }
        }

        Err(ResolutionError::ConverterIdTypeMismatch {
            id: id.to_string(),
            source_type: types.type_ref(source),
            target_type: types.type_ref(target),
            declared: list
                .iter()
                .map(|e| (types.type_ref(e.source_type()), types.type_ref(e.target_type())))
                .collect(),
        })
    }

    /// Every executor whose declared source is `source` or one of its ancestors.
    ///
    /// Nearest source first, registration order within a source, no duplicates.
    pub fn find_all(&self, types: &TypeRegistry, source: TypeHash) -> Vec<ConversionExecutor> {
        let sources = iter::once(source).chain(types.ancestors(source).into_iter().map(|(h, _)| h));

        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for hash in sources {
            for executor in self.by_source.get(&hash).into_iter().flatten() {
                if seen.insert(executor.request()) {
                    result.push(executor.clone());
                }
            }
        }
        result
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Check if a registration with this key would be a duplicate.
    pub fn contains_key(&self, request: &ConversionRequest) -> bool {
        let pair = (request.source, request.target);
        match &request.id {
            None => self.defaults.get(&pair).is_some_and(|slot| slot.explicit),
            Some(id) => self
                .by_id
                .get(id)
                .is_some_and(|list| list.iter().any(|e| e.pair() == pair)),
        }
    }

    /// Check if an id has any executors.
    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Executors registered under an id, in registration order.
    pub fn executors_for_id(&self, id: &str) -> &[ConversionExecutor] {
        self.by_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over registered ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(|id| &**id)
    }

    /// Number of registered executors.
    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

fn describe(types: &TypeRegistry, executor: &ConversionExecutor) -> String {
    let source = types.type_ref(executor.source_type());
    let target = types.type_ref(executor.target_type());
    match executor.id() {
        Some(id) => format!("{source} -> {target} (id '{id}')"),
        None => format!("{source} -> {target}"),
    }
}
