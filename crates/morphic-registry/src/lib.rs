//! Registries backing the morphic conversion service.
//!
//! - [`TypeRegistry`] - type entries and their hierarchy
//! - [`AliasRegistry`] - short names for canonical types
//! - [`ExecutorRegistry`] - conversion executors and their resolution rules
//!
//! The registries are plain single-threaded data structures. The service
//! clones and republishes them for concurrent use.

mod alias;
mod compose;
mod executor_registry;
mod type_registry;

pub use alias::{AliasRegistry, array_of, split_array_suffixes};
pub use executor_registry::{DuplicatePolicy, ExecutorRegistry};
pub use type_registry::TypeRegistry;
