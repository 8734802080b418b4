//! Type metadata entries.
//!
//! The conversion service does not reflect on host types. Applications describe
//! their types with these entries and register them in a type registry:
//!
//! - [`TypeEntry`] - Unified enum wrapping all type entries
//! - [`PrimitiveEntry`] - Primitive value types, linked to their boxed type
//! - [`ClassEntry`] - Object types with an optional base class and interfaces
//! - [`InterfaceEntry`] - Interface types with base interfaces
//! - [`ArrayEntry`] - One-dimensional array types

mod class;
mod interface;
mod primitive;
mod type_entry;

pub use class::ClassEntry;
pub use interface::InterfaceEntry;
pub use primitive::{PrimitiveEntry, PrimitiveKind};
pub use type_entry::{ArrayEntry, TypeEntry};
