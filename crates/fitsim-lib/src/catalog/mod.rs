//! Read-only item catalog consumed by the calculation core.
//!
//! - [`item`] - Items, groups, and attribute definitions
//! - [`effect`] - Effects, run-time phases, and context tags
//! - [`loader`] - JSON catalog loading and the [`ItemSource`] lookup trait
//!
//! Everything here is immutable once loaded and is shared between fits through
//! [`std::sync::Arc`].

pub mod effect;
pub mod item;
pub mod loader;

pub use effect::{Context, ContextTag, Effect, EffectType, RunTime};
pub use item::{AttributeDef, AttributeDefs, AttributeKind, Group, Item, ItemId};
pub use loader::{Catalog, ItemSource};
