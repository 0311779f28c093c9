//! Per-holder attribute storage and the numeric operations applied to it.
//!
//! - [`modifier`] - [`ModifierOp`] and its [`Operation`] kinds
//! - [`stacking`] - Diminishing-returns attenuation for penalised modifiers
//! - [`store`] - [`AttributeStore`], the lazily resolved modified-value cache

pub mod modifier;
pub mod stacking;
pub mod store;

pub use modifier::{ModifierOp, Operation};
pub use stacking::{effective_magnitudes, penalized_product, penalty_factor};
pub use store::AttributeStore;
