//! Fitting simulation library entry points.
//!
//! This crate loads an item catalog, builds fits out of holders (ship,
//! modules, charges, drones, boosters and projected sources) and resolves
//! every holder's modified attributes by running the effects of the items
//! involved. Consumers such as the CLI should go through the types exported
//! here instead of driving stores and handlers themselves.
//!

#![deny(warnings)]

pub mod attributes;
pub mod calc;
pub mod catalog;
pub mod constants;
pub mod effects;
pub mod error;
pub mod fit;
pub mod holder;
pub mod output;
pub mod records;

pub use attributes::{AttributeStore, ModifierOp, Operation};
pub use calc::{CalcFailure, CalcReport, CalcState, CalculationContext};
pub use catalog::{
    Catalog, Context, ContextTag, Effect, EffectType, Item, ItemId, ItemSource, RunTime,
};
pub use effects::{EffectHandler, EffectScope, HandlerRegistry, ModifierSink};
pub use error::{Error, Result};
pub use fit::{Fit, HolderRef, SharedFit};
pub use holder::{
    Booster, Charge, Drone, Holder, HolderKind, InvalidBooster, Module, ModuleState,
    RestoredBooster, Ship,
};
pub use output::{AttributeRow, FitReport, ReportFormat};
pub use records::{BoosterRecord, DroneRecord, FitRecord, InvalidReason, ModuleRecord, RestoreIssue};
