//! Holders: entities that own an [`AttributeStore`] and run effects.
//!
//! - [`ship`] - The fit's hull
//! - [`module`] - Fitted modules with an activation state and optional charge
//! - [`charge`] - Ammunition or scripts loaded in a module
//! - [`drone`] - Drone stacks, also usable as projected sources
//! - [`booster`] - Boosters with a fixed slot derived from the item

pub mod booster;
pub mod charge;
pub mod drone;
pub mod module;
pub mod ship;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeStore;
use crate::catalog::{Context, Effect, Item, RunTime};
use crate::constants::BOOSTER_GROUP;
use crate::effects::{EffectScope, ModifierSink};
use crate::error::{Error, Result};

pub use booster::{Booster, InvalidBooster, RestoredBooster};
pub use charge::Charge;
pub use drone::Drone;
pub use module::{Module, ModuleState};
pub use ship::Ship;

/// Kind of holder, used for classification checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderKind {
    Ship,
    Module,
    Drone,
    Booster,
    Charge,
}

impl HolderKind {
    pub fn label(self) -> &'static str {
        match self {
            HolderKind::Ship => "ship",
            HolderKind::Module => "module",
            HolderKind::Drone => "drone",
            HolderKind::Booster => "booster",
            HolderKind::Charge => "charge",
        }
    }

    /// Whether `item` is classified as this kind of holder.
    pub fn accepts(self, item: &Item) -> bool {
        match self {
            HolderKind::Booster => item.group.name == BOOSTER_GROUP,
            HolderKind::Ship => item.group.category == "Ship",
            HolderKind::Module => item.group.category == "Module",
            HolderKind::Drone => item.group.category == "Drone",
            HolderKind::Charge => item.group.category == "Charge",
        }
    }
}

impl fmt::Display for HolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reject items whose classification does not match `kind`.
pub(crate) fn require_kind(item: &Item, kind: HolderKind) -> Result<()> {
    if kind.accepts(item) {
        return Ok(());
    }
    let found = match kind {
        HolderKind::Booster => format!("group {}", item.group.name),
        _ => format!("category {}", item.group.category),
    };
    Err(Error::InvalidItem {
        item_id: item.id,
        name: item.name.clone(),
        expected: kind.label(),
        found,
    })
}

/// Common interface over every holder type.
pub trait Holder {
    fn kind(&self) -> HolderKind;

    /// The item this holder was built from. Fixed for the holder's lifetime.
    fn item(&self) -> &Arc<Item>;

    fn attributes(&self) -> &AttributeStore;

    fn attributes_mut(&mut self) -> &mut AttributeStore;

    /// Drop this holder's modified-value cache.
    fn clear(&mut self) {
        self.attributes_mut().clear();
    }

    /// Issue the modifiers for this holder's effects in one run-time phase.
    ///
    /// `force_projected` asks for the effects this holder projects onto the
    /// fit in `scope`; holders that cannot project return without issuing
    /// anything.
    fn calculate_modified_attributes(
        &self,
        scope: &EffectScope<'_>,
        run_time: RunTime,
        force_projected: bool,
        sink: &mut ModifierSink,
    ) -> Result<()>;
}

/// Invoke every effect of `item` in `run_time` accepted by `applies`,
/// `repeat` times each, in catalog-declared order.
pub(crate) fn run_effects<F>(
    item: &Item,
    run_time: RunTime,
    context: &Context,
    repeat: u32,
    scope: &EffectScope<'_>,
    sink: &mut ModifierSink,
    applies: F,
) -> Result<()>
where
    F: Fn(&Effect) -> bool,
{
    for effect in item
        .effects()
        .iter()
        .filter(|effect| effect.run_time == run_time && applies(effect))
    {
        for _ in 0..repeat {
            effect.handler.apply(effect, scope, context, sink)?;
        }
    }
    Ok(())
}
