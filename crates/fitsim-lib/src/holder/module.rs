use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeStore;
use crate::catalog::{Context, ContextTag, Effect, EffectType, Item, RunTime};
use crate::effects::{EffectScope, ModifierSink};
use crate::error::Result;

use super::{require_kind, run_effects, Charge, Holder, HolderKind};

/// Activation state of a fitted module, ordered from least to most active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ModuleState {
    Offline,
    #[default]
    Online,
    Active,
    Overheated,
}

impl ModuleState {
    /// Whether an effect runs on a module in this state (own fit only).
    pub fn runs(self, effect: &Effect) -> bool {
        if !effect.active_by_default {
            return false;
        }
        effect.is_type(EffectType::Passive)
            || (effect.is_type(EffectType::Online) && self >= ModuleState::Online)
            || (effect.is_type(EffectType::Active) && self >= ModuleState::Active)
            || (effect.is_type(EffectType::Overheat) && self == ModuleState::Overheated)
    }
}

/// Module fitted to a ship or projected from another fit.
#[derive(Debug, Clone)]
pub struct Module {
    item: Arc<Item>,
    state: ModuleState,
    charge: Option<Charge>,
    store: AttributeStore,
}

impl Module {
    pub fn new(item: Arc<Item>) -> Result<Self> {
        require_kind(&item, HolderKind::Module)?;
        Ok(Self {
            store: AttributeStore::new(Arc::clone(&item)),
            item,
            state: ModuleState::default(),
            charge: None,
        })
    }

    #[must_use]
    pub fn with_state(mut self, state: ModuleState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn set_state(&mut self, state: ModuleState) {
        if self.state != state {
            self.state = state;
            self.store.clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.state >= ModuleState::Active
    }

    pub fn charge(&self) -> Option<&Charge> {
        self.charge.as_ref()
    }

    pub(crate) fn charge_mut(&mut self) -> Option<&mut Charge> {
        self.charge.as_mut()
    }

    /// Load a charge, returning the one it replaces.
    pub fn load_charge(&mut self, charge: Charge) -> Option<Charge> {
        self.store.clear();
        self.charge.replace(charge)
    }

    pub fn unload_charge(&mut self) -> Option<Charge> {
        self.store.clear();
        self.charge.take()
    }

    /// Independent copy keeping state and charge, with empty caches.
    pub fn duplicate(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            state: self.state,
            charge: self.charge.as_ref().map(Charge::duplicate),
            store: self.store.duplicate(),
        }
    }
}

impl Holder for Module {
    fn kind(&self) -> HolderKind {
        HolderKind::Module
    }

    fn item(&self) -> &Arc<Item> {
        &self.item
    }

    fn attributes(&self) -> &AttributeStore {
        &self.store
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.store
    }

    fn calculate_modified_attributes(
        &self,
        scope: &EffectScope<'_>,
        run_time: RunTime,
        force_projected: bool,
        sink: &mut ModifierSink,
    ) -> Result<()> {
        if force_projected {
            if !self.is_active() {
                return Ok(());
            }
            let context = Context::of(ContextTag::Module).with(ContextTag::Projected);
            return run_effects(&self.item, run_time, &context, 1, scope, sink, |effect| {
                effect.is_type(EffectType::Projected)
            });
        }

        let state = self.state;
        run_effects(
            &self.item,
            run_time,
            &Context::of(ContextTag::Module),
            1,
            scope,
            sink,
            |effect| state.runs(effect),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectHandler;

    #[test]
    fn states_gate_effect_types() {
        let online = Effect::new("online", EffectHandler::Noop).with_type(EffectType::Online);
        let active = Effect::new("web", EffectHandler::RemoteWebifier)
            .with_type(EffectType::Active)
            .with_type(EffectType::Projected);
        let overheat =
            Effect::new("overload", EffectHandler::Noop).with_type(EffectType::Overheat);

        assert!(!ModuleState::Offline.runs(&online));
        assert!(ModuleState::Online.runs(&online));
        assert!(!ModuleState::Online.runs(&active));
        assert!(ModuleState::Active.runs(&active));
        assert!(!ModuleState::Active.runs(&overheat));
        assert!(ModuleState::Overheated.runs(&overheat));
    }

    #[test]
    fn rejects_non_module_items() {
        let item = Arc::new(Item::new(587, "Rifter", "Frigate", "Ship"));
        assert!(Module::new(item).is_err());
    }

    #[test]
    fn duplicate_keeps_state_and_charge() {
        let item = Arc::new(Item::new(488, "200mm AutoCannon I", "Projectile Weapon", "Module"));
        let ammo = Arc::new(Item::new(178, "EMP S", "Projectile Ammo", "Charge"));
        let mut module = Module::new(item)
            .expect("module")
            .with_state(ModuleState::Active);
        module.load_charge(Charge::new(ammo).expect("charge"));

        let copy = module.duplicate();
        assert_eq!(copy.state(), ModuleState::Active);
        assert_eq!(copy.charge().map(|c| c.item().id), Some(178));
    }
}
