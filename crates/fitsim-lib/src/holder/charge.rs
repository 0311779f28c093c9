use std::sync::Arc;

use crate::attributes::AttributeStore;
use crate::catalog::{Context, ContextTag, EffectType, Item, RunTime};
use crate::effects::{EffectScope, ModifierSink};
use crate::error::Result;
use crate::fit::HolderRef;

use super::{require_kind, run_effects, Holder, HolderKind, ModuleState};

/// Charge loaded in a module.
#[derive(Debug, Clone)]
pub struct Charge {
    item: Arc<Item>,
    store: AttributeStore,
}

impl Charge {
    pub fn new(item: Arc<Item>) -> Result<Self> {
        require_kind(&item, HolderKind::Charge)?;
        Ok(Self {
            store: AttributeStore::new(Arc::clone(&item)),
            item,
        })
    }

    pub fn duplicate(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            store: self.store.duplicate(),
        }
    }
}

impl Holder for Charge {
    fn kind(&self) -> HolderKind {
        HolderKind::Charge
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
            return Ok(());
        }
        let container_state = match scope.source() {
            HolderRef::Charge(index) => scope
                .fit()
                .module(index)
                .map_or(ModuleState::Offline, |module| module.state()),
            _ => ModuleState::Offline,
        };
        run_effects(
            &self.item,
            run_time,
            &Context::of(ContextTag::Charge),
            1,
            scope,
            sink,
            |effect| {
                effect.active_by_default
                    && (effect.is_type(EffectType::Passive)
                        || (effect.is_type(EffectType::Active)
                            && container_state >= ModuleState::Active))
            },
        )
    }
}
