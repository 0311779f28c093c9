use std::sync::Arc;

use crate::attributes::AttributeStore;
use crate::catalog::{Context, ContextTag, EffectType, Item, RunTime};
use crate::effects::{EffectScope, ModifierSink};
use crate::error::Result;

use super::{require_kind, run_effects, Holder, HolderKind};

/// The hull a fit is built around.
#[derive(Debug, Clone)]
pub struct Ship {
    item: Arc<Item>,
    store: AttributeStore,
}

impl Ship {
    pub fn new(item: Arc<Item>) -> Result<Self> {
        require_kind(&item, HolderKind::Ship)?;
        Ok(Self {
            store: AttributeStore::new(Arc::clone(&item)),
            item,
        })
    }

    /// Independent copy sharing the item, with an empty modified cache.
    pub fn duplicate(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            store: self.store.duplicate(),
        }
    }
}

impl Holder for Ship {
    fn kind(&self) -> HolderKind {
        HolderKind::Ship
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
        run_effects(
            &self.item,
            run_time,
            &Context::of(ContextTag::Ship),
            1,
            scope,
            sink,
            |effect| effect.is_type(EffectType::Passive) && effect.active_by_default,
        )
    }
}
