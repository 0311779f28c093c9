use std::sync::Arc;

use crate::attributes::AttributeStore;
use crate::catalog::{Context, ContextTag, EffectType, Item, RunTime};
use crate::effects::{EffectScope, ModifierSink};
use crate::error::{Error, Result};

use super::{require_kind, run_effects, Holder, HolderKind};

/// Stack of identical drones.
///
/// When projected, each active drone in the stack applies its projected
/// effects separately, so the stack competes with itself for stacking
/// penalties.
#[derive(Debug, Clone)]
pub struct Drone {
    item: Arc<Item>,
    amount: u32,
    amount_active: u32,
    store: AttributeStore,
}

impl Drone {
    /// Single inactive drone.
    pub fn new(item: Arc<Item>) -> Result<Self> {
        require_kind(&item, HolderKind::Drone)?;
        Ok(Self {
            store: AttributeStore::new(Arc::clone(&item)),
            item,
            amount: 1,
            amount_active: 0,
        })
    }

    /// Stack of `amount` drones, `amount_active` of them launched.
    pub fn with_amounts(item: Arc<Item>, amount: u32, amount_active: u32) -> Result<Self> {
        let mut drone = Self::new(item)?;
        drone.set_amount(amount)?;
        drone.set_amount_active(amount_active)?;
        Ok(drone)
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn amount_active(&self) -> u32 {
        self.amount_active
    }

    pub fn set_amount(&mut self, amount: u32) -> Result<()> {
        if amount == 0 {
            return Err(Error::validation(
                "amount",
                amount,
                "a drone stack holds at least one drone",
            ));
        }
        self.amount = amount;
        self.amount_active = self.amount_active.min(amount);
        self.store.clear();
        Ok(())
    }

    pub fn set_amount_active(&mut self, amount_active: u32) -> Result<()> {
        if amount_active > self.amount {
            return Err(Error::validation(
                "amount_active",
                amount_active,
                format!("cannot exceed stack size {}", self.amount),
            ));
        }
        self.amount_active = amount_active;
        self.store.clear();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.amount_active > 0
    }

    /// Launch or recall the whole stack.
    pub fn set_active(&mut self, active: bool) {
        self.amount_active = if active { self.amount } else { 0 };
        self.store.clear();
    }

    /// Independent copy keeping amounts, with an empty modified cache.
    pub fn duplicate(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            amount: self.amount,
            amount_active: self.amount_active,
            store: self.store.duplicate(),
        }
    }
}

impl Holder for Drone {
    fn kind(&self) -> HolderKind {
        HolderKind::Drone
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
            let context = Context::of(ContextTag::Drone).with(ContextTag::Projected);
            return run_effects(
                &self.item,
                run_time,
                &context,
                self.amount_active,
                scope,
                sink,
                |effect| effect.is_type(EffectType::Projected),
            );
        }

        let active = self.is_active();
        run_effects(
            &self.item,
            run_time,
            &Context::of(ContextTag::Drone),
            1,
            scope,
            sink,
            |effect| {
                effect.active_by_default
                    && (effect.is_type(EffectType::Passive)
                        || (active && effect.is_type(EffectType::Active)))
            },
        )
    }
}
