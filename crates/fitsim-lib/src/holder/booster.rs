//! Boosters.
//!
//! A booster must be built from an item in the `Booster` group. Its slot is
//! read once from the item's `boosterness` attribute and never changes.
//! While active, its passive and side effects with `active_by_default`
//! apply to the fit; boosters never project.

use std::sync::Arc;

use tracing::error;

use crate::attributes::AttributeStore;
use crate::catalog::{Context, ContextTag, EffectType, Item, ItemSource, RunTime};
use crate::constants::{BOOSTERNESS, BOOSTER_SLOT_MAX, BOOSTER_SLOT_MIN};
use crate::effects::{EffectScope, ModifierSink};
use crate::error::{Error, Result};
use crate::records::{BoosterRecord, InvalidReason};

use super::{require_kind, run_effects, Holder, HolderKind};

#[derive(Debug, Clone)]
pub struct Booster {
    record_id: Option<i64>,
    item: Arc<Item>,
    slot: u8,
    active: bool,
    store: AttributeStore,
}

/// Outcome of rebuilding a booster from storage.
#[derive(Debug, Clone)]
pub enum RestoredBooster {
    Valid(Booster),
    Invalid(InvalidBooster),
}

impl RestoredBooster {
    pub fn is_invalid(&self) -> bool {
        matches!(self, RestoredBooster::Invalid(_))
    }
}

/// Stored booster whose item is gone or no longer a booster.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidBooster {
    pub record: BoosterRecord,
    pub reason: InvalidReason,
}

impl Booster {
    /// Build an active booster, rejecting items that are not boosters.
    pub fn new(item: Arc<Item>) -> Result<Self> {
        require_kind(&item, HolderKind::Booster)?;
        let slot = Self::calculate_slot(&item)?;
        Ok(Self {
            record_id: None,
            store: AttributeStore::new(Arc::clone(&item)),
            item,
            slot,
            active: true,
        })
    }

    /// Rebuild a booster from a stored record.
    ///
    /// Lookup and classification failures are logged and returned as
    /// [`RestoredBooster::Invalid`] so bulk loads can continue.
    pub fn restore<S: ItemSource + ?Sized>(record: &BoosterRecord, source: &S) -> RestoredBooster {
        let invalid = |reason| {
            RestoredBooster::Invalid(InvalidBooster {
                record: record.clone(),
                reason,
            })
        };

        let Some(item) = source.get_item(record.item_id) else {
            error!(item_id = record.item_id, "item does not exist");
            return invalid(InvalidReason::MissingItem);
        };
        if !HolderKind::Booster.accepts(&item) {
            error!(item_id = record.item_id, "item is not a booster");
            return invalid(InvalidReason::WrongClassification {
                expected: HolderKind::Booster,
            });
        }

        match Self::new(item) {
            Ok(mut booster) => {
                if let Some(id) = record.id {
                    if let Err(err) = booster.set_record_id(id) {
                        error!(
                            item_id = record.item_id,
                            error = %err,
                            "stored booster id is invalid"
                        );
                        return invalid(InvalidReason::Unusable {
                            message: err.to_string(),
                        });
                    }
                }
                booster.active = record.active;
                RestoredBooster::Valid(booster)
            }
            Err(err) => {
                error!(item_id = record.item_id, error = %err, "booster could not be rebuilt");
                invalid(InvalidReason::Unusable {
                    message: err.to_string(),
                })
            }
        }
    }

    fn calculate_slot(item: &Item) -> Result<u8> {
        let value = item
            .attribute(BOOSTERNESS)
            .ok_or_else(|| Error::MissingAttribute {
                item_id: item.id,
                attribute: BOOSTERNESS.to_string(),
            })?;
        let in_range = value.fract() == 0.0
            && value >= f64::from(BOOSTER_SLOT_MIN)
            && value <= f64::from(BOOSTER_SLOT_MAX);
        if !in_range {
            return Err(Error::validation(
                "slot",
                value,
                format!(
                    "booster slot must be an integer in {BOOSTER_SLOT_MIN}..={BOOSTER_SLOT_MAX}"
                ),
            ));
        }
        Ok(value as u8)
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggle the booster, dropping its cached values when the flag changes.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.store.clear();
        }
    }

    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    pub fn set_record_id(&mut self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::validation("id", id, "record ids are positive"));
        }
        self.record_id = Some(id);
        Ok(())
    }

    /// Independent copy carrying the activation flag, with an empty cache
    /// and no storage identity.
    pub fn duplicate(&self) -> Self {
        Self {
            record_id: None,
            item: Arc::clone(&self.item),
            slot: self.slot,
            active: self.active,
            store: self.store.duplicate(),
        }
    }

    pub fn to_record(&self) -> BoosterRecord {
        BoosterRecord {
            id: self.record_id,
            item_id: self.item.id,
            active: self.active,
        }
    }
}

impl Holder for Booster {
    fn kind(&self) -> HolderKind {
        HolderKind::Booster
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
        if force_projected || !self.active {
            return Ok(());
        }
        run_effects(
            &self.item,
            run_time,
            &Context::of(ContextTag::Booster),
            1,
            scope,
            sink,
            |effect| {
                (effect.is_type(EffectType::Passive)
                    || effect.is_type(EffectType::BoosterSideEffect))
                    && effect.active_by_default
            },
        )
    }
}
