//! The fit aggregate: a ship plus everything fitted to or projected onto it.
//!
//! A [`Fit`] owns all of its holders. Holders are addressed with
//! [`HolderRef`], a positional reference that stays valid until the
//! collection it points into is changed. Every mutation bumps the fit's
//! generation and clears all stores; [`Fit::recalculate`] rebuilds them when
//! the calculated generation falls behind.
//!
//! Another fit projects onto this one through a [`SharedFit`] handle. The
//! target keeps a weak link to the source plus a copy of the source's
//! projecting holders as last resolved in the source fit, and goes stale
//! whenever the source's generation moves past the one it copied.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::attributes::AttributeStore;
use crate::calc::{CalcFailure, CalcReport, CalculationContext};
use crate::catalog::{EffectType, Item, ItemId, ItemSource, RunTime};
use crate::error::{Error, Result};
use crate::holder::{
    Booster, Charge, Drone, Holder, HolderKind, InvalidBooster, Module, ModuleState,
    RestoredBooster, Ship,
};
use crate::records::{DroneRecord, FitRecord, InvalidReason, ModuleRecord, RestoreIssue};

/// Position of a holder within a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderRef {
    Ship,
    Module(usize),
    /// Charge loaded in the module at this index.
    Charge(usize),
    Drone(usize),
    Booster(usize),
    ProjectedModule(usize),
    ProjectedDrone(usize),
    /// Module of the projected fit at the first index.
    ProjectedFitModule(usize, usize),
    /// Drone of the projected fit at the first index.
    ProjectedFitDrone(usize, usize),
}

impl HolderRef {
    /// Whether this holder projects onto the fit rather than belonging to it.
    pub fn is_projected(self) -> bool {
        matches!(
            self,
            HolderRef::ProjectedModule(_)
                | HolderRef::ProjectedDrone(_)
                | HolderRef::ProjectedFitModule(..)
                | HolderRef::ProjectedFitDrone(..)
        )
    }

    /// Whether the holder's store is owned and calculated by another fit.
    pub fn is_from_projected_fit(self) -> bool {
        matches!(
            self,
            HolderRef::ProjectedFitModule(..) | HolderRef::ProjectedFitDrone(..)
        )
    }
}

impl fmt::Display for HolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolderRef::Ship => write!(f, "ship"),
            HolderRef::Module(i) => write!(f, "module[{i}]"),
            HolderRef::Charge(i) => write!(f, "charge[{i}]"),
            HolderRef::Drone(i) => write!(f, "drone[{i}]"),
            HolderRef::Booster(i) => write!(f, "booster[{i}]"),
            HolderRef::ProjectedModule(i) => write!(f, "projected_module[{i}]"),
            HolderRef::ProjectedDrone(i) => write!(f, "projected_drone[{i}]"),
            HolderRef::ProjectedFitModule(p, i) => write!(f, "projected_fit[{p}].module[{i}]"),
            HolderRef::ProjectedFitDrone(p, i) => write!(f, "projected_fit[{p}].drone[{i}]"),
        }
    }
}

/// A fit other fits can project from.
pub type SharedFit = Arc<RwLock<Fit>>;

/// Projecting holders of another fit, copied with their resolved stores.
#[derive(Debug, Clone)]
struct FitProjection {
    source: Weak<RwLock<Fit>>,
    name: Option<String>,
    /// Source generation the copies were resolved at.
    seen_generation: Option<u64>,
    modules: Vec<Module>,
    drones: Vec<Drone>,
}

impl FitProjection {
    fn new(source: &SharedFit) -> Self {
        Self {
            source: Arc::downgrade(source),
            name: None,
            seen_generation: None,
            modules: Vec::new(),
            drones: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.modules.len() + self.drones.len()
    }

    /// Whether the copies still match the source fit.
    ///
    /// A source that is locked for writing counts as changed.
    fn is_current(&self) -> bool {
        let Some(source) = self.source.upgrade() else {
            return self.len() == 0;
        };
        let Ok(fit) = source.try_read() else {
            return false;
        };
        self.seen_generation == Some(fit.generation)
    }

    /// Recalculate the source and copy its projecting holders again.
    ///
    /// A dropped source leaves nothing behind. A source that cannot be
    /// locked, for instance one that is itself being recalculated, keeps the
    /// previous copies.
    fn refresh(&mut self) {
        let Some(source) = self.source.upgrade() else {
            if self.len() > 0 {
                debug!(
                    source = self.name.as_deref().unwrap_or("<unnamed>"),
                    "projected fit was dropped"
                );
            }
            self.modules.clear();
            self.drones.clear();
            self.seen_generation = None;
            return;
        };
        let Ok(mut fit) = source.try_write() else {
            warn!(
                source = self.name.as_deref().unwrap_or("<unnamed>"),
                "projected fit is locked, keeping its previous holders"
            );
            return;
        };

        fit.recalculate();
        self.name = fit.name.clone();
        self.modules = fit
            .modules
            .iter()
            .filter(|module| module.item().has_effect_type(EffectType::Projected))
            .cloned()
            .collect();
        self.drones = fit
            .drones
            .iter()
            .filter(|drone| drone.item().has_effect_type(EffectType::Projected))
            .cloned()
            .collect();
        self.seen_generation = Some(fit.generation);
    }
}

#[derive(Debug, Clone)]
pub struct Fit {
    name: Option<String>,
    ship: Ship,
    modules: Vec<Module>,
    drones: Vec<Drone>,
    boosters: Vec<Booster>,
    projected_modules: Vec<Module>,
    projected_drones: Vec<Drone>,
    projected_fits: Vec<FitProjection>,
    invalid_boosters: Vec<InvalidBooster>,
    restore_issues: Vec<RestoreIssue>,
    generation: u64,
    calculated_generation: Option<u64>,
    report: CalcReport,
}

impl Fit {
    pub fn new(ship: Ship) -> Self {
        Self {
            name: None,
            ship,
            modules: Vec::new(),
            drones: Vec::new(),
            boosters: Vec::new(),
            projected_modules: Vec::new(),
            projected_drones: Vec::new(),
            projected_fits: Vec::new(),
            invalid_boosters: Vec::new(),
            restore_issues: Vec::new(),
            generation: 0,
            calculated_generation: None,
            report: CalcReport::default(),
        }
    }

    /// Wrap the fit so it can be projected onto others.
    pub fn into_shared(self) -> SharedFit {
        Arc::new(RwLock::new(self))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn drone(&self, index: usize) -> Option<&Drone> {
        self.drones.get(index)
    }

    pub fn boosters(&self) -> &[Booster] {
        &self.boosters
    }

    pub fn booster(&self, index: usize) -> Option<&Booster> {
        self.boosters.get(index)
    }

    pub fn projected_modules(&self) -> &[Module] {
        &self.projected_modules
    }

    pub fn projected_drones(&self) -> &[Drone] {
        &self.projected_drones
    }

    /// Number of other fits projecting onto this one.
    pub fn projected_fit_count(&self) -> usize {
        self.projected_fits.len()
    }

    /// Stored boosters that could not be rebuilt on restore.
    pub fn invalid_boosters(&self) -> &[InvalidBooster] {
        &self.invalid_boosters
    }

    /// Every stored holder left out of this fit on restore.
    pub fn restore_issues(&self) -> &[RestoreIssue] {
        &self.restore_issues
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether stores are behind the fit's current composition or behind a
    /// projected fit that changed since it was last read.
    pub fn is_stale(&self) -> bool {
        self.calculated_generation != Some(self.generation)
            || self.projected_fits.iter().any(|p| !p.is_current())
    }

    /// Report from the most recent recalculation.
    pub fn last_report(&self) -> &CalcReport {
        &self.report
    }

    pub fn holder(&self, holder: HolderRef) -> Option<&dyn Holder> {
        match holder {
            HolderRef::Ship => Some(&self.ship as &dyn Holder),
            HolderRef::Module(i) => self.modules.get(i).map(|h| h as &dyn Holder),
            HolderRef::Charge(i) => self
                .modules
                .get(i)
                .and_then(Module::charge)
                .map(|h| h as &dyn Holder),
            HolderRef::Drone(i) => self.drones.get(i).map(|h| h as &dyn Holder),
            HolderRef::Booster(i) => self.boosters.get(i).map(|h| h as &dyn Holder),
            HolderRef::ProjectedModule(i) => {
                self.projected_modules.get(i).map(|h| h as &dyn Holder)
            }
            HolderRef::ProjectedDrone(i) => self.projected_drones.get(i).map(|h| h as &dyn Holder),
            HolderRef::ProjectedFitModule(p, i) => self
                .projected_fits
                .get(p)
                .and_then(|projection| projection.modules.get(i))
                .map(|h| h as &dyn Holder),
            HolderRef::ProjectedFitDrone(p, i) => self
                .projected_fits
                .get(p)
                .and_then(|projection| projection.drones.get(i))
                .map(|h| h as &dyn Holder),
        }
    }

    fn holder_mut(&mut self, holder: HolderRef) -> Option<&mut dyn Holder> {
        match holder {
            HolderRef::Ship => Some(&mut self.ship as &mut dyn Holder),
            HolderRef::Module(i) => self.modules.get_mut(i).map(|h| h as &mut dyn Holder),
            HolderRef::Charge(i) => self
                .modules
                .get_mut(i)
                .and_then(Module::charge_mut)
                .map(|h| h as &mut dyn Holder),
            HolderRef::Drone(i) => self.drones.get_mut(i).map(|h| h as &mut dyn Holder),
            HolderRef::Booster(i) => self.boosters.get_mut(i).map(|h| h as &mut dyn Holder),
            HolderRef::ProjectedModule(i) => self
                .projected_modules
                .get_mut(i)
                .map(|h| h as &mut dyn Holder),
            HolderRef::ProjectedDrone(i) => self
                .projected_drones
                .get_mut(i)
                .map(|h| h as &mut dyn Holder),
            // stores resolved by the projecting fit are read-only here
            HolderRef::ProjectedFitModule(..) | HolderRef::ProjectedFitDrone(..) => None,
        }
    }

    pub fn store(&self, holder: HolderRef) -> Option<&AttributeStore> {
        self.holder(holder).map(Holder::attributes)
    }

    pub(crate) fn store_mut(&mut self, holder: HolderRef) -> Option<&mut AttributeStore> {
        self.holder_mut(holder).map(|h| h.attributes_mut())
    }

    /// Every holder in calculation order: ship, modules, charges, drones,
    /// boosters, projected sources, then holders of projected fits.
    pub fn holder_refs(&self) -> Vec<HolderRef> {
        let mut refs = vec![HolderRef::Ship];
        refs.extend((0..self.modules.len()).map(HolderRef::Module));
        refs.extend(
            self.modules
                .iter()
                .enumerate()
                .filter(|(_, module)| module.charge().is_some())
                .map(|(i, _)| HolderRef::Charge(i)),
        );
        refs.extend((0..self.drones.len()).map(HolderRef::Drone));
        refs.extend((0..self.boosters.len()).map(HolderRef::Booster));
        refs.extend((0..self.projected_modules.len()).map(HolderRef::ProjectedModule));
        refs.extend((0..self.projected_drones.len()).map(HolderRef::ProjectedDrone));
        for (p, projection) in self.projected_fits.iter().enumerate() {
            refs.extend(
                (0..projection.modules.len()).map(|i| HolderRef::ProjectedFitModule(p, i)),
            );
            refs.extend((0..projection.drones.len()).map(|i| HolderRef::ProjectedFitDrone(p, i)));
        }
        refs
    }

    /// Fitted modules whose item belongs to `group`.
    pub fn module_refs_in_group(&self, group: &str) -> Vec<HolderRef> {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, module)| module.item().group.name == group)
            .map(|(i, _)| HolderRef::Module(i))
            .collect()
    }

    /// Mark every store stale after a composition change.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.clear_stores();
    }

    fn clear_stores(&mut self) {
        for holder in self.holder_refs() {
            if let Some(store) = self.store_mut(holder) {
                store.clear();
            }
        }
    }

    pub fn add_module(&mut self, module: Module) -> HolderRef {
        self.modules.push(module);
        self.invalidate();
        HolderRef::Module(self.modules.len() - 1)
    }

    pub fn remove_module(&mut self, index: usize) -> Result<Module> {
        self.check(HolderRef::Module(index))?;
        let module = self.modules.remove(index);
        self.invalidate();
        Ok(module)
    }

    pub fn set_module_state(&mut self, index: usize, state: ModuleState) -> Result<()> {
        self.module_mut(index)?.set_state(state);
        self.invalidate();
        Ok(())
    }

    /// Load a charge into a fitted module, returning any charge it replaces.
    pub fn load_charge(&mut self, index: usize, charge: Charge) -> Result<Option<Charge>> {
        let previous = self.module_mut(index)?.load_charge(charge);
        self.invalidate();
        Ok(previous)
    }

    pub fn unload_charge(&mut self, index: usize) -> Result<Option<Charge>> {
        let previous = self.module_mut(index)?.unload_charge();
        self.invalidate();
        Ok(previous)
    }

    pub fn add_drone(&mut self, drone: Drone) -> HolderRef {
        self.drones.push(drone);
        self.invalidate();
        HolderRef::Drone(self.drones.len() - 1)
    }

    pub fn remove_drone(&mut self, index: usize) -> Result<Drone> {
        self.check(HolderRef::Drone(index))?;
        let drone = self.drones.remove(index);
        self.invalidate();
        Ok(drone)
    }

    pub fn set_drone_active(&mut self, index: usize, active: bool) -> Result<()> {
        self.drones
            .get_mut(index)
            .ok_or(Error::UnknownHolder {
                holder: HolderRef::Drone(index),
            })?
            .set_active(active);
        self.invalidate();
        Ok(())
    }

    /// Fit a booster, rejecting a second booster in an occupied slot.
    pub fn add_booster(&mut self, booster: Booster) -> Result<HolderRef> {
        if let Some(existing) = self.boosters.iter().find(|b| b.slot() == booster.slot()) {
            return Err(Error::validation(
                "slot",
                booster.slot(),
                format!("already occupied by {}", existing.item().name),
            ));
        }
        self.boosters.push(booster);
        self.invalidate();
        Ok(HolderRef::Booster(self.boosters.len() - 1))
    }

    pub fn remove_booster(&mut self, index: usize) -> Result<Booster> {
        self.check(HolderRef::Booster(index))?;
        let booster = self.boosters.remove(index);
        self.invalidate();
        Ok(booster)
    }

    /// Toggle a booster. Its own cache and the ship's are dropped with the
    /// rest of the fit's.
    pub fn set_booster_active(&mut self, index: usize, active: bool) -> Result<()> {
        self.boosters
            .get_mut(index)
            .ok_or(Error::UnknownHolder {
                holder: HolderRef::Booster(index),
            })?
            .set_active(active);
        self.ship.clear();
        self.invalidate();
        Ok(())
    }

    pub fn add_projected_module(&mut self, module: Module) -> HolderRef {
        self.projected_modules.push(module);
        self.invalidate();
        HolderRef::ProjectedModule(self.projected_modules.len() - 1)
    }

    pub fn add_projected_drone(&mut self, drone: Drone) -> HolderRef {
        self.projected_drones.push(drone);
        self.invalidate();
        HolderRef::ProjectedDrone(self.projected_drones.len() - 1)
    }

    pub fn remove_projected_module(&mut self, index: usize) -> Result<Module> {
        self.check(HolderRef::ProjectedModule(index))?;
        let module = self.projected_modules.remove(index);
        self.invalidate();
        Ok(module)
    }

    pub fn remove_projected_drone(&mut self, index: usize) -> Result<Drone> {
        self.check(HolderRef::ProjectedDrone(index))?;
        let drone = self.projected_drones.remove(index);
        self.invalidate();
        Ok(drone)
    }

    /// Drop every projected holder and projected fit.
    pub fn clear_projected(&mut self) {
        self.projected_modules.clear();
        self.projected_drones.clear();
        self.projected_fits.clear();
        self.invalidate();
    }

    /// Project every module and drone of `source` that can project onto
    /// this fit, returning how many it currently has.
    ///
    /// The holders run with the values `source` resolves for them, and this
    /// fit recalculates whenever `source` changes. Only a weak link is kept:
    /// once `source` is dropped its holders stop projecting.
    pub fn project_fit(&mut self, source: &SharedFit) -> usize {
        let mut projection = FitProjection::new(source);
        projection.refresh();
        let projected = projection.len();
        debug!(
            source = projection.name.as_deref().unwrap_or("<unnamed>"),
            projected, "projected fit"
        );
        self.projected_fits.push(projection);
        self.invalidate();
        projected
    }

    pub fn remove_projected_fit(&mut self, index: usize) -> Result<()> {
        if index >= self.projected_fits.len() {
            return Err(Error::validation(
                "projected_fit",
                index,
                format!("fit has {} projected fits", self.projected_fits.len()),
            ));
        }
        self.projected_fits.remove(index);
        self.invalidate();
        Ok(())
    }

    pub fn set_override(&mut self, holder: HolderRef, name: &str, value: f64) -> Result<()> {
        self.store_mut(holder)
            .ok_or(Error::UnknownHolder { holder })?
            .set_override(name, value)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_override(&mut self, holder: HolderRef, name: &str) -> Result<Option<f64>> {
        let removed = self
            .store_mut(holder)
            .ok_or(Error::UnknownHolder { holder })?
            .remove_override(name);
        self.invalidate();
        Ok(removed)
    }

    fn check(&self, holder: HolderRef) -> Result<()> {
        match self.holder(holder) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownHolder { holder }),
        }
    }

    fn module_mut(&mut self, index: usize) -> Result<&mut Module> {
        self.modules.get_mut(index).ok_or(Error::UnknownHolder {
            holder: HolderRef::Module(index),
        })
    }

    /// Run one phase for one holder on top of what the stores already hold.
    ///
    /// [`Fit::recalculate`] is the idempotent entry point; this exists for
    /// callers driving phases themselves.
    pub fn calculate_holder(
        &mut self,
        holder: HolderRef,
        run_time: RunTime,
        force_projected: bool,
    ) -> Result<usize> {
        CalculationContext::new(holder, run_time, force_projected).run(self)
    }

    /// Rebuild every store if the fit changed since the last calculation.
    ///
    /// A failing holder-phase is recorded in the report and skipped; it
    /// leaves no modifiers behind in any store.
    pub fn recalculate(&mut self) -> &CalcReport {
        if !self.is_stale() {
            return &self.report;
        }
        debug!(
            fit = self.name().unwrap_or("<unnamed>"),
            generation = self.generation,
            "recalculating fit"
        );

        for projection in &mut self.projected_fits {
            projection.refresh();
        }
        self.clear_stores();
        let mut report = CalcReport::default();
        let order = self.holder_refs();
        for run_time in RunTime::ALL {
            for holder in &order {
                match self.calculate_holder(*holder, run_time, holder.is_projected()) {
                    Ok(applied) => {
                        report.passes += 1;
                        report.modifiers_applied += applied;
                    }
                    Err(err) => {
                        warn!(
                            holder = %holder,
                            run_time = ?run_time,
                            error = %err,
                            "calculation pass failed"
                        );
                        report.failures.push(CalcFailure {
                            holder: *holder,
                            run_time,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        for holder in &order {
            if let Some(store) = self.store_mut(*holder) {
                store.resolve_all();
            }
        }
        self.calculated_generation = Some(self.generation);
        self.report = report;
        &self.report
    }

    /// Modified value of `name` on `holder`, recalculating first if stale.
    pub fn attribute(&mut self, holder: HolderRef, name: &str) -> Result<Option<f64>> {
        self.recalculate();
        let store = self.store(holder).ok_or(Error::UnknownHolder { holder })?;
        Ok(store.get(name))
    }

    /// Rebuild a fit from storage.
    ///
    /// The ship must resolve; any other holder whose item is missing or
    /// misclassified is logged, left out, and listed in
    /// [`Fit::restore_issues`].
    pub fn restore<S: ItemSource + ?Sized>(record: &FitRecord, source: &S) -> Result<Self> {
        let ship_item = source.get_item(record.ship).ok_or(Error::UnknownItem {
            item_id: record.ship,
        })?;
        let mut fit = Fit::new(Ship::new(ship_item)?);
        fit.name = record.name.clone();
        let mut issues = Vec::new();

        for module in &record.modules {
            if let Some(module) = restore_module(module, source, &mut issues) {
                fit.modules.push(module);
            }
        }
        for drone in &record.drones {
            if let Some(drone) = restore_drone(drone, source, &mut issues) {
                fit.drones.push(drone);
            }
        }
        for stored in &record.boosters {
            match Booster::restore(stored, source) {
                RestoredBooster::Valid(booster) => {
                    if fit.boosters.iter().any(|b| b.slot() == booster.slot()) {
                        error!(
                            item_id = stored.item_id,
                            slot = booster.slot(),
                            "booster slot already occupied"
                        );
                        let reason = InvalidReason::Unusable {
                            message: format!("slot {} already occupied", booster.slot()),
                        };
                        issues.push(RestoreIssue {
                            kind: HolderKind::Booster,
                            item_id: stored.item_id,
                            reason: reason.clone(),
                        });
                        fit.invalid_boosters.push(InvalidBooster {
                            record: stored.clone(),
                            reason,
                        });
                    } else {
                        fit.boosters.push(booster);
                    }
                }
                RestoredBooster::Invalid(invalid) => {
                    issues.push(RestoreIssue {
                        kind: HolderKind::Booster,
                        item_id: invalid.record.item_id,
                        reason: invalid.reason.clone(),
                    });
                    fit.invalid_boosters.push(invalid);
                }
            }
        }
        for module in &record.projected_modules {
            if let Some(module) = restore_module(module, source, &mut issues) {
                fit.projected_modules.push(module);
            }
        }
        for drone in &record.projected_drones {
            if let Some(drone) = restore_drone(drone, source, &mut issues) {
                fit.projected_drones.push(drone);
            }
        }

        fit.restore_issues = issues;
        fit.invalidate();
        Ok(fit)
    }

    /// Configuration record for storage. Invalid boosters are carried over
    /// unchanged; projected fits are not stored.
    pub fn to_record(&self) -> FitRecord {
        FitRecord {
            name: self.name.clone(),
            ship: self.ship.item().id,
            modules: self.modules.iter().map(module_record).collect(),
            drones: self.drones.iter().map(drone_record).collect(),
            boosters: self
                .boosters
                .iter()
                .map(Booster::to_record)
                .chain(self.invalid_boosters.iter().map(|b| b.record.clone()))
                .collect(),
            projected_modules: self.projected_modules.iter().map(module_record).collect(),
            projected_drones: self.projected_drones.iter().map(drone_record).collect(),
        }
    }
}

fn module_record(module: &Module) -> ModuleRecord {
    ModuleRecord {
        item_id: module.item().id,
        state: module.state(),
        charge: module.charge().map(|charge| charge.item().id),
    }
}

fn drone_record(drone: &Drone) -> DroneRecord {
    DroneRecord {
        item_id: drone.item().id,
        amount: drone.amount(),
        amount_active: drone.amount_active(),
    }
}

/// Resolve a stored item of the given kind, recording why it failed.
fn resolve_item<S: ItemSource + ?Sized>(
    item_id: ItemId,
    kind: HolderKind,
    source: &S,
    issues: &mut Vec<RestoreIssue>,
) -> Option<Arc<Item>> {
    let reason = match source.get_item(item_id) {
        Some(item) if kind.accepts(&item) => return Some(item),
        Some(_) => {
            error!(item_id, kind = %kind, "stored item has the wrong classification");
            InvalidReason::WrongClassification { expected: kind }
        }
        None => {
            error!(item_id, kind = %kind, "stored item does not exist");
            InvalidReason::MissingItem
        }
    };
    issues.push(RestoreIssue {
        kind,
        item_id,
        reason,
    });
    None
}

fn restore_module<S: ItemSource + ?Sized>(
    record: &ModuleRecord,
    source: &S,
    issues: &mut Vec<RestoreIssue>,
) -> Option<Module> {
    let item = resolve_item(record.item_id, HolderKind::Module, source, issues)?;
    let mut module = Module::new(item).ok()?.with_state(record.state);
    if let Some(charge_id) = record.charge {
        if let Some(item) = resolve_item(charge_id, HolderKind::Charge, source, issues) {
            if let Ok(charge) = Charge::new(item) {
                module.load_charge(charge);
            }
        }
    }
    Some(module)
}

fn restore_drone<S: ItemSource + ?Sized>(
    record: &DroneRecord,
    source: &S,
    issues: &mut Vec<RestoreIssue>,
) -> Option<Drone> {
    let item = resolve_item(record.item_id, HolderKind::Drone, source, issues)?;
    match Drone::with_amounts(item, record.amount, record.amount_active) {
        Ok(drone) => Some(drone),
        Err(err) => {
            error!(item_id = record.item_id, error = %err, "stored drone stack is invalid");
            issues.push(RestoreIssue {
                kind: HolderKind::Drone,
                item_id: record.item_id,
                reason: InvalidReason::Unusable {
                    message: err.to_string(),
                },
            });
            None
        }
    }
}
