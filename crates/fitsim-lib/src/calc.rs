//! Calculation passes.
//!
//! A [`CalculationContext`] resolves one holder in one run-time phase:
//!
//! - `Idle -> Collecting`: the holder's effects for the phase are filtered by
//!   context and their handlers push modifiers into a pending sink.
//! - `Collecting -> Applying`: every pending modifier is checked against the
//!   fit, remote resists are read, and the modifiers are folded into their
//!   targets' stores.
//! - `Applying -> Done`.
//!
//! A failure while collecting or validating discards the whole pending set,
//! so no store ever sees part of a failed holder-phase.

use serde::Serialize;
use tracing::debug;

use crate::attributes::ModifierOp;
use crate::catalog::RunTime;
use crate::constants::DEFAULT_REMOTE_RESIST;
use crate::effects::{EffectScope, ModifierSink};
use crate::error::{Error, Result};
use crate::fit::{Fit, HolderRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcState {
    Idle,
    Collecting,
    Applying,
    Done,
}

#[derive(Debug)]
pub struct CalculationContext {
    holder: HolderRef,
    run_time: RunTime,
    force_projected: bool,
    state: CalcState,
    pending: ModifierSink,
}

impl CalculationContext {
    pub fn new(holder: HolderRef, run_time: RunTime, force_projected: bool) -> Self {
        Self {
            holder,
            run_time,
            force_projected,
            state: CalcState::Idle,
            pending: ModifierSink::new(),
        }
    }

    pub fn holder(&self) -> HolderRef {
        self.holder
    }

    pub fn run_time(&self) -> RunTime {
        self.run_time
    }

    pub fn state(&self) -> CalcState {
        self.state
    }

    /// Modifiers collected and not yet applied.
    pub fn pending(&self) -> &ModifierSink {
        &self.pending
    }

    fn expect_state(&self, expected: CalcState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::validation(
                "state",
                format!("{:?}", self.state),
                format!("expected {:?}", expected),
            ))
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.pending.clear();
        self.state = CalcState::Done;
        err
    }

    /// Run the holder's handlers, returning how many modifiers they issued.
    pub fn collect(&mut self, fit: &Fit) -> Result<usize> {
        self.expect_state(CalcState::Idle)?;
        self.state = CalcState::Collecting;

        let Some(holder) = fit.holder(self.holder) else {
            return Err(self.fail(Error::UnknownHolder {
                holder: self.holder,
            }));
        };
        let scope = EffectScope::new(fit, self.holder);
        if let Err(err) = holder.calculate_modified_attributes(
            &scope,
            self.run_time,
            self.force_projected,
            &mut self.pending,
        ) {
            return Err(self.fail(err));
        }

        debug!(
            holder = %self.holder,
            run_time = ?self.run_time,
            projected = self.force_projected,
            pending = self.pending.len(),
            "collected modifiers"
        );
        Ok(self.pending.len())
    }

    /// Fold the collected modifiers into their targets' stores.
    pub fn apply(&mut self, fit: &mut Fit) -> Result<usize> {
        self.expect_state(CalcState::Collecting)?;
        self.state = CalcState::Applying;

        let mut resolved: Vec<(HolderRef, ModifierOp, f64)> =
            Vec::with_capacity(self.pending.len());
        for (target, op) in std::mem::take(&mut self.pending).into_ops() {
            if target.is_from_projected_fit() {
                return Err(self.fail(Error::validation(
                    "target",
                    target,
                    "holders of a projected fit are calculated by that fit",
                )));
            }
            let Some(store) = fit.store(target) else {
                return Err(self.fail(Error::UnknownHolder { holder: target }));
            };
            let resist = if op.remote_resists {
                op.resistance_attribute
                    .as_deref()
                    .and_then(|attribute| store.get(attribute))
                    .unwrap_or(DEFAULT_REMOTE_RESIST)
            } else {
                1.0
            };
            if !op.magnitude.is_finite() || !resist.is_finite() {
                return Err(self.fail(Error::validation(
                    "magnitude",
                    op.magnitude * resist,
                    format!("modifier on {}.{} must be finite", target, op.attribute),
                )));
            }
            resolved.push((target, op, resist));
        }

        for (target, op, resist) in &resolved {
            let store = fit
                .store_mut(*target)
                .ok_or(Error::UnknownHolder { holder: *target })?;
            store.apply(op, *resist)?;
        }

        self.state = CalcState::Done;
        Ok(resolved.len())
    }

    /// Collect then apply.
    pub fn run(&mut self, fit: &mut Fit) -> Result<usize> {
        self.collect(fit)?;
        self.apply(fit)
    }
}

/// Outcome of a full fit recalculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalcReport {
    /// Holder-phase passes that completed.
    pub passes: usize,
    pub modifiers_applied: usize,
    pub failures: Vec<CalcFailure>,
}

impl CalcReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A holder-phase pass that failed and contributed nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcFailure {
    pub holder: HolderRef,
    pub run_time: RunTime,
    pub message: String,
}
