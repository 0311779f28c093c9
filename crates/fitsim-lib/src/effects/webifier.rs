//! Remote webification.
//!
//! Fires only under a projected context. Reduces the target ship's
//! `maxVelocity` by the source's `speedFactor` (a percentage), stacking
//! penalised and scaled by the target's resistance attribute.

use crate::attributes::ModifierOp;
use crate::catalog::{Context, Effect};
use crate::constants::{MAX_VELOCITY, SPEED_FACTOR};
use crate::error::Result;
use crate::fit::HolderRef;

use super::{EffectScope, ModifierSink};

pub(crate) fn apply(
    effect: &Effect,
    scope: &EffectScope<'_>,
    context: &Context,
    sink: &mut ModifierSink,
) -> Result<()> {
    if !context.is_projected() {
        return Ok(());
    }

    let speed_factor = scope.require_source_attribute(SPEED_FACTOR)?;
    sink.push(
        HolderRef::Ship,
        ModifierOp::boost(MAX_VELOCITY, speed_factor)
            .penalized(true)
            .remote(effect.resistance_attribute.clone()),
    );
    Ok(())
}
