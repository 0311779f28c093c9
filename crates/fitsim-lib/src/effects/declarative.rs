//! Catalog-declared modifiers.
//!
//! Each [`ModifierInfo`] reads one attribute from the source holder and
//! applies it to one attribute on the holders selected by its domain.
//! Modifiers in the `target` domain only fire under a projected context;
//! every other domain only fires outside one.

use serde::{Deserialize, Serialize};

use crate::attributes::{ModifierOp, Operation};
use crate::catalog::{Context, Effect};
use crate::error::Result;

use super::{EffectScope, ModifierSink};

/// Which holders a declared modifier lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierDomain {
    /// The holder running the effect.
    #[serde(rename = "self")]
    Itself,
    /// The fit's ship, or its modules when a group filter is set.
    Ship,
    /// The module a charge is loaded in, or the charge loaded in a module.
    Container,
    /// The ship of the fit an effect is projected onto.
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierInfo {
    pub domain: ModifierDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_group: Option<String>,
    pub operation: Operation,
    /// Attribute read from the source holder.
    pub source: String,
    /// Attribute modified on each target.
    pub target: String,
    #[serde(default)]
    pub stacking_penalties: bool,
}

pub(crate) fn apply(
    infos: &[ModifierInfo],
    effect: &Effect,
    scope: &EffectScope<'_>,
    context: &Context,
    sink: &mut ModifierSink,
) -> Result<()> {
    let projected = context.is_projected();
    for info in infos {
        let remote = info.domain == ModifierDomain::Target;
        if remote != projected {
            continue;
        }

        let value = scope.require_source_attribute(&info.source)?;
        for target in scope.targets(info.domain, info.filter_group.as_deref()) {
            let mut op = ModifierOp::new(info.target.as_str(), info.operation, value)
                .penalized(info.stacking_penalties);
            if remote {
                op = op.remote(effect.resistance_attribute.clone());
            }
            sink.push(target, op);
        }
    }
    Ok(())
}
