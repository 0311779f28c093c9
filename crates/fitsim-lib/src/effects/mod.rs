//! Effect handlers and the plumbing they issue modifiers through.
//!
//! Handlers form a closed set ([`EffectHandler`]) resolved once per effect at
//! catalog load time by a [`HandlerRegistry`]. A handler only reads through an
//! [`EffectScope`] and only writes by pushing [`ModifierOp`]s into a
//! [`ModifierSink`]; it never touches an attribute store directly, which keeps
//! re-running a pass free of double application.

pub mod declarative;
pub mod registry;
pub mod scope;
pub mod webifier;

use crate::attributes::ModifierOp;
use crate::catalog::{Context, Effect};
use crate::error::Result;
use crate::fit::HolderRef;

pub use declarative::{ModifierDomain, ModifierInfo};
pub use registry::HandlerRegistry;
pub use scope::EffectScope;

/// Closed set of handler implementations an effect can be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectHandler {
    /// Projected speed reduction driven by the source's `speedFactor`.
    RemoteWebifier,
    /// Catalog-declared modifiers.
    Modifiers(Vec<ModifierInfo>),
    /// Effect with no attribute modifications of its own.
    Noop,
}

impl EffectHandler {
    pub fn label(&self) -> &'static str {
        match self {
            EffectHandler::RemoteWebifier => "remote_webifier",
            EffectHandler::Modifiers(_) => "modifiers",
            EffectHandler::Noop => "noop",
        }
    }

    /// Invoke the handler for `effect` on behalf of `scope.source()`.
    pub fn apply(
        &self,
        effect: &Effect,
        scope: &EffectScope<'_>,
        context: &Context,
        sink: &mut ModifierSink,
    ) -> Result<()> {
        match self {
            EffectHandler::RemoteWebifier => webifier::apply(effect, scope, context, sink),
            EffectHandler::Modifiers(infos) => {
                declarative::apply(infos, effect, scope, context, sink)
            }
            EffectHandler::Noop => Ok(()),
        }
    }
}

/// Modifiers issued by handlers, tagged with the holder they target.
#[derive(Debug, Clone, Default)]
pub struct ModifierSink {
    ops: Vec<(HolderRef, ModifierOp)>,
}

impl ModifierSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: HolderRef, op: ModifierOp) {
        self.ops.push((target, op));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(HolderRef, ModifierOp)> {
        self.ops.iter()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn into_ops(self) -> Vec<(HolderRef, ModifierOp)> {
        self.ops
    }
}
