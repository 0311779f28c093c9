//! Effects, run-time phases, and the context tags that gate them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effects::EffectHandler;

/// Ordering phase an effect's modifiers are applied in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum RunTime {
    Early,
    #[default]
    Normal,
    Late,
}

impl RunTime {
    /// Every phase in resolution order.
    pub const ALL: [RunTime; 3] = [RunTime::Early, RunTime::Normal, RunTime::Late];
}

/// Context tag an effect declares itself valid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectType {
    Passive,
    Active,
    Online,
    Overheat,
    Projected,
    BoosterSideEffect,
}

/// Tag describing the situation a handler is being invoked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextTag {
    Ship,
    Module,
    Drone,
    Booster,
    Charge,
    Projected,
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContextTag::Ship => "ship",
            ContextTag::Module => "module",
            ContextTag::Drone => "drone",
            ContextTag::Booster => "booster",
            ContextTag::Charge => "charge",
            ContextTag::Projected => "projected",
        };
        f.write_str(label)
    }
}

/// Set of context tags passed to an effect handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context(BTreeSet<ContextTag>);

impl Context {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(tag: ContextTag) -> Self {
        Self(BTreeSet::from([tag]))
    }

    #[must_use]
    pub fn with(mut self, tag: ContextTag) -> Self {
        self.0.insert(tag);
        self
    }

    pub fn contains(&self, tag: ContextTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_projected(&self) -> bool {
        self.contains(ContextTag::Projected)
    }

    pub fn iter(&self) -> impl Iterator<Item = ContextTag> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self.iter().map(|tag| tag.to_string()).collect();
        write!(f, "{{{}}}", tags.join(", "))
    }
}

/// Named rule that applies modifiers when its context allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub name: String,
    pub run_time: RunTime,
    pub types: BTreeSet<EffectType>,
    pub active_by_default: bool,
    /// Attribute on the target holder that scales remote-resisted modifiers.
    pub resistance_attribute: Option<String>,
    pub handler: EffectHandler,
}

impl Effect {
    pub fn new(name: impl Into<String>, handler: EffectHandler) -> Self {
        Self {
            name: name.into(),
            run_time: RunTime::Normal,
            types: BTreeSet::new(),
            active_by_default: true,
            resistance_attribute: None,
            handler,
        }
    }

    #[must_use]
    pub fn with_run_time(mut self, run_time: RunTime) -> Self {
        self.run_time = run_time;
        self
    }

    #[must_use]
    pub fn with_type(mut self, effect_type: EffectType) -> Self {
        self.types.insert(effect_type);
        self
    }

    #[must_use]
    pub fn with_resistance(mut self, attribute: impl Into<String>) -> Self {
        self.resistance_attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn inactive_by_default(mut self) -> Self {
        self.active_by_default = false;
        self
    }

    pub fn is_type(&self, effect_type: EffectType) -> bool {
        self.types.contains(&effect_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_times_order_early_to_late() {
        let mut phases = vec![RunTime::Late, RunTime::Early, RunTime::Normal];
        phases.sort();
        assert_eq!(phases, RunTime::ALL.to_vec());
    }

    #[test]
    fn context_display_lists_tags() {
        let context = Context::of(ContextTag::Drone).with(ContextTag::Projected);
        assert!(context.is_projected());
        assert_eq!(context.to_string(), "{drone, projected}");
        assert!(!Context::empty().is_projected());
    }
}
