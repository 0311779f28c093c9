//! Per-holder attribute store.
//!
//! An [`AttributeStore`] holds a read-only view of its item's base values,
//! administrative overrides, the modifiers accumulated during the current
//! calculation pass, and a cache of resolved values. The cache carries a
//! generation: [`AttributeStore::clear`] bumps it, and
//! [`AttributeStore::resolve_all`] stamps the cache with the generation it
//! was built for.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::catalog::Item;
use crate::error::{Error, Result};

use super::modifier::{ModifierOp, Operation};
use super::stacking::{penalized_product, penalized_sum};

#[derive(Debug, Clone, Default)]
struct AttributeModifiers {
    adds: Vec<f64>,
    penalized_adds: Vec<f64>,
    multipliers: Vec<f64>,
    penalized_multipliers: Vec<f64>,
    assigns: Vec<f64>,
    limits: Vec<f64>,
}

impl AttributeModifiers {
    fn push(&mut self, operation: Operation, magnitude: f64, penalized: bool) {
        match (operation, penalized) {
            (Operation::Add, false) => self.adds.push(magnitude),
            (Operation::Add, true) => self.penalized_adds.push(magnitude),
            (Operation::PostPercent | Operation::Multiply, _) => {
                let multiplier = match operation {
                    Operation::PostPercent => 1.0 + magnitude / 100.0,
                    _ => magnitude,
                };
                if penalized {
                    self.penalized_multipliers.push(multiplier);
                } else {
                    self.multipliers.push(multiplier);
                }
            }
            (Operation::Assign, _) => self.assigns.push(magnitude),
            (Operation::Limit, _) => self.limits.push(magnitude),
        }
    }

    fn len(&self) -> usize {
        self.adds.len()
            + self.penalized_adds.len()
            + self.multipliers.len()
            + self.penalized_multipliers.len()
            + self.assigns.len()
            + self.limits.len()
    }

    fn resolve(&self, base: f64) -> f64 {
        if let Some(assigned) = self.assigns.iter().copied().max_by(f64::total_cmp) {
            return assigned;
        }

        let adds = sorted(&self.adds).iter().sum::<f64>() + penalized_sum(&self.penalized_adds);
        let multiplier = sorted(&self.multipliers).iter().product::<f64>()
            * penalized_product(&self.penalized_multipliers);
        let value = (base + adds) * multiplier;

        match self.limits.iter().copied().min_by(f64::total_cmp) {
            Some(ceiling) => value.min(ceiling),
            None => value,
        }
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut values = values.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Original, overridden, and modified attribute values for one holder.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    item: Arc<Item>,
    overrides: BTreeMap<String, f64>,
    modifiers: HashMap<String, AttributeModifiers>,
    modified: HashMap<String, f64>,
    generation: u64,
    resolved_generation: Option<u64>,
}

impl AttributeStore {
    pub fn new(item: Arc<Item>) -> Self {
        Self {
            item,
            overrides: BTreeMap::new(),
            modifiers: HashMap::new(),
            modified: HashMap::new(),
            generation: 0,
            resolved_generation: None,
        }
    }

    /// Fresh store over the same item, keeping overrides but no modifiers.
    pub fn duplicate(&self) -> Self {
        Self {
            overrides: self.overrides.clone(),
            ..Self::new(Arc::clone(&self.item))
        }
    }

    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }

    /// Base value from the item, falling back to the attribute's default.
    pub fn original(&self, name: &str) -> Option<f64> {
        self.item
            .attribute(name)
            .or_else(|| self.item.attribute_def(name).and_then(|def| def.default))
    }

    /// Modified value of `name`.
    ///
    /// Overrides win; otherwise the cached value is returned, or the value is
    /// resolved from the modifiers accumulated so far without caching it.
    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some(value) = self.overrides.get(name) {
            return Some(*value);
        }
        if let Some(value) = self.modified.get(name) {
            return Some(*value);
        }
        self.compute(name)
    }

    fn compute(&self, name: &str) -> Option<f64> {
        let modifiers = self.modifiers.get(name);
        let base = match (self.original(name), modifiers) {
            (Some(base), _) => base,
            (None, Some(_)) => 0.0,
            (None, None) => return None,
        };
        let value = modifiers.map_or(base, |m| m.resolve(base));
        Some(match self.item.attribute_def(name) {
            Some(def) => def.bound(value),
            None => value,
        })
    }

    /// Fold a modifier into the pending set for its attribute.
    ///
    /// `resist` scales the op's strength and is `1.0` for anything that is
    /// not remote-resisted.
    pub fn apply(&mut self, op: &ModifierOp, resist: f64) -> Result<()> {
        if !op.magnitude.is_finite() {
            return Err(Error::validation(
                "magnitude",
                op.magnitude,
                format!("modifier on {} must be finite", op.attribute),
            ));
        }
        if !resist.is_finite() {
            return Err(Error::validation(
                "resist",
                resist,
                format!("resistance for {} must be finite", op.attribute),
            ));
        }

        let magnitude = op.resisted(resist);
        let penalized = op.stacking_penalties && op.operation.is_penalizable();
        self.modifiers
            .entry(op.attribute.clone())
            .or_default()
            .push(op.operation, magnitude, penalized);
        self.modified.remove(&op.attribute);
        self.resolved_generation = None;
        Ok(())
    }

    /// Resolve every known attribute into the cache.
    pub fn resolve_all(&mut self) {
        for name in self.names() {
            if let Some(value) = self.compute(&name) {
                self.modified.insert(name, value);
            }
        }
        self.resolved_generation = Some(self.generation);
    }

    /// Drop the modified cache and all pending modifiers.
    pub fn clear(&mut self) {
        self.modifiers.clear();
        self.modified.clear();
        self.generation += 1;
        self.resolved_generation = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the cache was fully resolved for the current generation.
    pub fn is_resolved(&self) -> bool {
        self.resolved_generation == Some(self.generation)
    }

    pub fn set_override(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        if !value.is_finite() {
            return Err(Error::validation(
                "override",
                value,
                format!("override for {name} must be finite"),
            ));
        }
        self.overrides.insert(name, value);
        Ok(())
    }

    pub fn remove_override(&mut self, name: &str) -> Option<f64> {
        self.overrides.remove(name)
    }

    pub fn overrides(&self) -> &BTreeMap<String, f64> {
        &self.overrides
    }

    /// Number of modifiers accumulated for `name` in the current pass.
    pub fn modifier_count(&self, name: &str) -> usize {
        self.modifiers.get(name).map_or(0, AttributeModifiers::len)
    }

    /// Every attribute name with a base, modifier, or override, sorted.
    pub fn names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .item
            .attributes()
            .keys()
            .chain(self.modifiers.keys())
            .chain(self.overrides.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    /// All attribute values keyed by name.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.names()
            .into_iter()
            .filter_map(|name| self.get(&name).map(|value| (name, value)))
            .collect()
    }
}
