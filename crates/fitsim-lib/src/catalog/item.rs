//! Catalog items and attribute definitions.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::effect::Effect;

/// Numeric catalog identifier for an item type.
pub type ItemId = i64;

/// Attribute definitions keyed by attribute name.
pub type AttributeDefs = HashMap<String, AttributeDef>;

/// Numeric representation of an attribute's resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    #[default]
    Float,
    Int,
}

/// Catalog-wide definition of a named attribute slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    #[serde(default)]
    pub kind: AttributeKind,
    /// Value used when an item does not carry the attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Float,
            default: None,
            min: None,
            max: None,
        }
    }

    /// Clamp to the defined bounds and round integer-valued attributes.
    pub fn bound(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        match self.kind {
            AttributeKind::Float => value,
            AttributeKind::Int => value.round(),
        }
    }
}

/// Group/category classification of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub category: String,
}

/// Immutable catalog record for an item type.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub group: Group,
    attributes: BTreeMap<String, f64>,
    effects: Vec<Arc<Effect>>,
    defs: Arc<AttributeDefs>,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        group: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            group: Group {
                name: group.into(),
                category: category.into(),
            },
            attributes: BTreeMap::new(),
            effects: Vec::new(),
            defs: Arc::new(AttributeDefs::new()),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Arc<Effect>) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_defs(mut self, defs: Arc<AttributeDefs>) -> Self {
        self.defs = defs;
        self
    }

    /// Base attribute values as declared in the catalog.
    pub fn attributes(&self) -> &BTreeMap<String, f64> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    /// Effects in catalog-declared order.
    pub fn effects(&self) -> &[Arc<Effect>] {
        &self.effects
    }

    pub fn attribute_def(&self, name: &str) -> Option<&AttributeDef> {
        self.defs.get(name)
    }

    pub fn has_effect_type(&self, effect_type: super::EffectType) -> bool {
        self.effects.iter().any(|effect| effect.is_type(effect_type))
    }
}
