use serde::{Deserialize, Serialize};

/// Numeric operation a modifier performs on its target attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Added to the base value before any multiplication.
    Add,
    /// Percentage boost: the value is multiplied by `1 + magnitude / 100`.
    PostPercent,
    /// Plain multiplier.
    Multiply,
    /// Replaces the computed value outright.
    Assign,
    /// Upper clamp on the computed value.
    Limit,
}

impl Operation {
    /// Whether stacking penalties can apply to this operation.
    pub fn is_penalizable(self) -> bool {
        matches!(
            self,
            Operation::Add | Operation::PostPercent | Operation::Multiply
        )
    }
}

/// A single pending change to one attribute of one holder.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierOp {
    pub attribute: String,
    pub operation: Operation,
    pub magnitude: f64,
    pub stacking_penalties: bool,
    pub remote_resists: bool,
    /// Target attribute consulted when `remote_resists` is set.
    pub resistance_attribute: Option<String>,
}

impl ModifierOp {
    pub fn new(attribute: impl Into<String>, operation: Operation, magnitude: f64) -> Self {
        Self {
            attribute: attribute.into(),
            operation,
            magnitude,
            stacking_penalties: false,
            remote_resists: false,
            resistance_attribute: None,
        }
    }

    pub fn add(attribute: impl Into<String>, amount: f64) -> Self {
        Self::new(attribute, Operation::Add, amount)
    }

    pub fn boost(attribute: impl Into<String>, percent: f64) -> Self {
        Self::new(attribute, Operation::PostPercent, percent)
    }

    pub fn multiply(attribute: impl Into<String>, factor: f64) -> Self {
        Self::new(attribute, Operation::Multiply, factor)
    }

    pub fn assign(attribute: impl Into<String>, value: f64) -> Self {
        Self::new(attribute, Operation::Assign, value)
    }

    pub fn limit(attribute: impl Into<String>, ceiling: f64) -> Self {
        Self::new(attribute, Operation::Limit, ceiling)
    }

    #[must_use]
    pub fn penalized(mut self, stacking_penalties: bool) -> Self {
        self.stacking_penalties = stacking_penalties;
        self
    }

    /// Mark the op as remote, scaled by `resistance_attribute` on the target.
    #[must_use]
    pub fn remote(mut self, resistance_attribute: Option<String>) -> Self {
        self.remote_resists = true;
        self.resistance_attribute = resistance_attribute;
        self
    }

    /// Scale the op's strength by a resistance multiplier.
    ///
    /// Multipliers are scaled on their deviation from 1 so a full resist
    /// (`0.0`) turns any op into a no-op.
    pub fn resisted(&self, resist: f64) -> f64 {
        match self.operation {
            Operation::Add | Operation::PostPercent => self.magnitude * resist,
            Operation::Multiply => 1.0 + (self.magnitude - 1.0) * resist,
            Operation::Assign | Operation::Limit => self.magnitude,
        }
    }
}
