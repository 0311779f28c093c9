//! Serialisable fit records and the diagnostics produced when restoring them.
//!
//! Records carry only configuration (item IDs, states, amounts). Restoring a
//! record resolves item IDs through an [`crate::catalog::ItemSource`]; entries
//! whose items vanished or changed classification are reported rather than
//! failing the whole load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ItemId;
use crate::holder::{HolderKind, ModuleState};

fn default_true() -> bool {
    true
}

fn default_amount() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ship: ItemId,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub drones: Vec<DroneRecord>,
    #[serde(default)]
    pub boosters: Vec<BoosterRecord>,
    #[serde(default)]
    pub projected_modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub projected_drones: Vec<DroneRecord>,
}

impl FitRecord {
    pub fn new(ship: ItemId) -> Self {
        Self {
            name: None,
            ship,
            modules: Vec::new(),
            drones: Vec::new(),
            boosters: Vec::new(),
            projected_modules: Vec::new(),
            projected_drones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub item_id: ItemId,
    #[serde(default)]
    pub state: ModuleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneRecord {
    pub item_id: ItemId,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub amount_active: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoosterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub item_id: ItemId,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Why a stored holder could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("item does not exist")]
    MissingItem,
    #[error("item is not a {expected}")]
    WrongClassification { expected: HolderKind },
    #[error("{message}")]
    Unusable { message: String },
}

/// A stored holder that was left out of a restored fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreIssue {
    pub kind: HolderKind,
    pub item_id: ItemId,
    pub reason: InvalidReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_record_fills_defaults() {
        let json = r#"{"ship": 587, "boosters": [{"item_id": 28672}],
                       "drones": [{"item_id": 2464}],
                       "modules": [{"item_id": 526}]}"#;
        let record: FitRecord = serde_json::from_str(json).expect("parses");
        assert_eq!(record.ship, 587);
        assert!(record.boosters[0].active);
        assert_eq!(record.boosters[0].id, None);
        assert_eq!(record.drones[0].amount, 1);
        assert_eq!(record.drones[0].amount_active, 0);
        assert_eq!(record.modules[0].state, ModuleState::Online);
        assert!(record.projected_drones.is_empty());
    }
}
