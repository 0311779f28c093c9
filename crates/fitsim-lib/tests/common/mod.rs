//! Shared fixture helpers for integration tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use fitsim_lib::{Catalog, Fit, FitRecord, Item, ItemId};
use once_cell::sync::Lazy;

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_path(&fixtures_dir().join("catalog.json")).expect("fixture catalog loads")
});

/// Path to the fixtures shared by tests, benches and the CLI.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn catalog() -> &'static Catalog {
    &CATALOG
}

pub fn item(id: ItemId) -> Arc<Item> {
    catalog().item(id).expect("fixture item exists")
}

#[allow(dead_code)]
pub fn record(name: &str) -> FitRecord {
    let path = fixtures_dir().join("fits").join(format!("{name}.json"));
    let json = fs::read_to_string(&path).expect("read fixture fit");
    serde_json::from_str(&json).expect("parse fixture fit")
}

#[allow(dead_code)]
pub fn load_fit(name: &str) -> Fit {
    Fit::restore(&record(name), catalog()).expect("restore fixture fit")
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// Fixture item IDs.
#[allow(dead_code)]
pub const RIFTER: ItemId = 587;
#[allow(dead_code)]
pub const SLASHER: ItemId = 585;
#[allow(dead_code)]
pub const VIGIL: ItemId = 3766;
#[allow(dead_code)]
pub const STASIS_WEBIFIER: ItemId = 526;
#[allow(dead_code)]
pub const WEB_DRONE: ItemId = 23561;
#[allow(dead_code)]
pub const WARRIOR: ItemId = 2488;
#[allow(dead_code)]
pub const GYROSTABILIZER: ItemId = 520;
#[allow(dead_code)]
pub const AUTOCANNON: ItemId = 488;
#[allow(dead_code)]
pub const OVERDRIVE: ItemId = 1236;
#[allow(dead_code)]
pub const EMP_S: ItemId = 178;
#[allow(dead_code)]
pub const MINDFLOOD: ItemId = 28672;
#[allow(dead_code)]
pub const BLUE_PILL: ItemId = 10156;
#[allow(dead_code)]
pub const CRASH: ItemId = 15459;
#[allow(dead_code)]
pub const DROP: ItemId = 28674;
#[allow(dead_code)]
pub const PROTOTYPE_BOOSTER: ItemId = 99001;
#[allow(dead_code)]
pub const OVERCLOCKED_BOOSTER: ItemId = 99002;
#[allow(dead_code)]
pub const OCULAR_FILTER: ItemId = 9899;
