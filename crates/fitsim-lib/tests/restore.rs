mod common;

use common::*;
use fitsim_lib::{Error, Fit, FitRecord, HolderKind, InvalidReason};

#[test]
fn fixture_round_trips_through_records() {
    let record = record("rifter_boosted");
    let fit = Fit::restore(&record, catalog()).expect("restore");
    assert_eq!(fit.name(), Some("boosted rifter"));
    assert_eq!(fit.modules().len(), 6);
    assert_eq!(fit.boosters().len(), 3);
    assert_eq!(fit.to_record(), record);

    let json = serde_json::to_string(&fit.to_record()).expect("serialize");
    let parsed: FitRecord = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, record);
}

#[test]
fn stale_entries_are_skipped_and_reported() {
    let fit = load_fit("stale_items");

    assert_eq!(fit.modules().len(), 1);
    assert!(fit.modules()[0].charge().is_none());
    assert!(fit.drones().is_empty());
    assert_eq!(fit.boosters().len(), 1);
    assert_eq!(fit.boosters()[0].record_id(), Some(9));
    assert_eq!(fit.invalid_boosters().len(), 3);

    let issues = fit.restore_issues();
    assert_eq!(issues.len(), 6);
    assert!(issues
        .iter()
        .any(|issue| issue.item_id == 424_242 && issue.reason == InvalidReason::MissingItem));
    assert!(issues.iter().any(|issue| issue.kind == HolderKind::Charge
        && issue.reason
            == InvalidReason::WrongClassification {
                expected: HolderKind::Charge
            }));
    assert!(issues
        .iter()
        .any(|issue| issue.kind == HolderKind::Drone && issue.item_id == STASIS_WEBIFIER));
    assert!(issues.iter().any(|issue| {
        issue.item_id == DROP
            && matches!(
                issue.reason,
                InvalidReason::Unusable { ref message } if message.contains("slot 1")
            )
    }));
}

#[test]
fn invalid_boosters_survive_a_save() {
    let fit = load_fit("stale_items");
    let record = fit.to_record();
    let mut ids: Vec<_> = record.boosters.iter().filter_map(|b| b.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![7, 8, 9, 10]);
}

#[test]
fn stale_fit_still_calculates() {
    let mut fit = load_fit("stale_items");
    let shield = fit
        .attribute(fitsim_lib::HolderRef::Ship, "capacitorCapacity")
        .expect("ship")
        .expect("capacitor");
    assert_close(shield, 275.0);
    assert!(fit.last_report().is_clean());
}

#[test]
fn ship_must_resolve() {
    let err = Fit::restore(&FitRecord::new(1), catalog()).expect_err("unknown ship");
    assert!(matches!(err, Error::UnknownItem { item_id: 1 }));

    let err = Fit::restore(&FitRecord::new(AUTOCANNON), catalog()).expect_err("not a ship");
    assert!(matches!(err, Error::InvalidItem { expected: "ship", .. }));
}
