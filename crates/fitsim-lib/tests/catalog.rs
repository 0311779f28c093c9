mod common;

use common::*;
use fitsim_lib::catalog::AttributeKind;
use fitsim_lib::{Catalog, EffectHandler, EffectType, Error, HandlerRegistry, RunTime};

#[test]
fn fixture_catalog_loads() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 17);
    assert!(catalog.source_path().is_some());

    let rifter = item(RIFTER);
    assert_eq!(rifter.group.category, "Ship");
    assert_eq!(rifter.attribute("maxVelocity"), Some(200.0));

    let web = catalog.effect("remoteWebifierFalloff").expect("effect");
    assert_eq!(web.handler, EffectHandler::RemoteWebifier);
    assert!(web.is_type(EffectType::Projected));
    assert_eq!(web.resistance_attribute.as_deref(), Some("stasisWebifierResistance"));

    let bonus = catalog.effect("shipVelocityBonus").expect("effect");
    assert_eq!(bonus.run_time, RunTime::Early);
    assert!(matches!(bonus.handler, EffectHandler::Modifiers(ref infos) if infos.len() == 1));

    assert_eq!(catalog.effect("online").expect("effect").handler, EffectHandler::Noop);
    assert_eq!(
        catalog.attribute_def("boosterness").map(|def| def.kind),
        Some(AttributeKind::Int)
    );
}

#[test]
fn lookup_by_name_ignores_case() {
    let found = catalog().find_by_name("  stasis webifier i ").expect("found");
    assert_eq!(found.id, STASIS_WEBIFIER);
    assert!(catalog().find_by_name("Stasis Webifier II").is_none());
}

#[test]
fn unknown_ids_are_errors() {
    let err = catalog().item(424_242).expect_err("missing");
    assert!(matches!(err, Error::UnknownItem { item_id: 424_242 }));
}

#[test]
fn items_share_attribute_definitions() {
    let ship = item(RIFTER);
    let def = ship.attribute_def("stasisWebifierResistance").expect("def");
    assert_eq!(def.default, Some(1.0));
}

#[test]
fn bad_catalogs_are_rejected() {
    let unknown_effect = r#"{"items": [{"id": 1, "name": "A", "group": "G", "category": "Ship",
                                         "effects": ["nope"]}]}"#;
    let err = Catalog::from_reader(unknown_effect.as_bytes()).expect_err("unknown effect");
    assert!(matches!(err, Error::UnknownEffect { item_id: 1, .. }));

    let duplicate = r#"{"items": [{"id": 1, "name": "A", "group": "G", "category": "Ship"},
                                    {"id": 1, "name": "B", "group": "G", "category": "Ship"}]}"#;
    let err = Catalog::from_reader(duplicate.as_bytes()).expect_err("duplicate id");
    assert!(matches!(err, Error::CatalogValidation { .. }));

    let err = Catalog::from_reader("{".as_bytes()).expect_err("syntax");
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn registry_overrides_declared_handlers() {
    let json = r#"{
        "effects": [{"name": "custom", "types": ["passive"],
                     "modifiers": [{"domain": "ship", "operation": "add",
                                    "source": "a", "target": "b"}]}],
        "items": []
    }"#;
    let mut registry = HandlerRegistry::empty();
    let declared = Catalog::from_reader_with(json.as_bytes(), &registry).expect("loads");
    assert!(matches!(
        declared.effect("custom").expect("effect").handler,
        EffectHandler::Modifiers(_)
    ));

    registry.register("custom", EffectHandler::Noop);
    let replaced = Catalog::from_reader_with(json.as_bytes(), &registry).expect("loads");
    assert_eq!(replaced.effect("custom").expect("effect").handler, EffectHandler::Noop);
}

#[test]
fn catalogs_load_from_any_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("small.json");
    std::fs::write(
        &path,
        r#"{"items": [{"id": 3, "name": "Hull", "group": "Frigate", "category": "Ship",
                       "attributes": {"maxVelocity": 150.0}}]}"#,
    )
    .expect("write catalog");

    let catalog = Catalog::from_path(&path).expect("loads");
    assert_eq!(catalog.source_path(), Some(path.as_path()));
    assert_eq!(catalog.len(), 1);

    let missing = Catalog::from_path(&dir.path().join("missing.json")).expect_err("no file");
    assert!(matches!(missing, Error::Io(_)));
}
