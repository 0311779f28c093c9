mod common;

use common::*;
use fitsim_lib::Holder;
use fitsim_lib::{
    Context, ContextTag, Drone, EffectScope, Error, Fit, HolderRef, Module, ModuleState,
    ModifierSink, Ship,
};

fn target() -> Fit {
    Fit::new(Ship::new(item(RIFTER)).expect("ship"))
}

fn active_web() -> Module {
    Module::new(item(STASIS_WEBIFIER))
        .expect("module")
        .with_state(ModuleState::Active)
}

fn velocity(fit: &mut Fit) -> f64 {
    fit.attribute(HolderRef::Ship, "maxVelocity")
        .expect("ship")
        .expect("maxVelocity")
}

#[test]
fn unwebbed_ship_keeps_base_velocity() {
    let mut fit = target();
    assert_close(velocity(&mut fit), 200.0);
}

#[test]
fn projected_web_halves_velocity() {
    let mut fit = target();
    fit.add_projected_module(active_web());
    assert_close(velocity(&mut fit), 100.0);
    assert!(fit.last_report().is_clean());
}

#[test]
fn inactive_web_does_not_project() {
    let mut fit = target();
    fit.add_projected_module(
        Module::new(item(STASIS_WEBIFIER))
            .expect("module")
            .with_state(ModuleState::Online),
    );
    fit.add_projected_drone(Drone::new(item(WEB_DRONE)).expect("drone"));
    assert_close(velocity(&mut fit), 200.0);
}

#[test]
fn web_fitted_locally_does_not_slow_own_ship() {
    let mut fit = target();
    fit.add_module(active_web());
    assert_close(velocity(&mut fit), 200.0);
}

#[test]
fn handler_without_projected_context_issues_nothing() {
    let mut fit = target();
    let drone = fit.add_projected_drone(
        Drone::with_amounts(item(WEB_DRONE), 1, 1).expect("drone"),
    );
    let effect = item(WEB_DRONE).effects()[0].clone();

    let scope = EffectScope::new(&fit, drone);
    let mut sink = ModifierSink::new();
    effect
        .handler
        .apply(&effect, &scope, &Context::empty(), &mut sink)
        .expect("no-op");
    assert!(sink.is_empty());

    let projected = Context::of(ContextTag::Drone).with(ContextTag::Projected);
    effect
        .handler
        .apply(&effect, &scope, &projected, &mut sink)
        .expect("applies");
    let ops: Vec<_> = sink.iter().collect();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].0, HolderRef::Ship);
    assert!(ops[0].1.remote_resists);
    assert!(ops[0].1.stacking_penalties);

    assert_close(velocity(&mut fit), 100.0);
}

#[test]
fn two_webs_are_stacking_penalised() {
    let mut fit = target();
    fit.add_projected_module(active_web());
    fit.add_projected_drone(Drone::with_amounts(item(WEB_DRONE), 1, 1).expect("drone"));
    // second web keeps 86.9% of its strength
    assert_close(velocity(&mut fit), 200.0 * 0.5 * (1.0 - 0.5 * 0.869_119_980_3));
}

#[test]
fn drone_stack_projects_once_per_active_drone() {
    let mut single = target();
    single.add_projected_drone(Drone::with_amounts(item(WEB_DRONE), 3, 2).expect("drone"));

    let mut pair = target();
    pair.add_projected_module(active_web());
    pair.add_projected_module(active_web());

    assert_eq!(velocity(&mut single).to_bits(), velocity(&mut pair).to_bits());
}

#[test]
fn resistance_scales_web_strength() {
    let mut fit = target();
    fit.add_projected_module(active_web());
    fit.set_override(HolderRef::Ship, "stasisWebifierResistance", 0.5)
        .expect("override");
    assert_close(velocity(&mut fit), 150.0);

    fit.set_override(HolderRef::Ship, "stasisWebifierResistance", 0.0)
        .expect("override");
    assert_close(velocity(&mut fit), 200.0);
}

#[test]
fn projecting_a_fit_links_its_projectable_holders() {
    let webber = load_fit("webber").into_shared();
    let mut victim = load_fit("target");

    let projected = victim.project_fit(&webber);
    assert_eq!(projected, 2);
    assert_eq!(victim.projected_fit_count(), 1);
    assert!(victim.projected_modules().is_empty());
    assert!(victim
        .holder_refs()
        .contains(&HolderRef::ProjectedFitDrone(0, 0)));
    assert_close(velocity(&mut victim), 200.0 * 0.5 * (1.0 - 0.5 * 0.869_119_980_3));

    // the projecting fit's own hull bonus is untouched by its webs
    assert_close(velocity(&mut webber.write().expect("lock")), 262.5);

    victim.clear_projected();
    assert_eq!(victim.projected_fit_count(), 0);
    assert_close(velocity(&mut victim), 200.0);
}

#[test]
fn projected_fit_applies_its_own_modified_values() {
    let vigil = load_fit("vigil_webber").into_shared();
    {
        let mut vigil = vigil.write().expect("lock");
        assert_eq!(vigil.ship().item().id, VIGIL);
        let speed_factor = vigil
            .attribute(HolderRef::Module(0), "speedFactor")
            .expect("module")
            .expect("speedFactor");
        assert_close(speed_factor, -60.0);
    }

    let mut victim = load_fit("target");
    victim.project_fit(&vigil);
    assert_close(velocity(&mut victim), 80.0);

    let projected = victim
        .store(HolderRef::ProjectedFitModule(0, 0))
        .expect("projected web");
    assert_close(projected.get("speedFactor").expect("speedFactor"), -60.0);
}

#[test]
fn changes_to_a_projected_fit_reach_the_target() {
    let webber = load_fit("webber").into_shared();
    let mut victim = load_fit("target");
    victim.project_fit(&webber);
    assert_close(velocity(&mut victim), 200.0 * 0.5 * (1.0 - 0.5 * 0.869_119_980_3));
    assert!(!victim.is_stale());

    webber
        .write()
        .expect("lock")
        .set_module_state(0, ModuleState::Offline)
        .expect("module");
    assert!(victim.is_stale());
    assert_close(velocity(&mut victim), 100.0);

    webber
        .write()
        .expect("lock")
        .set_drone_active(0, false)
        .expect("drone");
    assert_close(velocity(&mut victim), 200.0);

    webber
        .write()
        .expect("lock")
        .set_module_state(0, ModuleState::Active)
        .expect("module");
    assert_close(velocity(&mut victim), 100.0);
}

#[test]
fn dropped_projected_fit_stops_projecting() {
    let webber = load_fit("vigil_webber").into_shared();
    let mut victim = load_fit("target");
    victim.project_fit(&webber);
    assert_close(velocity(&mut victim), 80.0);

    drop(webber);
    assert!(victim.is_stale());
    assert_close(velocity(&mut victim), 200.0);
    assert_eq!(victim.projected_fit_count(), 1);

    victim.remove_projected_fit(0).expect("remove");
    assert!(victim.remove_projected_fit(0).is_err());
}

#[test]
fn projected_fit_holders_cannot_be_targeted() {
    let webber = load_fit("vigil_webber").into_shared();
    let mut victim = load_fit("target");
    victim.project_fit(&webber);

    let err = victim
        .set_override(HolderRef::ProjectedFitModule(0, 0), "speedFactor", -90.0)
        .expect_err("owned by the projecting fit");
    assert!(matches!(err, Error::UnknownHolder { .. }));
    assert_close(velocity(&mut victim), 80.0);
}

#[test]
fn removing_the_web_restores_velocity() {
    let mut fit = target();
    fit.add_projected_module(active_web());
    assert_close(velocity(&mut fit), 100.0);
    fit.remove_projected_module(0).expect("remove");
    assert_close(velocity(&mut fit), 200.0);
}
