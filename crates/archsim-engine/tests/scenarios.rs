//! End-to-end behaviour on the reference architectures

use archsim_engine::metrics::AVAILABILITY_CEILING;
use archsim_engine::scale_tier::traffic_tier;
use archsim_engine::{
    analyze_topology, compute_metrics, propagate_load, validate, CheckId, CheckOutcome, Dimension,
    Grade, MetricSnapshot, ScaleTier, Simulation, SimulationConfig, ValidationReport,
};
use archsim_model::{Catalog, GraphStore, Scenario, TrafficPattern};
use archsim_test_utils::{
    ai_assistant, balanced_web_app, basic_web_app, basic_web_app_scenario, id_of, production_web_app,
    GraphBuilder,
};
use pretty_assertions::assert_eq;

fn report(store: &GraphStore, load: f64, scenario: Option<&Scenario>) -> ValidationReport {
    let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
    let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), load);
    validate(
        store.catalog(),
        store.nodes(),
        store.edges(),
        &analysis.single_points_of_failure,
        &metrics,
        load,
        TrafficPattern::Steady,
        scenario,
    )
}

#[test]
fn basic_web_app_server_is_a_spof() {
    let store = basic_web_app();
    let server = id_of(&store, "Server");
    let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
    assert!(analysis.is_spof(server));

    let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), 1000.0);
    assert!(metrics.availability < AVAILABILITY_CEILING);
    // web-server 0.999 in series with postgres 0.9995
    assert!((metrics.availability - 0.999 * 0.9995).abs() < 1e-12);
}

#[test]
fn load_balancer_and_replica_remove_server_spof() {
    let basic = basic_web_app();
    let balanced = balanced_web_app();
    let server = id_of(&balanced, "Server");

    let analysis = analyze_topology(balanced.catalog(), balanced.nodes(), balanced.edges());
    assert!(!analysis.is_spof(server));

    let before = compute_metrics(basic.catalog(), basic.nodes(), basic.edges(), 1000.0);
    let after = compute_metrics(balanced.catalog(), balanced.nodes(), balanced.edges(), 1000.0);
    assert!(after.scalability_score > before.scalability_score);
}

#[test]
fn throughput_is_capped_by_critical_path() {
    let store = basic_web_app();
    // web-server handles 2000 rps per instance
    let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), 5000.0);
    assert_eq!(metrics.throughput, 2000.0);

    let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), 1500.0);
    assert_eq!(metrics.throughput, 1500.0);
}

#[test]
fn fan_out_to_sibling_leaves() {
    let store = GraphBuilder::new()
        .node("web-client", "Client")
        .node("web-server", "A")
        .node("web-server", "B")
        .edge("Client", "A")
        .edge("Client", "B")
        .build();
    let load = propagate_load(store.catalog(), store.nodes(), store.edges(), 1000.0);
    assert_eq!(load[&id_of(&store, "A")], 500.0);
    assert_eq!(load[&id_of(&store, "B")], 500.0);
}

#[test]
fn traffic_tier_crosses_at_500() {
    assert_eq!(traffic_tier(499.0), ScaleTier::Prototype);
    assert_eq!(traffic_tier(501.0), ScaleTier::Startup);
}

#[test]
fn database_replica_check_follows_traffic() {
    let store = basic_web_app();
    let quiet = report(&store, 100.0, None);
    let busy = report(&store, 100_000.0, None);

    let quiet_check = quiet.check(CheckId::DatabaseLacksReplica).unwrap();
    let busy_check = busy.check(CheckId::DatabaseLacksReplica).unwrap();
    assert_eq!(quiet_check.outcome, CheckOutcome::Advisory);
    assert_eq!(busy_check.outcome, CheckOutcome::Fail);
    assert_eq!(busy.context.scale_tier, ScaleTier::Scale);
}

#[test]
fn scenario_requirements_are_met_by_basic_app() {
    let store = basic_web_app();
    let scenario = basic_web_app_scenario();
    let report = report(&store, 1000.0, Some(&scenario));
    let check = report.check(CheckId::ScenarioComponentsMissing).unwrap();
    assert_eq!(check.outcome, CheckOutcome::Pass);
    assert_eq!(report.context.scenario_id.as_deref(), Some("basic-web-app"));
}

#[test]
fn production_stack_grades_better_than_basic() {
    let basic = report(&basic_web_app(), 1000.0, None);
    let production = report(&production_web_app(), 1000.0, None);
    assert!(production.overall_score > basic.overall_score);
    assert!(production.grade <= basic.grade);
    assert!(production.dimension(Dimension::Ai).is_none());
}

#[test]
fn ai_dimension_appears_with_ai_components() {
    let report = report(&ai_assistant(), 50.0, None);
    assert!(report.dimension(Dimension::Ai).is_some());
    assert!(report.check(CheckId::NoGuardrails).is_some());
}

#[test]
fn grade_boundary() {
    assert_eq!(Grade::from_score(90), Grade::A);
    assert_eq!(Grade::from_score(89), Grade::B);
}

#[test]
fn empty_graph_is_harmless() {
    let catalog = Catalog::builtin();
    let metrics = compute_metrics(catalog, &[], &[], 1000.0);
    assert_eq!(metrics, MetricSnapshot::default());

    let report = validate(
        catalog,
        &[],
        &[],
        &Default::default(),
        &metrics,
        1000.0,
        TrafficPattern::Steady,
        None,
    );
    assert_eq!(report.overall_score, 100);
    assert_eq!(report.checks().count(), 0);
    assert!(report.top_issues.is_empty());
}

#[test]
fn simulation_recovers_after_injected_failure() {
    let config = SimulationConfig::new()
        .with_traffic_load(500.0)
        .with_failure_duration_ms(3_000);
    let mut sim = Simulation::new(balanced_web_app(), config).unwrap();
    let db = id_of(sim.store(), "Postgres");
    sim.inject_failure(db, 0).unwrap();

    let mut error_rates = Vec::new();
    for second in 0..6 {
        if let Some(outcome) = sim.advance(second * 1000) {
            error_rates.push(outcome.metrics.error_rate);
        }
    }
    assert_eq!(error_rates.len(), 6);
    assert_eq!(&error_rates[..3], &[1.0, 1.0, 1.0]);
    assert!(error_rates[3..].iter().all(|&e| e < 1.0));
}
