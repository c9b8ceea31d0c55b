//! Reliability checks

use super::check::{by_tier, labels, CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::{Category, Role};
use std::collections::BTreeSet;

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::SinglePointsOfFailure, score_impact: 30.0, evaluate: single_points_of_failure },
    Rule { id: CheckId::DatabaseLacksReplica, score_impact: 20.0, evaluate: database_lacks_replica },
    Rule { id: CheckId::MissingLoadBalancer, score_impact: 15.0, evaluate: missing_load_balancer },
    Rule { id: CheckId::InsufficientComputeReplicas, score_impact: 15.0, evaluate: insufficient_compute_replicas },
    Rule { id: CheckId::AvailabilityBelowTarget, score_impact: 15.0, evaluate: availability_below_target },
    Rule { id: CheckId::SingleRegion, score_impact: 10.0, evaluate: single_region },
    Rule { id: CheckId::ManuallyFailedComponents, score_impact: 10.0, evaluate: manually_failed },
    Rule { id: CheckId::ScenarioComponentsMissing, score_impact: 15.0, evaluate: scenario_components_missing },
];

fn single_points_of_failure(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| !p.category.is_passive()) {
        return None;
    }
    let spofs: Vec<_> = input
        .spof_ids
        .iter()
        .filter_map(|&id| input.view.node(id))
        .collect();
    if spofs.is_empty() {
        return Some(Finding::pass(Severity::Critical, "Every component on the request path has a fallback"));
    }
    let message = format!("{} single point(s) of failure: {}", spofs.len(), labels(spofs.iter().copied()));
    let finding = match input.tier() {
        ScaleTier::Prototype => Finding::advisory(Severity::Info, message),
        ScaleTier::Startup => Finding::advisory(Severity::Warning, message),
        _ => Finding::fail(Severity::Critical, message),
    };
    Some(finding.recommend("Add replicas or a redundant path for each flagged component"))
}

fn database_lacks_replica(input: &CheckInput<'_>) -> Option<Finding> {
    let databases = input.nodes_where(|p| p.role.is_database());
    if databases.is_empty() {
        return None;
    }
    let single: Vec<_> = databases
        .iter()
        .filter(|(n, _)| n.replicas() < 2)
        .map(|(n, _)| *n)
        .collect();
    if single.is_empty() {
        return Some(Finding::pass(Severity::Warning, "Every database runs with a replica"));
    }
    let names = labels(single.iter().copied());
    let finding = match input.tier() {
        ScaleTier::Prototype => {
            return Some(Finding::pass(
                Severity::Info,
                format!("{names} has no replica, acceptable for a prototype"),
            ))
        }
        ScaleTier::Startup => Finding::advisory(
            Severity::Warning,
            format!("{names} has no replica; you will need one as traffic grows"),
        ),
        ScaleTier::Growth => Finding::advisory(
            Severity::Warning,
            format!("{names} has no replica; a failover target is overdue at growth scale"),
        ),
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(
            Severity::Critical,
            format!("{names} has no replica; a single instance cannot serve {} scale", input.tier()),
        ),
    };
    Some(finding.recommend("Add a read replica or a standby with automatic failover"))
}

fn missing_load_balancer(input: &CheckInput<'_>) -> Option<Finding> {
    let compute = input.nodes_where(|p| p.category == Category::Compute);
    if compute.is_empty() {
        return None;
    }
    if input.has(|p| matches!(p.role, Role::LoadBalancer | Role::ApiGateway)) {
        return Some(Finding::pass(Severity::Warning, "Compute is fronted by a load balancer"));
    }
    if input.thresholds().requires_load_balancer {
        return Some(
            Finding::fail(
                by_tier(input.tier(), ScaleTier::Scale, Severity::Critical, Severity::Warning),
                format!("No load balancer in front of compute at {} scale", input.tier()),
            )
            .recommend("Place a load balancer in front of the compute tier"),
        );
    }
    if compute.iter().any(|(n, _)| n.replicas() > 1) {
        return Some(
            Finding::advisory(Severity::Info, "Replicated compute without a load balancer to spread traffic")
                .recommend("Add a load balancer so replicas share the load"),
        );
    }
    Some(Finding::pass(Severity::Info, "A load balancer is not needed yet"))
}

fn insufficient_compute_replicas(input: &CheckInput<'_>) -> Option<Finding> {
    let compute = input.nodes_where(|p| p.category == Category::Compute);
    if compute.is_empty() {
        return None;
    }
    let required = input.thresholds().replicas_for_ha;
    let short: Vec<_> = compute
        .iter()
        .filter(|(n, _)| n.replicas() < required)
        .map(|(n, _)| *n)
        .collect();
    if short.is_empty() {
        let severity = if required > 1 { Severity::Warning } else { Severity::Info };
        return Some(Finding::pass(severity, format!("Compute meets {required} replica(s) per service")));
    }
    Some(
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Enterprise, Severity::Critical, Severity::Warning),
            format!(
                "{} run below {required} replicas required at {} scale",
                labels(short.iter().copied()),
                input.tier()
            ),
        )
        .recommend(format!("Scale each compute service to at least {required} replicas")),
    )
}

fn availability_below_target(input: &CheckInput<'_>) -> Option<Finding> {
    let target = input.thresholds().min_availability;
    let actual = input.metrics.availability;
    if actual >= target {
        return Some(Finding::pass(
            Severity::Warning,
            format!("Availability {:.3}% meets the {:.3}% target", actual * 100.0, target * 100.0),
        ));
    }
    let message = format!(
        "Availability {:.3}% is below the {:.3}% target",
        actual * 100.0,
        target * 100.0
    );
    let finding = match input.tier() {
        ScaleTier::Prototype | ScaleTier::Startup => Finding::advisory(Severity::Warning, message),
        ScaleTier::Growth => Finding::fail(Severity::Warning, message),
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(Severity::Critical, message),
    };
    Some(finding.recommend("Remove single points of failure on the request path"))
}

fn single_region(input: &CheckInput<'_>) -> Option<Finding> {
    let regions: BTreeSet<&str> = input
        .nodes_where(|p| p.category != Category::Clients)
        .into_iter()
        .map(|(n, _)| n.config.region.as_str())
        .collect();
    if regions.is_empty() {
        return None;
    }
    if regions.len() >= 2 {
        return Some(Finding::pass(
            Severity::Warning,
            format!("Deployed across {} regions", regions.len()),
        ));
    }
    let finding = match input.tier() {
        ScaleTier::Enterprise => Finding::fail(Severity::Warning, "All components run in a single region"),
        ScaleTier::Scale => Finding::advisory(Severity::Warning, "All components run in a single region"),
        _ => return Some(Finding::pass(Severity::Info, "A single region is fine at this scale")),
    };
    Some(finding.recommend("Deploy a second region with data replication"))
}

fn manually_failed(input: &CheckInput<'_>) -> Option<Finding> {
    let failed: Vec<_> = input
        .view
        .nodes()
        .iter()
        .filter(|n| n.state.is_manually_failed)
        .collect();
    if failed.is_empty() {
        return Some(Finding::pass(Severity::Info, "No components are down"));
    }
    Some(
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Startup, Severity::Critical, Severity::Warning),
            format!("{} currently failed", labels(failed.iter().copied())),
        )
        .recommend("Check how traffic reroutes while these components are down"),
    )
}

fn scenario_components_missing(input: &CheckInput<'_>) -> Option<Finding> {
    let required = &input.ctx.required_kinds;
    if required.is_empty() {
        return None;
    }
    let present: BTreeSet<&str> = input.view.nodes().iter().map(|n| n.kind.as_str()).collect();
    let missing: Vec<&str> = required
        .iter()
        .map(String::as_str)
        .filter(|k| !present.contains(k))
        .collect();
    if missing.is_empty() {
        return Some(Finding::pass(Severity::Warning, "All scenario components are in place"));
    }
    Some(
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Growth, Severity::Critical, Severity::Warning),
            format!("Scenario expects: {}", missing.join(", ")),
        )
        .recommend("Add the missing components to complete the scenario"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::check::fixture::Scene;
    use crate::validator::check::CheckOutcome::{Advisory, Fail, Pass};
    use archsim_test_utils::{balanced_web_app, basic_web_app, id_of, production_web_app, GraphBuilder};
    use pretty_assertions::assert_eq;
    use Severity::{Critical, Info, Warning};

    #[test]
    fn spofs_escalate_from_advisory_to_critical() {
        let scene = Scene::new(basic_web_app());
        assert_eq!(
            scene.across_tiers(single_points_of_failure),
            vec![(Advisory, Info), (Advisory, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        let redundant = Scene::new(production_web_app());
        assert_eq!(redundant.at(ScaleTier::Enterprise, single_points_of_failure), (Pass, Critical));
    }

    #[test]
    fn spof_check_skips_passive_only_graphs() {
        let scene = Scene::new(GraphBuilder::new().node("web-client", "Client").node("monitoring", "M").build());
        assert!(scene.eval(ScaleTier::Enterprise, single_points_of_failure).is_none());
    }

    #[test]
    fn database_replica_bands() {
        let scene = Scene::new(basic_web_app());
        assert_eq!(
            scene.across_tiers(database_lacks_replica),
            vec![(Pass, Info), (Advisory, Warning), (Advisory, Warning), (Fail, Critical), (Fail, Critical)]
        );
        let replicated = GraphBuilder::new()
            .node("web-server", "Server")
            .replicated("postgres", "Postgres", 2)
            .edge("Server", "Postgres")
            .build();
        assert_eq!(Scene::new(replicated).at(ScaleTier::Enterprise, database_lacks_replica), (Pass, Warning));
    }

    #[test]
    fn load_balancer_required_from_growth() {
        let scene = Scene::new(basic_web_app());
        assert_eq!(
            scene.across_tiers(missing_load_balancer),
            vec![(Pass, Info), (Pass, Info), (Fail, Warning), (Fail, Critical), (Fail, Critical)]
        );
        assert_eq!(Scene::new(balanced_web_app()).at(ScaleTier::Enterprise, missing_load_balancer), (Pass, Warning));
    }

    #[test]
    fn replicated_compute_without_balancer_is_advisory_below_growth() {
        let store = GraphBuilder::new()
            .node("web-client", "Client")
            .replicated("web-server", "Server", 2)
            .edge("Client", "Server")
            .build();
        let scene = Scene::new(store);
        assert_eq!(scene.at(ScaleTier::Prototype, missing_load_balancer), (Advisory, Info));
        assert_eq!(scene.at(ScaleTier::Startup, missing_load_balancer), (Advisory, Info));
    }

    #[test]
    fn compute_replicas_follow_tier_requirement() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(insufficient_compute_replicas),
            vec![(Pass, Info), (Pass, Info), (Fail, Warning), (Fail, Warning), (Fail, Critical)]
        );
        assert_eq!(
            Scene::new(balanced_web_app()).across_tiers(insufficient_compute_replicas),
            vec![(Pass, Info), (Pass, Info), (Pass, Warning), (Pass, Warning), (Fail, Critical)]
        );
    }

    #[test]
    fn availability_shortfall_by_tier() {
        let short = Scene::new(basic_web_app()).metrics(|m| m.availability = 0.9);
        assert_eq!(
            short.across_tiers(availability_below_target),
            vec![(Advisory, Warning), (Advisory, Warning), (Fail, Warning), (Fail, Critical), (Fail, Critical)]
        );
        let ample = Scene::new(basic_web_app()).metrics(|m| m.availability = 0.99999);
        assert_eq!(ample.across_tiers(availability_below_target), vec![(Pass, Warning); 5]);
    }

    #[test]
    fn single_region_matters_from_scale() {
        let scene = Scene::new(basic_web_app());
        assert_eq!(
            scene.across_tiers(single_region),
            vec![(Pass, Info), (Pass, Info), (Pass, Info), (Advisory, Warning), (Fail, Warning)]
        );
        let spread = GraphBuilder::new()
            .in_region("web-server", "East", "us-east-1")
            .in_region("web-server", "West", "eu-west-1")
            .build();
        assert_eq!(Scene::new(spread).at(ScaleTier::Enterprise, single_region), (Pass, Warning));
    }

    #[test]
    fn single_region_ignores_clients() {
        let store = GraphBuilder::new()
            .in_region("web-client", "Client", "eu-west-1")
            .node("web-server", "Server")
            .edge("Client", "Server")
            .build();
        assert_eq!(Scene::new(store).at(ScaleTier::Enterprise, single_region), (Fail, Warning));
    }

    #[test]
    fn failed_components_are_critical_from_startup() {
        let mut store = basic_web_app();
        store.set_manually_failed(id_of(&store, "Server"), true).unwrap();
        assert_eq!(
            Scene::new(store).across_tiers(manually_failed),
            vec![(Fail, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        assert_eq!(Scene::new(basic_web_app()).at(ScaleTier::Enterprise, manually_failed), (Pass, Info));
    }

    #[test]
    fn scenario_kinds_missing_by_tier() {
        let scene = Scene::new(basic_web_app())
            .context(|ctx| ctx.required_kinds = vec!["web-client".to_string(), "redis".to_string()]);
        assert_eq!(
            scene.across_tiers(scenario_components_missing),
            vec![(Fail, Warning), (Fail, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        let complete = Scene::new(basic_web_app()).context(|ctx| ctx.required_kinds = vec!["postgres".to_string()]);
        assert_eq!(complete.at(ScaleTier::Growth, scenario_components_missing), (Pass, Warning));
        assert!(Scene::new(basic_web_app())
            .eval(ScaleTier::Growth, scenario_components_missing)
            .is_none());
    }
}
