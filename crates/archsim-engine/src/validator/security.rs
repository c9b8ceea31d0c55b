//! Security checks

use super::check::{labels, CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::{Category, Node, Role};

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::ClientsReachBackend, score_impact: 30.0, evaluate: clients_reach_backend },
    Rule { id: CheckId::DatabaseExposed, score_impact: 30.0, evaluate: database_exposed },
    Rule { id: CheckId::NoAuthentication, score_impact: 20.0, evaluate: no_authentication },
    Rule { id: CheckId::NoWebFirewall, score_impact: 10.0, evaluate: no_web_firewall },
    Rule { id: CheckId::NoRateLimiting, score_impact: 10.0, evaluate: no_rate_limiting },
];

/// Nodes directly downstream of any client whose profile matches `pred`
fn client_neighbours<'a>(
    input: &CheckInput<'a>,
    pred: impl Fn(Category, Role) -> bool,
) -> Option<Vec<&'a Node>> {
    let clients = input.nodes_where(|p| p.category == Category::Clients);
    if clients.is_empty() {
        return None;
    }
    let mut exposed: Vec<&Node> = Vec::new();
    for (client, _) in clients {
        for next in input.view.successors(client.id) {
            let (Some(node), Some(profile)) = (input.view.node(next), input.profile(next)) else {
                continue;
            };
            if pred(profile.category, profile.role) && !exposed.iter().any(|n| n.id == node.id) {
                exposed.push(node);
            }
        }
    }
    Some(exposed)
}

fn clients_reach_backend(input: &CheckInput<'_>) -> Option<Finding> {
    let exposed = client_neighbours(input, |category, role| {
        category == Category::Compute && !role.is_edge_protection()
    })?;
    if exposed.is_empty() {
        return Some(Finding::pass(Severity::Warning, "Clients enter through an edge layer"));
    }
    let message = format!("Clients call {} directly", labels(exposed.iter().copied()));
    let finding = match input.tier() {
        ScaleTier::Prototype => Finding::advisory(Severity::Info, message),
        ScaleTier::Startup => Finding::advisory(Severity::Warning, message),
        ScaleTier::Growth => Finding::fail(Severity::Warning, message),
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(Severity::Critical, message),
    };
    Some(finding.recommend("Route clients through a load balancer or API gateway"))
}

fn database_exposed(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Storage) {
        return None;
    }
    let exposed = client_neighbours(input, |category, _| category == Category::Storage)?;
    if exposed.is_empty() {
        return Some(Finding::pass(Severity::Critical, "No store is reachable from clients"));
    }
    let severity = if input.tier() == ScaleTier::Prototype {
        Severity::Warning
    } else {
        Severity::Critical
    };
    Some(
        Finding::fail(
            severity,
            format!("Clients connect straight to {}", labels(exposed.iter().copied())),
        )
        .recommend("Put a service in front of the store"),
    )
}

fn no_authentication(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Compute) {
        return None;
    }
    if input.has(|p| matches!(p.role, Role::Auth | Role::ApiGateway)) {
        return Some(Finding::pass(Severity::Warning, "Requests are authenticated"));
    }
    let message = "No authentication component guards the services";
    let finding = match input.tier() {
        ScaleTier::Prototype => return Some(Finding::pass(Severity::Info, "Authentication can wait for a prototype")),
        ScaleTier::Startup => Finding::advisory(Severity::Warning, message),
        _ => Finding::fail(Severity::Critical, message),
    };
    Some(finding.recommend("Add an auth service or terminate auth at an API gateway"))
}

fn no_web_firewall(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Clients) {
        return None;
    }
    if input.has_role(Role::Firewall) {
        return Some(Finding::pass(Severity::Warning, "A web application firewall filters traffic"));
    }
    let message = "Public traffic is not filtered by a firewall";
    let finding = match input.tier() {
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(Severity::Warning, message),
        ScaleTier::Growth => Finding::advisory(Severity::Info, message),
        _ => return Some(Finding::pass(Severity::Info, "A firewall is optional at this scale")),
    };
    Some(finding.recommend("Add a WAF at the edge"))
}

fn no_rate_limiting(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Clients) {
        return None;
    }
    if input.has(|p| matches!(p.role, Role::RateLimiter | Role::ApiGateway)) {
        return Some(Finding::pass(Severity::Warning, "Request rates are limited at the edge"));
    }
    let message = "Nothing limits per-client request rates";
    let finding = match input.tier() {
        ScaleTier::Enterprise => Finding::fail(Severity::Warning, message),
        ScaleTier::Growth | ScaleTier::Scale => Finding::advisory(Severity::Warning, message),
        _ => return Some(Finding::pass(Severity::Info, "Rate limiting is optional at this scale")),
    };
    Some(finding.recommend("Add a rate limiter or enable limits on the API gateway"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::check::fixture::Scene;
    use crate::validator::check::CheckOutcome::{Advisory, Fail, Pass};
    use archsim_test_utils::{balanced_web_app, basic_web_app, GraphBuilder};
    use pretty_assertions::assert_eq;
    use Severity::{Critical, Info, Warning};

    fn gateway_app() -> Scene {
        let store = GraphBuilder::new()
            .node("web-client", "Client")
            .node("api-gateway", "Gateway")
            .node("web-server", "Server")
            .chain(&["Client", "Gateway", "Server"])
            .build();
        Scene::new(store)
    }

    #[test]
    fn direct_backend_access_escalates() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(clients_reach_backend),
            vec![(Advisory, Info), (Advisory, Warning), (Fail, Warning), (Fail, Critical), (Fail, Critical)]
        );
        assert_eq!(
            Scene::new(balanced_web_app()).at(ScaleTier::Enterprise, clients_reach_backend),
            (Pass, Warning)
        );
        let internal = GraphBuilder::new().node("worker", "Worker").build();
        assert!(Scene::new(internal).eval(ScaleTier::Enterprise, clients_reach_backend).is_none());
    }

    #[test]
    fn exposed_database_is_critical_beyond_prototype() {
        let store = GraphBuilder::new()
            .node("web-client", "Client")
            .node("postgres", "Postgres")
            .edge("Client", "Postgres")
            .build();
        assert_eq!(
            Scene::new(store).across_tiers(database_exposed),
            vec![(Fail, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        assert_eq!(Scene::new(basic_web_app()).across_tiers(database_exposed), vec![(Pass, Critical); 5]);
    }

    #[test]
    fn authentication_required_from_growth() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(no_authentication),
            vec![(Pass, Info), (Advisory, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        assert_eq!(gateway_app().at(ScaleTier::Enterprise, no_authentication), (Pass, Warning));
        let with_auth = GraphBuilder::new()
            .node("web-server", "Server")
            .node("auth-service", "Auth")
            .edge("Server", "Auth")
            .build();
        assert_eq!(Scene::new(with_auth).at(ScaleTier::Enterprise, no_authentication), (Pass, Warning));
    }

    #[test]
    fn firewall_expected_from_scale() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(no_web_firewall),
            vec![(Pass, Info), (Pass, Info), (Advisory, Info), (Fail, Warning), (Fail, Warning)]
        );
        let filtered = GraphBuilder::new()
            .node("web-client", "Client")
            .node("firewall", "WAF")
            .node("web-server", "Server")
            .chain(&["Client", "WAF", "Server"])
            .build();
        assert_eq!(Scene::new(filtered).at(ScaleTier::Enterprise, no_web_firewall), (Pass, Warning));
    }

    #[test]
    fn rate_limits_fail_only_at_enterprise() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(no_rate_limiting),
            vec![(Pass, Info), (Pass, Info), (Advisory, Warning), (Advisory, Warning), (Fail, Warning)]
        );
        assert_eq!(gateway_app().at(ScaleTier::Enterprise, no_rate_limiting), (Pass, Warning));
    }
}
