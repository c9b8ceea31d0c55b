//! Observability checks

use super::check::{CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::{Category, Role};

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::NoMonitoring, score_impact: 40.0, evaluate: no_monitoring },
    Rule { id: CheckId::NoCentralizedLogging, score_impact: 30.0, evaluate: no_logging },
    Rule { id: CheckId::NoDistributedTracing, score_impact: 30.0, evaluate: no_tracing },
];

fn has_services(input: &CheckInput<'_>) -> bool {
    input.has(|p| !p.category.is_passive())
}

fn no_monitoring(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_services(input) {
        return None;
    }
    if input.has(|p| matches!(p.role, Role::Monitoring | Role::Alerting)) {
        return Some(Finding::pass(Severity::Warning, "Metrics are collected"));
    }
    let message = "No monitoring; outages are found by users";
    let finding = if input.thresholds().requires_observability {
        let severity = if input.tier() >= ScaleTier::Scale {
            Severity::Critical
        } else {
            Severity::Warning
        };
        Finding::fail(severity, message)
    } else if input.tier() == ScaleTier::Startup {
        Finding::advisory(Severity::Info, message)
    } else {
        return Some(Finding::pass(Severity::Info, "Monitoring is optional for a prototype"));
    };
    Some(finding.recommend("Add a monitoring component with alerting"))
}

fn no_logging(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_services(input) {
        return None;
    }
    if input.has_role(Role::Logging) {
        return Some(Finding::pass(Severity::Warning, "Logs are centralized"));
    }
    let message = "Logs stay on individual hosts";
    let finding = if input.thresholds().requires_observability {
        Finding::fail(Severity::Warning, message)
    } else if input.tier() == ScaleTier::Startup {
        Finding::advisory(Severity::Info, message)
    } else {
        return Some(Finding::pass(Severity::Info, "Local logs are fine for a prototype"));
    };
    Some(finding.recommend("Ship logs to a central logging service"))
}

fn no_tracing(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_services(input) {
        return None;
    }
    if input.has_role(Role::Tracing) {
        return Some(Finding::pass(Severity::Warning, "Requests are traced across services"));
    }
    let services = input
        .nodes_where(|p| p.category == Category::Compute)
        .len();
    let message = format!("{services} services with no distributed tracing");
    let finding = match input.tier() {
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(Severity::Warning, message),
        ScaleTier::Growth => Finding::advisory(Severity::Info, message),
        _ => return Some(Finding::pass(Severity::Info, "Tracing is optional at this scale")),
    };
    Some(finding.recommend("Add distributed tracing"))
}
