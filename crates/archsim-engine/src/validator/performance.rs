//! Performance checks

use super::check::{by_tier, CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::{Category, Role};

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::LatencyBudget, score_impact: 30.0, evaluate: latency_budget },
    Rule { id: CheckId::ThroughputCapacity, score_impact: 25.0, evaluate: throughput_capacity },
    Rule { id: CheckId::MissingCache, score_impact: 15.0, evaluate: missing_cache },
    Rule { id: CheckId::NoAsyncBuffer, score_impact: 10.0, evaluate: no_async_buffer },
    Rule { id: CheckId::ExcessiveNetworkHops, score_impact: 10.0, evaluate: excessive_hops },
    Rule { id: CheckId::NoCdn, score_impact: 10.0, evaluate: no_cdn },
];

/// Hop budget per tier; deeper chains add tail latency
fn hop_budget(tier: ScaleTier) -> usize {
    match tier {
        ScaleTier::Prototype | ScaleTier::Startup => 8,
        ScaleTier::Growth => 7,
        ScaleTier::Scale => 6,
        ScaleTier::Enterprise => 5,
    }
}

fn latency_budget(input: &CheckInput<'_>) -> Option<Finding> {
    let budget = input.thresholds().max_p99_ms;
    let p99 = input.metrics.latency_p99_ms;
    if p99 <= budget {
        return Some(Finding::pass(
            Severity::Warning,
            format!("P99 {p99:.0}ms is within the {budget:.0}ms budget"),
        ));
    }
    let message = format!("P99 {p99:.0}ms exceeds the {budget:.0}ms budget for {} scale", input.tier());
    let finding = if p99 <= budget * 1.5 {
        Finding::advisory(Severity::Warning, message)
    } else {
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Growth, Severity::Critical, Severity::Warning),
            message,
        )
    };
    Some(finding.recommend("Shorten the critical path or add a cache in front of slow components"))
}

fn throughput_capacity(input: &CheckInput<'_>) -> Option<Finding> {
    let load = input.ctx.traffic_load;
    if load <= 0.0 {
        return None;
    }
    let served = input.metrics.throughput / load;
    if served >= 0.999 {
        return Some(Finding::pass(
            Severity::Warning,
            format!("Serves the full {load:.0} req/s"),
        ));
    }
    let message = format!(
        "Serves {:.0} of {load:.0} req/s ({:.0}%)",
        input.metrics.throughput,
        served * 100.0
    );
    let finding = if served >= 0.8 {
        Finding::advisory(Severity::Warning, message)
    } else {
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Startup, Severity::Critical, Severity::Warning),
            message,
        )
    };
    Some(finding.recommend("Add replicas to the bottleneck component"))
}

fn missing_cache(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.role.is_database()) {
        return None;
    }
    if input.has(|p| p.role.is_cache()) {
        return Some(Finding::pass(Severity::Warning, "A cache absorbs repeated reads"));
    }
    if input.thresholds().requires_cache {
        return Some(
            Finding::fail(
                by_tier(input.tier(), ScaleTier::Scale, Severity::Critical, Severity::Warning),
                format!("Every read hits the database at {} scale", input.tier()),
            )
            .recommend("Add a cache in front of the database"),
        );
    }
    Some(Finding::pass(Severity::Info, "A cache is optional at this scale"))
}

fn no_async_buffer(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Compute) {
        return None;
    }
    if input.has(|p| p.role.is_queue()) {
        return Some(Finding::pass(Severity::Warning, "A queue buffers bursts of work"));
    }
    let pattern = input.ctx.traffic_pattern;
    if !pattern.is_bursty() {
        return Some(Finding::pass(Severity::Info, format!("{pattern} traffic needs no buffer")));
    }
    let message = format!("{pattern} traffic hits compute with no queue to absorb bursts");
    let finding = if input.tier() >= ScaleTier::Growth {
        Finding::fail(Severity::Warning, message)
    } else {
        Finding::advisory(Severity::Info, message)
    };
    Some(finding.recommend("Move slow work behind a message queue"))
}

fn excessive_hops(input: &CheckInput<'_>) -> Option<Finding> {
    let hops = input.metrics.network_hops;
    let budget = hop_budget(input.tier());
    if hops <= budget {
        return Some(Finding::pass(Severity::Info, format!("{hops} hops on the critical path")));
    }
    let message = format!("{hops} hops on the critical path, budget is {budget}");
    let finding = if hops <= budget + 2 {
        Finding::advisory(Severity::Info, message)
    } else {
        Finding::fail(Severity::Warning, message)
    };
    Some(finding.recommend("Collapse pass-through services on the request path"))
}

fn no_cdn(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.category == Category::Clients) {
        return None;
    }
    if input.has_role(Role::Cdn) {
        return Some(Finding::pass(Severity::Warning, "Static content is served from a CDN"));
    }
    let finding = match input.tier() {
        ScaleTier::Scale | ScaleTier::Enterprise => {
            Finding::fail(Severity::Warning, "Client traffic reaches origin with no CDN")
        }
        ScaleTier::Growth => Finding::advisory(Severity::Info, "Client traffic reaches origin with no CDN"),
        _ => return Some(Finding::pass(Severity::Info, "A CDN is optional at this scale")),
    };
    Some(finding.recommend("Serve static assets through a CDN"))
}
