//! AI best-practice checks, run only when AI components exist

use super::check::{by_tier, labels, CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::Role;

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::NoGuardrails, score_impact: 30.0, evaluate: no_guardrails },
    Rule { id: CheckId::NoSemanticCache, score_impact: 15.0, evaluate: no_semantic_cache },
    Rule { id: CheckId::LlmWithoutRetrieval, score_impact: 20.0, evaluate: llm_without_retrieval },
    Rule { id: CheckId::NoModelFallback, score_impact: 15.0, evaluate: no_model_fallback },
    Rule { id: CheckId::NoAiEvaluation, score_impact: 10.0, evaluate: no_ai_evaluation },
    Rule { id: CheckId::GpuSaturation, score_impact: 10.0, evaluate: gpu_saturation },
];

fn has_inference(input: &CheckInput<'_>) -> bool {
    input.has(|p| p.role.is_inference())
}

fn no_guardrails(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_inference(input) {
        return None;
    }
    if input.has_role(Role::Guardrails) {
        return Some(Finding::pass(Severity::Critical, "Model output passes through guardrails"));
    }
    let message = "Model output reaches users unfiltered";
    let finding = if input.thresholds().requires_guardrails {
        Finding::fail(Severity::Critical, message)
    } else {
        Finding::advisory(Severity::Warning, message)
    };
    Some(finding.recommend("Add guardrails for input and output filtering"))
}

fn no_semantic_cache(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_inference(input) {
        return None;
    }
    if input.has_role(Role::SemanticCache) {
        return Some(Finding::pass(Severity::Warning, "Similar prompts are served from a semantic cache"));
    }
    if input.tier() < ScaleTier::Growth {
        return Some(Finding::pass(Severity::Info, "A semantic cache is optional at this scale"));
    }
    Some(
        Finding::advisory(Severity::Warning, "Every prompt pays full inference cost")
            .recommend("Add a semantic cache to cut latency and cost"),
    )
}

fn llm_without_retrieval(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has_role(Role::Llm) {
        return None;
    }
    if input.has(|p| p.role.is_retrieval()) {
        return Some(Finding::pass(Severity::Warning, "Model calls are grounded by retrieval"));
    }
    let message = "The LLM answers without retrieved context";
    let finding = match input.tier() {
        ScaleTier::Prototype => Finding::advisory(Severity::Info, message),
        ScaleTier::Startup => Finding::advisory(Severity::Warning, message),
        _ => Finding::fail(Severity::Warning, message),
    };
    Some(finding.recommend("Ground prompts with a vector database or RAG pipeline"))
}

fn no_model_fallback(input: &CheckInput<'_>) -> Option<Finding> {
    let models = input.nodes_where(|p| p.role.is_inference());
    if models.is_empty() {
        return None;
    }
    if models.len() >= 2 || models.iter().any(|(n, _)| n.replicas() >= 2) {
        return Some(Finding::pass(Severity::Warning, "A second model endpoint can take over"));
    }
    let message = format!(
        "{} is the only model endpoint",
        labels(models.iter().map(|(n, _)| *n))
    );
    let finding = if input.tier() >= ScaleTier::Growth {
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Enterprise, Severity::Critical, Severity::Warning),
            message,
        )
    } else {
        Finding::advisory(Severity::Info, message)
    };
    Some(finding.recommend("Add a fallback provider or a self-hosted model"))
}

fn no_ai_evaluation(input: &CheckInput<'_>) -> Option<Finding> {
    if !has_inference(input) {
        return None;
    }
    if input.has_role(Role::Evaluator) {
        return Some(Finding::pass(Severity::Warning, "Model quality is evaluated continuously"));
    }
    let message = "Model quality is not measured";
    let finding = match input.tier() {
        ScaleTier::Scale | ScaleTier::Enterprise => Finding::fail(Severity::Warning, message),
        ScaleTier::Growth => Finding::advisory(Severity::Info, message),
        _ => return Some(Finding::pass(Severity::Info, "Evaluation can wait at this scale")),
    };
    Some(finding.recommend("Add an evaluator that scores sampled responses"))
}

fn gpu_saturation(input: &CheckInput<'_>) -> Option<Finding> {
    let pressure = input.metrics.ai.as_ref()?.gpu_pressure;
    if !has_inference(input) {
        return None;
    }
    if pressure < 0.8 {
        return Some(Finding::pass(
            Severity::Info,
            format!("Inference runs at {:.0}% of capacity", pressure * 100.0),
        ));
    }
    let message = format!("Inference runs at {:.0}% of capacity", pressure * 100.0);
    let finding = if pressure < 1.0 {
        Finding::advisory(Severity::Warning, message)
    } else {
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Scale, Severity::Critical, Severity::Warning),
            message,
        )
    };
    Some(finding.recommend("Add inference replicas or cache responses"))
}
