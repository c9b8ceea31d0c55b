//! AI-specific metrics

use crate::graph_view::GraphView;
use crate::propagation::LoadMap;
use archsim_model::{Category, Role};
use serde::{Deserialize, Serialize};

/// Tokens generated per LLM request
pub const TOKENS_PER_REQUEST: f64 = 750.0;

/// Price per thousand tokens
const PRICE_PER_1K_TOKENS: f64 = 0.002;

/// Metrics reported when the graph contains AI components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMetrics {
    /// Tokens per second across inference nodes
    pub token_throughput: f64,
    /// Worst inference utilization in `[0, 1]`
    pub gpu_pressure: f64,
    /// Estimated time to first token
    pub time_to_first_token_ms: f64,
    /// Heuristic hallucination risk in `[0.02, 1]`
    pub hallucination_risk: f64,
    /// Retrieval accuracy when retrieval exists
    pub rag_accuracy: Option<f64>,
    /// Steps per agent run when agents exist
    pub agent_step_count: Option<u32>,
    /// Inference cost per thousand requests
    pub ai_cost_per_1k_requests: f64,
}

pub(super) fn ai_metrics(view: &GraphView<'_>, load: &LoadMap) -> Option<AiMetrics> {
    if !view.known().any(|(_, p)| p.category == Category::Ai) {
        return None;
    }
    let has = |role: Role| view.known().any(|(_, p)| p.role == role);

    let mut served = 0.0;
    let mut gpu_pressure: f64 = 0.0;
    let mut llm_latency: f64 = 0.0;
    for (node, profile) in view.known().filter(|(_, p)| p.role.is_inference()) {
        let capacity = profile.effective_capacity(node.replicas());
        let incoming = load.get(&node.id).copied().unwrap_or(0.0);
        served += incoming.min(capacity);
        if capacity > 0.0 {
            gpu_pressure = gpu_pressure.max(incoming / capacity);
        }
        llm_latency = llm_latency.max(profile.base_latency_ms);
    }
    let gpu_pressure = gpu_pressure.clamp(0.0, 1.0);

    let semantic_cache = has(Role::SemanticCache);
    let mut ttft = 0.35 * llm_latency * (1.0 + gpu_pressure);
    if semantic_cache {
        ttft *= 0.5;
    }

    let retrieval = has(Role::VectorDb) || has(Role::RagPipeline);
    let mut risk = 0.35;
    if retrieval {
        risk -= 0.15;
    }
    if has(Role::Guardrails) {
        risk -= 0.10;
    }
    if has(Role::Evaluator) {
        risk -= 0.05;
    }

    let rag_accuracy = retrieval.then(|| {
        let mut accuracy = 0.72;
        if has(Role::Embedding) {
            accuracy += 0.08;
        }
        if has(Role::RagPipeline) {
            accuracy += 0.05;
        }
        f64::min(accuracy, 0.95)
    });

    let agents = view.known().filter(|(_, p)| p.role == Role::Agent).count() as u32;

    let mut cost = TOKENS_PER_REQUEST / 1000.0 * PRICE_PER_1K_TOKENS * 1000.0;
    if semantic_cache {
        cost *= 0.7;
    }

    Some(AiMetrics {
        token_throughput: served * TOKENS_PER_REQUEST,
        gpu_pressure,
        time_to_first_token_ms: ttft,
        hallucination_risk: f64::clamp(risk, 0.02, 1.0),
        rag_accuracy,
        agent_step_count: (agents > 0).then_some(agents * 3),
        ai_cost_per_1k_requests: cost,
    })
}

#[cfg(test)]
mod tests {
    use crate::metrics::compute_metrics;
    use archsim_model::Catalog;
    use archsim_test_utils::{ai_assistant, GraphBuilder};

    #[test]
    fn absent_without_ai_nodes() {
        let store = archsim_test_utils::basic_web_app();
        let m = compute_metrics(Catalog::builtin(), store.nodes(), store.edges(), 100.0);
        assert!(m.ai.is_none());
    }

    #[test]
    fn assistant_with_vector_db() {
        let store = ai_assistant();
        let m = compute_metrics(Catalog::builtin(), store.nodes(), store.edges(), 30.0);
        let ai = m.ai.unwrap();
        assert!((ai.hallucination_risk - 0.20).abs() < 1e-9);
        assert!((ai.rag_accuracy.unwrap() - 0.72).abs() < 1e-9);
        assert!(ai.agent_step_count.is_none());
        assert!((ai.ai_cost_per_1k_requests - 1.5).abs() < 1e-9);
        assert!(ai.gpu_pressure >= 0.0 && ai.gpu_pressure <= 1.0);
    }

    #[test]
    fn semantic_cache_halves_first_token() {
        let plain = GraphBuilder::new()
            .node("web-client", "Client")
            .node("llm-api", "LLM")
            .edge("Client", "LLM")
            .build();
        let cached = GraphBuilder::new()
            .node("web-client", "Client")
            .node("semantic-cache", "Cache")
            .node("llm-api", "LLM")
            .chain(&["Client", "Cache", "LLM"])
            .build();
        let a = compute_metrics(Catalog::builtin(), plain.nodes(), plain.edges(), 10.0).ai.unwrap();
        let b = compute_metrics(Catalog::builtin(), cached.nodes(), cached.edges(), 10.0).ai.unwrap();
        assert!((b.time_to_first_token_ms * 2.0 - a.time_to_first_token_ms).abs() < 1e-9);
        assert!((b.ai_cost_per_1k_requests - 1.05).abs() < 1e-9);
    }
}
