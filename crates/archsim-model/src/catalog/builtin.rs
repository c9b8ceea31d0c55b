//! Built-in component table

use super::{CapAlignment, Catalog, Category, ComponentProfile, ConsistencyModel, Role};
use serde_json::json;
use std::collections::BTreeMap;

struct Row {
    kind: &'static str,
    name: &'static str,
    category: Category,
    role: Role,
    throughput: f64,
    latency: f64,
    failure: f64,
    scalable: bool,
    sla: f64,
    consistency: ConsistencyModel,
    cap: CapAlignment,
    cost: f64,
}

use CapAlignment::{AP, CA, CP};
use Category::{Ai, Clients, Compute, LoadBalancing, Messaging, Network, Observability, Storage};
use ConsistencyModel::{Causal, Eventual, Strong};

#[rustfmt::skip]
const ROWS: &[Row] = &[
    // clients
    Row { kind: "web-client", name: "Web Client", category: Clients, role: Role::Client, throughput: 1_000_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 1.0, consistency: Strong, cap: CA, cost: 0.0 },
    Row { kind: "mobile-client", name: "Mobile Client", category: Clients, role: Role::Client, throughput: 1_000_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 1.0, consistency: Strong, cap: CA, cost: 0.0 },
    // load balancing
    Row { kind: "load-balancer", name: "Load Balancer", category: LoadBalancing, role: Role::LoadBalancer, throughput: 50_000.0, latency: 1.0, failure: 0.01, scalable: true, sla: 0.9999, consistency: Strong, cap: CA, cost: 25.0 },
    Row { kind: "api-gateway", name: "API Gateway", category: LoadBalancing, role: Role::ApiGateway, throughput: 20_000.0, latency: 5.0, failure: 0.02, scalable: true, sla: 0.9995, consistency: Strong, cap: CA, cost: 50.0 },
    Row { kind: "cdn", name: "CDN", category: LoadBalancing, role: Role::Cdn, throughput: 100_000.0, latency: 10.0, failure: 0.005, scalable: true, sla: 0.9999, consistency: Eventual, cap: AP, cost: 80.0 },
    // compute
    Row { kind: "web-server", name: "Web Server", category: Compute, role: Role::Compute, throughput: 2_000.0, latency: 20.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Strong, cap: CA, cost: 70.0 },
    Row { kind: "app-server", name: "Application Server", category: Compute, role: Role::Compute, throughput: 1_500.0, latency: 30.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Strong, cap: CA, cost: 90.0 },
    Row { kind: "microservice", name: "Microservice", category: Compute, role: Role::Compute, throughput: 1_000.0, latency: 15.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Strong, cap: CA, cost: 60.0 },
    Row { kind: "serverless-function", name: "Serverless Function", category: Compute, role: Role::Serverless, throughput: 3_000.0, latency: 50.0, failure: 0.03, scalable: true, sla: 0.9995, consistency: Strong, cap: CA, cost: 20.0 },
    Row { kind: "worker", name: "Background Worker", category: Compute, role: Role::Worker, throughput: 500.0, latency: 100.0, failure: 0.04, scalable: true, sla: 0.999, consistency: Strong, cap: CA, cost: 50.0 },
    // storage
    Row { kind: "postgres", name: "PostgreSQL", category: Storage, role: Role::Database, throughput: 5_000.0, latency: 5.0, failure: 0.1, scalable: false, sla: 0.9995, consistency: Strong, cap: CP, cost: 200.0 },
    Row { kind: "mysql", name: "MySQL", category: Storage, role: Role::Database, throughput: 5_000.0, latency: 5.0, failure: 0.1, scalable: false, sla: 0.9995, consistency: Strong, cap: CP, cost: 180.0 },
    Row { kind: "mongodb", name: "MongoDB", category: Storage, role: Role::Database, throughput: 8_000.0, latency: 8.0, failure: 0.08, scalable: true, sla: 0.999, consistency: Causal, cap: CP, cost: 250.0 },
    Row { kind: "cassandra", name: "Cassandra", category: Storage, role: Role::WideColumnDatabase, throughput: 20_000.0, latency: 4.0, failure: 0.05, scalable: true, sla: 0.9999, consistency: Eventual, cap: AP, cost: 400.0 },
    Row { kind: "redis", name: "Redis", category: Storage, role: Role::Cache, throughput: 50_000.0, latency: 1.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 100.0 },
    Row { kind: "memcached", name: "Memcached", category: Storage, role: Role::Cache, throughput: 60_000.0, latency: 1.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 80.0 },
    Row { kind: "object-storage", name: "Object Storage", category: Storage, role: Role::ObjectStore, throughput: 10_000.0, latency: 50.0, failure: 0.01, scalable: true, sla: 0.9999, consistency: Strong, cap: AP, cost: 30.0 },
    Row { kind: "elasticsearch", name: "Elasticsearch", category: Storage, role: Role::Search, throughput: 5_000.0, latency: 20.0, failure: 0.08, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 300.0 },
    Row { kind: "data-warehouse", name: "Data Warehouse", category: Storage, role: Role::Warehouse, throughput: 500.0, latency: 500.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Strong, cap: CP, cost: 1_500.0 },
    // messaging
    Row { kind: "message-queue", name: "Message Queue", category: Messaging, role: Role::Queue, throughput: 10_000.0, latency: 5.0, failure: 0.02, scalable: true, sla: 0.9995, consistency: Eventual, cap: AP, cost: 60.0 },
    Row { kind: "kafka", name: "Kafka", category: Messaging, role: Role::Stream, throughput: 100_000.0, latency: 5.0, failure: 0.01, scalable: true, sla: 0.9999, consistency: Causal, cap: CP, cost: 500.0 },
    Row { kind: "pub-sub", name: "Pub/Sub", category: Messaging, role: Role::Queue, throughput: 50_000.0, latency: 10.0, failure: 0.01, scalable: true, sla: 0.9995, consistency: Eventual, cap: AP, cost: 40.0 },
    // observability
    Row { kind: "monitoring", name: "Monitoring", category: Observability, role: Role::Monitoring, throughput: 100_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 50.0 },
    Row { kind: "logging", name: "Log Aggregation", category: Observability, role: Role::Logging, throughput: 100_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 60.0 },
    Row { kind: "tracing", name: "Distributed Tracing", category: Observability, role: Role::Tracing, throughput: 100_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 40.0 },
    Row { kind: "alerting", name: "Alerting", category: Observability, role: Role::Alerting, throughput: 100_000.0, latency: 0.0, failure: 0.0, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 20.0 },
    // network
    Row { kind: "dns", name: "DNS", category: Network, role: Role::Dns, throughput: 1_000_000.0, latency: 1.0, failure: 0.001, scalable: true, sla: 0.99999, consistency: Eventual, cap: AP, cost: 5.0 },
    Row { kind: "firewall", name: "Web Application Firewall", category: Network, role: Role::Firewall, throughput: 50_000.0, latency: 1.0, failure: 0.01, scalable: true, sla: 0.9999, consistency: Strong, cap: CA, cost: 40.0 },
    Row { kind: "auth-service", name: "Auth Service", category: Network, role: Role::Auth, throughput: 5_000.0, latency: 10.0, failure: 0.02, scalable: true, sla: 0.9995, consistency: Strong, cap: CP, cost: 60.0 },
    Row { kind: "rate-limiter", name: "Rate Limiter", category: Network, role: Role::RateLimiter, throughput: 80_000.0, latency: 1.0, failure: 0.01, scalable: true, sla: 0.9999, consistency: Eventual, cap: AP, cost: 30.0 },
    // ai
    Row { kind: "llm-api", name: "LLM API", category: Ai, role: Role::Llm, throughput: 100.0, latency: 800.0, failure: 0.1, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 500.0 },
    Row { kind: "gpu-inference", name: "GPU Inference Server", category: Ai, role: Role::GpuInference, throughput: 50.0, latency: 400.0, failure: 0.15, scalable: true, sla: 0.995, consistency: Eventual, cap: AP, cost: 2_500.0 },
    Row { kind: "vector-db", name: "Vector Database", category: Ai, role: Role::VectorDb, throughput: 2_000.0, latency: 20.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 250.0 },
    Row { kind: "embedding-service", name: "Embedding Service", category: Ai, role: Role::Embedding, throughput: 1_000.0, latency: 50.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 150.0 },
    Row { kind: "rag-pipeline", name: "RAG Pipeline", category: Ai, role: Role::RagPipeline, throughput: 500.0, latency: 100.0, failure: 0.05, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 120.0 },
    Row { kind: "agent-orchestrator", name: "Agent Orchestrator", category: Ai, role: Role::Agent, throughput: 200.0, latency: 200.0, failure: 0.08, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 180.0 },
    Row { kind: "guardrails", name: "Guardrails", category: Ai, role: Role::Guardrails, throughput: 2_000.0, latency: 30.0, failure: 0.02, scalable: true, sla: 0.9995, consistency: Strong, cap: CA, cost: 80.0 },
    Row { kind: "semantic-cache", name: "Semantic Cache", category: Ai, role: Role::SemanticCache, throughput: 20_000.0, latency: 5.0, failure: 0.02, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 90.0 },
    Row { kind: "llm-evaluator", name: "LLM Evaluator", category: Ai, role: Role::Evaluator, throughput: 500.0, latency: 0.0, failure: 0.02, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 70.0 },
    Row { kind: "model-registry", name: "Model Registry", category: Ai, role: Role::ModelRegistry, throughput: 1_000.0, latency: 10.0, failure: 0.01, scalable: true, sla: 0.999, consistency: Strong, cap: CP, cost: 100.0 },
    Row { kind: "training-cluster", name: "Training Cluster", category: Ai, role: Role::TrainingCluster, throughput: 10.0, latency: 0.0, failure: 0.05, scalable: true, sla: 0.99, consistency: Strong, cap: CP, cost: 12_000.0 },
    Row { kind: "feature-store", name: "Feature Store", category: Ai, role: Role::FeatureStore, throughput: 5_000.0, latency: 10.0, failure: 0.03, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 400.0 },
    Row { kind: "drift-detector", name: "Drift Detector", category: Ai, role: Role::DriftDetector, throughput: 1_000.0, latency: 0.0, failure: 0.01, scalable: true, sla: 0.999, consistency: Eventual, cap: AP, cost: 60.0 },
    Row { kind: "ab-test-controller", name: "A/B Test Controller", category: Ai, role: Role::AbTestController, throughput: 10_000.0, latency: 2.0, failure: 0.01, scalable: true, sla: 0.9995, consistency: Strong, cap: CP, cost: 50.0 },
];

fn default_config(kind: &str) -> BTreeMap<String, serde_json::Value> {
    let pairs: Vec<(&str, serde_json::Value)> = match kind {
        "load-balancer" => vec![("algorithm", json!("round-robin")), ("health_check_interval_s", json!(10))],
        "api-gateway" => vec![("auth", json!("jwt")), ("rate_limit_rps", json!(1000))],
        "cdn" => vec![("ttl_s", json!(3600))],
        "redis" | "memcached" => vec![("eviction", json!("lru")), ("ttl_s", json!(300))],
        "postgres" | "mysql" => vec![("pool_size", json!(20))],
        "message-queue" | "pub-sub" => vec![("delivery", json!("at-least-once"))],
        "kafka" => vec![("partitions", json!(12)), ("replication_factor", json!(3))],
        "llm-api" | "gpu-inference" => vec![("max_tokens", json!(1024)), ("temperature", json!(0.7))],
        "semantic-cache" => vec![("similarity_threshold", json!(0.92))],
        "rate-limiter" => vec![("limit_rps", json!(500))],
        _ => Vec::new(),
    };
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub(super) fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for row in ROWS {
        catalog.insert(
            row.kind,
            ComponentProfile {
                category: row.category,
                role: row.role,
                display_name: row.name.to_string(),
                max_throughput: row.throughput,
                base_latency_ms: row.latency,
                failure_rate_at_capacity: row.failure,
                horizontally_scalable: row.scalable,
                availability_sla: row.sla,
                consistency: row.consistency,
                cap: row.cap,
                cost_per_instance_month: row.cost,
                default_config: default_config(row.kind),
            },
        );
    }
    catalog
}
