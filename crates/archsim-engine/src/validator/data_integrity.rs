//! Data integrity checks

use super::check::{by_tier, labels, CheckId, CheckInput, Finding, Rule, Severity};
use crate::scale_tier::ScaleTier;
use archsim_model::{Category, Role};
use std::collections::BTreeSet;

#[rustfmt::skip]
pub(crate) const RULES: &[Rule] = &[
    Rule { id: CheckId::NoBackupStorage, score_impact: 30.0, evaluate: no_backup_storage },
    Rule { id: CheckId::MixedConsistency, score_impact: 20.0, evaluate: mixed_consistency },
    Rule { id: CheckId::CacheWithoutDurableStore, score_impact: 20.0, evaluate: cache_without_durable_store },
    Rule { id: CheckId::QueueWithoutConsumer, score_impact: 15.0, evaluate: queue_without_consumer },
    Rule { id: CheckId::OrphanedStorage, score_impact: 15.0, evaluate: orphaned_storage },
];

fn no_backup_storage(input: &CheckInput<'_>) -> Option<Finding> {
    if !input.has(|p| p.role.is_database()) {
        return None;
    }
    if input.has_role(Role::ObjectStore) {
        return Some(Finding::pass(Severity::Warning, "Backups land in object storage"));
    }
    let message = "Databases have no backup destination";
    let finding = match input.tier() {
        ScaleTier::Prototype => return Some(Finding::pass(Severity::Info, "Backups are optional for a prototype")),
        ScaleTier::Startup => Finding::advisory(Severity::Info, message),
        ScaleTier::Growth | ScaleTier::Scale => Finding::fail(Severity::Warning, message),
        ScaleTier::Enterprise => Finding::fail(Severity::Critical, message),
    };
    Some(finding.recommend("Ship database snapshots to object storage"))
}

fn mixed_consistency(input: &CheckInput<'_>) -> Option<Finding> {
    let stores = input.nodes_where(|p| p.category == Category::Storage);
    if stores.len() < 2 {
        return None;
    }
    let models: BTreeSet<_> = stores.iter().map(|(_, p)| p.consistency).collect();
    if models.len() < 2 {
        return Some(Finding::pass(Severity::Warning, "All stores share one consistency model"));
    }
    let names: Vec<String> = models.iter().map(ToString::to_string).collect();
    let message = format!("Stores mix {} consistency", names.join(" and "));
    let finding = match input.tier() {
        ScaleTier::Prototype | ScaleTier::Startup => return Some(Finding::pass(Severity::Info, message)),
        ScaleTier::Growth | ScaleTier::Scale => Finding::advisory(Severity::Warning, message),
        ScaleTier::Enterprise => Finding::fail(Severity::Warning, message),
    };
    Some(finding.recommend("Document which data tolerates stale reads and keep writes on the strong store"))
}

fn cache_without_durable_store(input: &CheckInput<'_>) -> Option<Finding> {
    let caches = input.nodes_where(|p| p.role.is_cache());
    if caches.is_empty() {
        return None;
    }
    if input.has(|p| p.role.is_database() || p.role == Role::ObjectStore) {
        return Some(Finding::pass(Severity::Warning, "Cached data has a durable source of truth"));
    }
    let message = format!("{} holds data with no durable store behind it", labels(caches.iter().map(|(n, _)| *n)));
    let finding = if input.tier() == ScaleTier::Prototype {
        Finding::advisory(Severity::Warning, message)
    } else {
        Finding::fail(Severity::Critical, message)
    };
    Some(finding.recommend("Back the cache with a database"))
}

fn queue_without_consumer(input: &CheckInput<'_>) -> Option<Finding> {
    let queues = input.nodes_where(|p| p.role.is_queue());
    if queues.is_empty() {
        return None;
    }
    let stranded: Vec<_> = queues
        .iter()
        .filter(|(n, _)| input.view.out_degree(n.id) == 0)
        .map(|(n, _)| *n)
        .collect();
    if stranded.is_empty() {
        return Some(Finding::pass(Severity::Warning, "Every queue has a consumer"));
    }
    Some(
        Finding::fail(
            by_tier(input.tier(), ScaleTier::Scale, Severity::Critical, Severity::Warning),
            format!("{} has no consumer; messages pile up", labels(stranded.iter().copied())),
        )
        .recommend("Connect a worker that drains the queue"),
    )
}

fn orphaned_storage(input: &CheckInput<'_>) -> Option<Finding> {
    let stores = input.nodes_where(|p| p.category == Category::Storage);
    if stores.is_empty() {
        return None;
    }
    let orphans: Vec<_> = stores
        .iter()
        .filter(|(n, _)| input.view.in_degree(n.id) == 0)
        .map(|(n, _)| *n)
        .collect();
    if orphans.is_empty() {
        return Some(Finding::pass(Severity::Info, "Every store is written by something"));
    }
    let message = format!("{} is not connected to any writer", labels(orphans.iter().copied()));
    let finding = if input.tier() == ScaleTier::Prototype {
        Finding::advisory(Severity::Info, message)
    } else {
        Finding::fail(Severity::Warning, message)
    };
    Some(finding.recommend("Connect the store or remove it"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::check::fixture::Scene;
    use crate::validator::check::CheckOutcome::{Advisory, Fail, Pass};
    use archsim_test_utils::{basic_web_app, GraphBuilder};
    use pretty_assertions::assert_eq;
    use Severity::{Critical, Info, Warning};

    fn server_with(kind: &str) -> GraphBuilder {
        GraphBuilder::new()
            .node("web-server", "Server")
            .node(kind, "Store")
            .edge("Server", "Store")
    }

    #[test]
    fn backups_escalate_to_critical_at_enterprise() {
        assert_eq!(
            Scene::new(basic_web_app()).across_tiers(no_backup_storage),
            vec![(Pass, Info), (Advisory, Info), (Fail, Warning), (Fail, Warning), (Fail, Critical)]
        );
        let backed_up = server_with("postgres")
            .node("object-storage", "Backups")
            .edge("Store", "Backups")
            .build();
        assert_eq!(Scene::new(backed_up).at(ScaleTier::Enterprise, no_backup_storage), (Pass, Warning));
        let cache_only = server_with("redis").build();
        assert!(Scene::new(cache_only).eval(ScaleTier::Enterprise, no_backup_storage).is_none());
    }

    #[test]
    fn mixed_consistency_matters_from_growth() {
        let mixed = server_with("postgres")
            .node("redis", "Cache")
            .edge("Server", "Cache")
            .build();
        assert_eq!(
            Scene::new(mixed).across_tiers(mixed_consistency),
            vec![(Pass, Info), (Pass, Info), (Advisory, Warning), (Advisory, Warning), (Fail, Warning)]
        );
        let uniform = server_with("postgres")
            .node("mysql", "Orders")
            .edge("Server", "Orders")
            .build();
        assert_eq!(Scene::new(uniform).at(ScaleTier::Enterprise, mixed_consistency), (Pass, Warning));
        assert!(Scene::new(basic_web_app()).eval(ScaleTier::Enterprise, mixed_consistency).is_none());
    }

    #[test]
    fn cache_needs_a_durable_store() {
        let volatile = server_with("redis").build();
        assert_eq!(
            Scene::new(volatile).across_tiers(cache_without_durable_store),
            vec![(Advisory, Warning), (Fail, Critical), (Fail, Critical), (Fail, Critical), (Fail, Critical)]
        );
        let durable = server_with("redis")
            .node("object-storage", "Blobs")
            .edge("Server", "Blobs")
            .build();
        assert_eq!(
            Scene::new(durable).at(ScaleTier::Enterprise, cache_without_durable_store),
            (Pass, Warning)
        );
        assert!(Scene::new(basic_web_app())
            .eval(ScaleTier::Enterprise, cache_without_durable_store)
            .is_none());
    }

    #[test]
    fn queue_without_consumer_is_critical_from_scale() {
        let stranded = server_with("message-queue").build();
        assert_eq!(
            Scene::new(stranded).across_tiers(queue_without_consumer),
            vec![(Fail, Warning), (Fail, Warning), (Fail, Warning), (Fail, Critical), (Fail, Critical)]
        );
        let drained = server_with("message-queue")
            .node("worker", "Worker")
            .edge("Store", "Worker")
            .build();
        assert_eq!(Scene::new(drained).at(ScaleTier::Enterprise, queue_without_consumer), (Pass, Warning));
    }

    #[test]
    fn orphaned_store_is_advisory_only_for_prototypes() {
        let store = GraphBuilder::new()
            .node("web-server", "Server")
            .node("postgres", "Postgres")
            .node("redis", "Loose")
            .edge("Server", "Postgres")
            .build();
        assert_eq!(
            Scene::new(store).across_tiers(orphaned_storage),
            vec![(Advisory, Info), (Fail, Warning), (Fail, Warning), (Fail, Warning), (Fail, Warning)]
        );
        assert_eq!(Scene::new(basic_web_app()).across_tiers(orphaned_storage), vec![(Pass, Info); 5]);
    }
}
