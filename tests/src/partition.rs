#![cfg(test)]
use std::sync::Arc;

use blackhole_common::cluster::BlackholeStatus;
use blackhole_common::config::Config;
use blackhole_common::progress::NoProgress;
use blackhole_common::BlackholeError;
use blackhole_core::Orchestrator;

use crate::fakes::{FakeCluster, FakeWorld, Shared};

const BLOCKED: [&str; 5] = [
    "10.0.0.1",
    "10.0.0.100",
    "10.0.0.2",
    "10.0.0.200",
    "2001:db8::10",
];

/// perf2 is blocked from perf1 (nodes a, b) and perf3 (node c).
fn world() -> FakeWorld {
    FakeWorld::new()
        .cluster(
            FakeCluster::new("perf2", "https://api.perf2.example.com:6443")
                .node("master-0", Some("10.0.0.1"))
                .node("master-1", Some("10.0.0.2"))
                .route("console", "console.apps.perf2.example.com"),
        )
        .cluster(
            FakeCluster::new("perf1", "https://api.perf1.example.com:6443")
                .node("a", None)
                .node("b", None),
        )
        .cluster(FakeCluster::new("perf3", "https://10.1.0.1:6443").node("c", None))
        .dns(
            "api.perf2.example.com",
            &["10.0.0.100", "2001:db8::10", "10.0.0.1"],
        )
        .dns("console.apps.perf2.example.com", &["10.0.0.200"])
}

async fn orchestrator(
    world: &Arc<FakeWorld>,
    blocked: &str,
    targets: &[&str],
) -> Result<Orchestrator, BlackholeError> {
    let shared = Shared(Arc::clone(world));
    let config = Config::new(
        None,
        blocked,
        targets.iter().map(|t| t.to_string()).collect(),
    );

    Orchestrator::connect(
        &config,
        &shared,
        Arc::new(shared.clone()),
        Arc::new(shared.clone()),
        Arc::new(NoProgress),
    )
    .await
}

async fn perf2(world: &Arc<FakeWorld>) -> Orchestrator {
    orchestrator(world, "perf2", &["perf1", "perf3"]).await.unwrap()
}

#[tokio::test]
async fn block_installs_every_blocked_address() {
    let world = Arc::new(world());
    let orchestrator = perf2(&world).await;

    let inventory = orchestrator.inspect_all().await.unwrap();
    assert_eq!(inventory.blocked.all_addresses().to_vec(), BLOCKED);

    orchestrator.block(&inventory).await.unwrap();

    for (context, node) in [("perf1", "a"), ("perf1", "b"), ("perf3", "c")] {
        assert_eq!(world.table(context, node), BLOCKED, "{context}/{node}");
    }
}

#[tokio::test]
async fn block_twice_is_idempotent() {
    let world = Arc::new(world());
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    orchestrator.block(&inventory).await.unwrap();
    let once = world.table("perf1", "a");

    orchestrator.block(&inventory).await.unwrap();
    assert_eq!(world.table("perf1", "a"), once);
}

#[tokio::test]
async fn unblock_on_clean_nodes_sends_no_delete() {
    let world = Arc::new(world());
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    orchestrator.unblock(&inventory).await.unwrap();

    let scripts = world.scripts();
    assert_eq!(scripts.len(), 3);
    assert!(scripts.iter().all(|script| !script.contains("route del")));
}

#[tokio::test]
async fn round_trip_keeps_unrelated_blackholes() {
    let world = Arc::new(world().blackholes("perf1", "a", &["192.0.2.55", "2001:db8::99"]));
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    orchestrator.block(&inventory).await.unwrap();
    orchestrator.unblock(&inventory).await.unwrap();

    assert_eq!(world.table("perf1", "a"), vec!["192.0.2.55", "2001:db8::99"]);
    assert!(world.table("perf1", "b").is_empty());
    assert!(world.table("perf3", "c").is_empty());
}

#[tokio::test]
async fn status_follows_block_and_unblock() {
    let world = Arc::new(world());
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    let before = orchestrator.status(&inventory).await.unwrap();
    assert_eq!(before.cluster, "perf2");
    assert!(before.targets.values().all(|target| target.valid));
    assert_eq!(before.targets["perf1"].nodes["a"], BlackholeStatus::Unblocked);

    orchestrator.block(&inventory).await.unwrap();
    let blocked = orchestrator.status(&inventory).await.unwrap();
    assert!(blocked.targets.values().all(|target| target.valid));
    assert_eq!(blocked.targets["perf1"].nodes["b"], BlackholeStatus::Blocked);
    assert_eq!(blocked.targets["perf3"].nodes["c"], BlackholeStatus::Blocked);

    orchestrator.unblock(&inventory).await.unwrap();
    let after = orchestrator.status(&inventory).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn partly_blocked_node_invalidates_its_cluster() {
    let world = Arc::new(world().blackholes("perf1", "b", &["10.0.0.1"]));
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    let report = orchestrator.status(&inventory).await.unwrap();

    assert!(!report.targets["perf1"].valid);
    assert_eq!(report.targets["perf1"].nodes["a"], BlackholeStatus::Unblocked);
    assert_eq!(report.targets["perf1"].nodes["b"], BlackholeStatus::PartlyBlocked);
    assert!(report.targets["perf3"].valid);
}

#[tokio::test]
async fn unreachable_node_fails_without_stopping_others() {
    let world = Arc::new(world().unreachable("perf1", "b"));
    let orchestrator = perf2(&world).await;
    let inventory = orchestrator.inspect_all().await.unwrap();

    let err = orchestrator.block(&inventory).await.unwrap_err();

    assert!(matches!(err, BlackholeError::RemoteExec { ref node, .. } if node == "b"));
    assert_eq!(world.table("perf1", "a"), BLOCKED);
    assert_eq!(world.table("perf3", "c"), BLOCKED);
}

#[tokio::test]
async fn overlapping_contexts_are_rejected_before_connecting() {
    let world = Arc::new(world());

    let err = orchestrator(&world, "perf2", &["perf2", "perf1"])
        .await
        .err()
        .unwrap();

    assert!(matches!(err, BlackholeError::Config(_)));
    assert!(world.connects().is_empty());
}

#[tokio::test]
async fn missing_external_ip_fails_inspection() {
    let world = Arc::new(
        world().cluster(
            FakeCluster::new("perf4", "https://api.perf4.example.com:6443")
                .node("master-0", Some("10.4.0.1"))
                .node("master-1", None),
        ),
    );
    let orchestrator = orchestrator(&world, "perf4", &["perf1"]).await.unwrap();

    let err = orchestrator.inspect_all().await.unwrap_err();
    assert!(matches!(err, BlackholeError::Discovery { ref context, .. } if context == "perf4"));
}
