mod common;

use common::FakeCloud;
use floatlink_cloud::{CloudError, FloatingIpAssociator, FloatingIpUpdate, Lookup};

async fn associator(cloud: &FakeCloud) -> FloatingIpAssociator<'_> {
    FloatingIpAssociator::connect(cloud, "RegionOne").await.unwrap()
}

/// ポートに fixed IP があれば先頭を使い、LB は参照しない
#[tokio::test]
async fn test_fixed_ip_from_port_skips_load_balancers() {
    let cloud = FakeCloud::new()
        .with_port("p1", &["10.0.0.5", "10.0.0.6"])
        .with_load_balancer("lb-1", "p1", "10.0.0.99")
        .with_floating_ip("fip-1", "203.0.113.9");
    let assoc = associator(&cloud).await;

    let association = assoc.associate("203.0.113.9", "p1").await.unwrap();

    assert_eq!(association.id, "fip-1");
    assert_eq!(association.fixed_ip, "10.0.0.5");
    assert_eq!(
        cloud.updates(),
        vec![(
            "fip-1".to_string(),
            FloatingIpUpdate::associate("p1", "10.0.0.5")
        )]
    );
    assert_eq!(cloud.lb_clients_built(), 0);
    assert_eq!(cloud.lb_list_calls(), 0);

    let view = assoc.refresh("fip-1").await.unwrap().found().unwrap();
    assert_eq!(view.floating_ip_address, "203.0.113.9");
    assert_eq!(view.port_id.as_deref(), Some("p1"));
    assert_eq!(view.region, "RegionOne");
}

/// fixed IP が無いポートは、唯一の LB の VIP を使う
#[tokio::test]
async fn test_fixed_ip_from_single_load_balancer() {
    let cloud = FakeCloud::new()
        .with_port("p2", &[])
        .with_load_balancer("lb-1", "p2", "10.0.0.9")
        .with_load_balancer("lb-other", "p7", "10.0.7.1")
        .with_floating_ip("fip-2", "203.0.113.10");
    let assoc = associator(&cloud).await;

    let association = assoc.associate("fip-2", "p2").await.unwrap();

    assert_eq!(association.fixed_ip, "10.0.0.9");
    assert_eq!(cloud.lb_list_calls(), 1);
    assert_eq!(
        cloud.floating_ip("fip-2").unwrap().fixed_ip.as_deref(),
        Some("10.0.0.9")
    );
}

/// LB が複数一致した場合はエラーにせず fixed IP を空のまま進める
#[tokio::test]
async fn test_ambiguous_load_balancers_leave_fixed_ip_empty() {
    let cloud = FakeCloud::new()
        .with_port("p3", &[])
        .with_load_balancer("lb-1", "p3", "10.0.3.1")
        .with_load_balancer("lb-2", "p3", "10.0.3.2")
        .with_floating_ip("fip-3", "203.0.113.11");
    let assoc = associator(&cloud).await;

    let association = assoc.associate("fip-3", "p3").await.unwrap();

    assert_eq!(association.fixed_ip, "");
    let (_, update) = cloud.updates().pop().unwrap();
    assert_eq!(update.port_id.as_deref(), Some("p3"));
    assert_eq!(update.fixed_ip, None);
}

#[tokio::test]
async fn test_no_load_balancer_leaves_fixed_ip_empty() {
    let cloud = FakeCloud::new()
        .with_port("p4", &[])
        .with_floating_ip("fip-4", "203.0.113.12");
    let assoc = associator(&cloud).await;

    let association = assoc.associate("fip-4", "p4").await.unwrap();

    assert_eq!(association.fixed_ip, "");
    assert_eq!(cloud.lb_list_calls(), 1);
}

#[tokio::test]
async fn test_missing_port_aborts_without_update() {
    let cloud = FakeCloud::new().with_floating_ip("fip-1", "203.0.113.9");
    let assoc = associator(&cloud).await;

    let err = assoc.associate("fip-1", "nope").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().starts_with("Unable to get port nope"));
    assert!(cloud.updates().is_empty());
}

#[tokio::test]
async fn test_unknown_address_is_a_resolution_error() {
    let cloud = FakeCloud::new().with_port("p1", &["10.0.0.5"]);
    let assoc = associator(&cloud).await;

    let err = assoc.associate("198.51.100.1", "p1").await.unwrap_err();

    match err {
        CloudError::Context { source, .. } => {
            assert!(matches!(*source, CloudError::Resolution { .. }))
        }
        other => panic!("Expected resolution error, got {other:?}"),
    }
    assert!(cloud.updates().is_empty());
}

#[tokio::test]
async fn test_duplicate_address_is_a_resolution_error() {
    let cloud = FakeCloud::new()
        .with_port("p1", &["10.0.0.5"])
        .with_floating_ip("fip-a", "203.0.113.9")
        .with_floating_ip("fip-b", "203.0.113.9");
    let assoc = associator(&cloud).await;

    let err = assoc.associate("203.0.113.9", "p1").await.unwrap_err();
    assert!(err.to_string().contains("more than one"));
}

#[tokio::test]
async fn test_rejected_update_names_both_ids() {
    let cloud = FakeCloud::new()
        .with_port("p1", &["10.0.0.5"])
        .with_floating_ip("fip-1", "203.0.113.9")
        .rejecting_updates();
    let assoc = associator(&cloud).await;

    let err = assoc.associate("fip-1", "p1").await.unwrap_err();
    let message = err.to_string();

    assert!(message.contains("fip-1"));
    assert!(message.contains("p1"));
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn test_refresh_unknown_is_gone() {
    let cloud = FakeCloud::new();
    let assoc = associator(&cloud).await;

    assert_eq!(assoc.refresh("missing").await.unwrap(), Lookup::Gone);
}

#[tokio::test]
async fn test_disassociate_then_refresh_clears_port() {
    let cloud = FakeCloud::new()
        .with_port("p1", &["10.0.0.5"])
        .with_floating_ip("fip-1", "203.0.113.9");
    let assoc = associator(&cloud).await;
    assoc.associate("fip-1", "p1").await.unwrap();

    assoc.disassociate("fip-1", "p1").await.unwrap();

    let view = assoc.refresh("fip-1").await.unwrap().found().unwrap();
    assert_eq!(view.port_id, None);
    assert_eq!(
        cloud.updates().last().unwrap().1,
        FloatingIpUpdate::disassociate()
    );
}

#[tokio::test]
async fn test_disassociate_is_idempotent() {
    let cloud = FakeCloud::new()
        .with_port("p1", &["10.0.0.5"])
        .with_floating_ip("fip-1", "203.0.113.9");
    let assoc = associator(&cloud).await;
    assoc.associate("fip-1", "p1").await.unwrap();

    assoc.disassociate("fip-1", "p1").await.unwrap();
    let after_first = cloud.floating_ip("fip-1").unwrap();

    assoc.disassociate("fip-1", "p1").await.unwrap();
    let after_second = cloud.floating_ip("fip-1").unwrap();

    assert_eq!(after_first, after_second);
    assert!(!after_second.is_associated());
}

#[tokio::test]
async fn test_disassociate_error_mentions_port() {
    let cloud = FakeCloud::new();
    let assoc = associator(&cloud).await;

    let err = assoc.disassociate("fip-x", "p1").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error disassociating floating IP fip-x from port p1: API error: Floating IP fip-x could not be found"
    );
}
