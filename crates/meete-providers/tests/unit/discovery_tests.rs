//! Service discovery provider tests

use meete_application::ports::registry::DiscoveryProviderConfig;
use meete_domain::error::Error;
use meete_domain::ports::providers::{ServiceAddress, ServiceDiscoveryProvider};
use meete_providers::discovery::consul::CatalogNode;
use meete_providers::discovery::{ConsulDiscoveryProvider, NullDiscoveryProvider};

const CATALOG: &str = r#"[
    {"Node": "n1", "Address": "10.0.0.1", "ServiceAddress": "", "ServicePort": 9000},
    {"Node": "n2", "Address": "10.0.0.2", "ServiceAddress": "172.16.0.2", "ServicePort": 9001}
]"#;

#[test]
fn test_service_address_falls_back_to_agent_address() {
    let nodes: Vec<CatalogNode> = serde_json::from_str(CATALOG).expect("catalog");
    assert_eq!(nodes[0].to_address(), ServiceAddress::new("10.0.0.1", 9000));
    assert_eq!(nodes[1].to_address(), ServiceAddress::new("172.16.0.2", 9001));
}

#[test]
fn test_pick_chooses_a_listed_node() {
    let nodes: Vec<CatalogNode> = serde_json::from_str(CATALOG).expect("catalog");
    let candidates: Vec<ServiceAddress> = nodes.iter().map(CatalogNode::to_address).collect();
    for _ in 0..20 {
        let picked = ConsulDiscoveryProvider::pick(&nodes).expect("non-empty");
        assert!(candidates.contains(&picked));
    }
    assert!(ConsulDiscoveryProvider::pick(&[]).is_none());
}

#[tokio::test]
async fn test_unreachable_agent_is_network_error() {
    // Port 9 (discard) on loopback is not expected to run a Consul agent.
    let config = DiscoveryProviderConfig::new("consul").with_agent("127.0.0.1", 9);
    let provider = ConsulDiscoveryProvider::new(&config).expect("provider");
    let err = provider
        .lookup("auth-service")
        .await
        .expect_err("nothing listens on port 9");
    assert!(matches!(err, Error::Network { .. }));
}

#[tokio::test]
async fn test_null_discovery_knows_nothing() {
    let provider = NullDiscoveryProvider;
    assert!(provider.lookup("auth-service").await.expect("lookup").is_none());
}
