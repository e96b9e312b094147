/*
[INPUT]:  Mock remote host responses for container sub-endpoints
[OUTPUT]: Test results for the container proxy
[POS]:    Integration tests - per-container operations
[UPDATE]: When container sub-endpoints change
*/

mod common;

use common::{backend_for, setup_mock_server};
use rstest::rstest;
use tokio_test::assert_ok;
use warden_adapter::{
    BackendConfig, Container, ContainerBackend, ContainerProxy, CpuLimits, DiskLimitScope,
    DiskLimits, MemoryLimits, NetOutRule, PortRange, Properties, Protocol,
};
use wiremock::matchers::{body_bytes, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn container(server: &MockServer, handle: &str) -> ContainerProxy {
    backend_for(server, BackendConfig::default())
        .lookup(handle)
        .await
        .expect("lookup")
}

#[tokio::test]
async fn test_info() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "active",
            "events": ["out of memory"],
            "host_ip": "192.168.1.5",
            "container_ip": "10.0.0.2",
            "external_ip": "203.0.113.9",
            "container_path": "C:\\containers\\web-1",
            "process_ids": ["42"],
            "properties": {"app": "web"},
            "mapped_ports": [{"host_port": 8080, "container_port": 80}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = assert_ok!(container(&server, "web-1").await.info().await);
    assert_eq!(info.state, "active");
    assert_eq!(info.events, vec!["out of memory".to_string()]);
    assert_eq!(info.external_ip, "203.0.113.9");
    assert_eq!(info.process_ids, vec!["42".to_string()]);
    assert_eq!(info.properties.get("app").map(String::as_str), Some("web"));
    assert_eq!(info.mapped_ports[0].host_port, 8080);
}

#[tokio::test]
async fn test_metrics() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "memory_stat": {"total_rss": 2048, "total_usage_towards_limit": 4096},
            "cpu_stat": {"usage": 10, "user": 6, "system": 4},
            "disk_stat": {"total_bytes_used": 512, "exclusive_bytes_used": 128}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = assert_ok!(container(&server, "web-1").await.metrics().await);
    assert!(metrics.memory_stat.total_rss > 0);
    assert!(metrics.cpu_stat.usage > 0);
    assert!(metrics.disk_stat.total_bytes_used > 0);
    assert_eq!(metrics.disk_stat.exclusive_bytes_used, 128);
}

#[tokio::test]
async fn test_stop_sends_kill_flag() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/stop"))
        .and(body_json(serde_json::json!({"kill": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(container(&server, "web-1").await.stop(true).await);
}

#[tokio::test]
async fn test_net_in_returns_mapped_ports() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/net/in"))
        .and(body_json(serde_json::json!({"host_port": 0, "container_port": 8080})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "host_port": 61001,
            "container_port": 8080
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ports = assert_ok!(container(&server, "web-1").await.net_in(0, 8080).await);
    assert_eq!(ports, (61001, 8080));
}

#[tokio::test]
async fn test_bulk_net_out_stops_at_first_failure() {
    let server = setup_mock_server().await;
    let first = NetOutRule {
        protocol: Protocol::Tcp,
        ports: vec![PortRange {
            start: 80,
            end: Some(443),
        }],
        ..Default::default()
    };
    let second = NetOutRule {
        protocol: Protocol::Udp,
        ..Default::default()
    };
    let third = NetOutRule {
        protocol: Protocol::Icmp,
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/net/out"))
        .and(body_json(serde_json::to_value(&first).unwrap()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/net/out"))
        .and(body_json(serde_json::to_value(&second).unwrap()))
        .respond_with(ResponseTemplate::new(400).set_body_string("udp not allowed"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/net/out"))
        .and(body_json(serde_json::to_value(&third).unwrap()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = container(&server, "web-1")
        .await
        .bulk_net_out(vec![first, second, third])
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_property_operations() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "app": "web",
            "owner": "ops"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/properties/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!("web")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/containers/web-1/properties/tier"))
        .and(body_json(serde_json::json!("frontend")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/containers/web-1/properties/owner"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let container = container(&server, "web-1").await;
    let properties = assert_ok!(container.properties().await);
    assert_eq!(
        properties,
        Properties::from([
            ("app".to_string(), "web".to_string()),
            ("owner".to_string(), "ops".to_string()),
        ])
    );
    assert_eq!(assert_ok!(container.property("app").await), "web");
    assert_ok!(container.set_property("tier", "frontend").await);
    assert_ok!(container.remove_property("owner").await);
}

#[tokio::test]
async fn test_stream_in_and_out() {
    let server = setup_mock_server().await;
    Mock::given(method("PUT"))
        .and(path("/api/containers/web-1/files"))
        .and(query_param("destination", "/app/config.json"))
        .and(body_bytes(b"{\"port\":80}".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/files"))
        .and(query_param("source", "/app/log.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"started\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let container = container(&server, "web-1").await;
    assert_ok!(
        container
            .stream_in("/app/config.json", b"{\"port\":80}".to_vec())
            .await
    );
    assert_eq!(
        assert_ok!(container.stream_out("/app/log.txt").await),
        b"started\n".to_vec()
    );
}

#[rstest]
#[case("memory_limit", serde_json::json!({"limit_in_bytes": 1_073_741_824u64}))]
#[case("cpu_limit", serde_json::json!({"limit_in_shares": 512}))]
#[case("disk_limit", serde_json::json!({
    "inode_soft": 0, "inode_hard": 0, "byte_soft": 1024, "byte_hard": 2048, "scope": 1
}))]
#[tokio::test]
async fn test_limits_are_posted_to_their_endpoint(
    #[case] sub_path: &str,
    #[case] expected_body: serde_json::Value,
) {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/containers/web-1/{sub_path}")))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let container = container(&server, "web-1").await;
    let result = match sub_path {
        "memory_limit" => {
            container
                .limit_memory(MemoryLimits {
                    limit_in_bytes: 1_073_741_824,
                })
                .await
        }
        "cpu_limit" => container.limit_cpu(CpuLimits { limit_in_shares: 512 }).await,
        _ => {
            container
                .limit_disk(DiskLimits {
                    byte_soft: 1024,
                    byte_hard: 2048,
                    scope: DiskLimitScope::Exclusive,
                    ..Default::default()
                })
                .await
        }
    };
    assert_ok!(result);
}

#[tokio::test]
async fn test_current_limits() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/memory_limit"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"limit_in_bytes": 4096})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/bandwidth_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "rate_in_bytes_per_second": 100,
            "burst_rate_in_bytes_per_second": 200
        })))
        .mount(&server)
        .await;

    let container = container(&server, "web-1").await;
    assert_eq!(
        assert_ok!(container.current_memory_limits().await).limit_in_bytes,
        4096
    );
    let bandwidth = assert_ok!(container.current_bandwidth_limits().await);
    assert_eq!(bandwidth.rate_in_bytes_per_second, 100);
    assert_eq!(bandwidth.burst_rate_in_bytes_per_second, 200);
}
