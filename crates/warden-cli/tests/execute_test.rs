/*
[INPUT]:  Mock remote host, parsed subcommands
[OUTPUT]: Test results for command execution
[POS]:    Integration tests - subcommand to backend mapping
[UPDATE]: When subcommand behavior changes
*/

use std::time::Duration;

use tokio_test::assert_ok;
use warden_adapter::{BackendConfig, ClientConfig, NetInRequest, RemoteBackend};
use warden_cli::{Command, execute};
use wiremock::matchers::{
    body_json, body_partial_json, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer, config: BackendConfig) -> RemoteBackend {
    let client_config = ClientConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    };
    RemoteBackend::connect(&server.uri(), client_config, config).expect("backend init")
}

#[tokio::test]
async fn test_list_with_property_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/containers"))
        .and(query_param("q", r#"{"app":"web"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["web-1"])))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::List {
        properties: vec![("app".to_string(), "web".to_string())],
    };
    let output = assert_ok!(execute(&backend(&server, BackendConfig::default()), command).await);
    assert_eq!(output, serde_json::json!(["web-1"]));
}

#[tokio::test]
async fn test_list_without_filter_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/containers"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::List { properties: vec![] };
    let output = assert_ok!(execute(&backend(&server, BackendConfig::default()), command).await);
    assert_eq!(output, serde_json::json!([]));
}

#[tokio::test]
async fn test_create_sends_spec_and_port_mappings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/containers"))
        .and(body_partial_json(serde_json::json!({
            "handle": "web-1",
            "properties": {"app": "web"},
            "netin": [{"host_port": 0, "container_port": 8080}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "handle": "web-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/containers/web-1/net/in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "host_port": 61001,
            "container_port": 8080
        })))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::Create {
        handle: Some("web-1".to_string()),
        net_in: vec![NetInRequest {
            host_port: 0,
            container_port: 8080,
        }],
        properties: vec![("app".to_string(), "web".to_string())],
    };
    let output = assert_ok!(execute(&backend(&server, BackendConfig::default()), command).await);
    assert_eq!(output, serde_json::json!({"handle": "web-1"}));
}

#[tokio::test]
async fn test_destroy_missing_follows_config() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/containers/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let command = Command::Destroy {
        handle: "gone".to_string(),
    };
    let strict = execute(&backend(&server, BackendConfig::default()), command.clone()).await;
    assert!(strict.is_err());

    let lenient = BackendConfig {
        destroy_missing_ok: true,
        ..Default::default()
    };
    let output = assert_ok!(execute(&backend(&server, lenient), command).await);
    assert_eq!(output, serde_json::json!({"destroyed": "gone"}));
}

#[tokio::test]
async fn test_grace_time_falls_back_to_configured_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/grace_time"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = BackendConfig {
        grace_time: Duration::from_secs(90),
        ..Default::default()
    };
    let command = Command::GraceTime {
        handle: "web-1".to_string(),
    };
    let output = assert_ok!(execute(&backend(&server, config), command).await);
    assert_eq!(
        output,
        serde_json::json!({
            "handle": "web-1",
            "grace_time_secs": 90.0,
            "grace_time_nanos": 90_000_000_000u64
        })
    );
}

#[tokio::test]
async fn test_grace_time_keeps_sub_second_precision() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/containers/web-1/grace_time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(1_500_000_000u64)))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::GraceTime {
        handle: "web-1".to_string(),
    };
    let output = assert_ok!(execute(&backend(&server, BackendConfig::default()), command).await);
    assert_eq!(output["grace_time_secs"], 1.5);
    assert_eq!(output["grace_time_nanos"], 1_500_000_000u64);
}

#[tokio::test]
async fn test_info_returns_per_handle_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bulkcontainerinfo"))
        .and(body_json(serde_json::json!(["web-1"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "web-1": {"info": {"state": "active"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::Info {
        handles: vec!["web-1".to_string()],
    };
    let output = assert_ok!(execute(&backend(&server, BackendConfig::default()), command).await);
    assert_eq!(output["web-1"]["info"]["state"], "active");
}
