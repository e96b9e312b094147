/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for warden-adapter tests

use std::time::Duration;

use warden_adapter::{BackendConfig, ClientConfig, RemoteBackend};
use wiremock::MockServer;

/// Setup a mock HTTP server standing in for the remote host
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Backend pointed at the mock server
#[allow(dead_code)]
pub fn backend_for(server: &MockServer, config: BackendConfig) -> RemoteBackend {
    RemoteBackend::connect(&server.uri(), test_client_config(), config).expect("backend init")
}

/// Short timeouts so a misbehaving test fails fast
#[allow(dead_code)]
pub fn test_client_config() -> ClientConfig {
    ClientConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    }
}
