//! E2E tests using the mock FogBugz server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual requests.

#![cfg(feature = "test-server")]

use fogbugz::mock_server::{Fixtures, MockServer, MockState};
use fogbugz::{FogbugzError, Interface, InterfaceOptions, Params, RequestMethod};

fn credentials() -> InterfaceOptions {
    InterfaceOptions::default().with_credentials("test@example.com", "testpassword")
}

fn query(q: &str) -> Params {
    Params::from([("q".to_string(), q.to_string())])
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

// =============================================================================
// Authentication Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_logon_search_logoff_workflow() {
    let server = MockServer::start().await;
    let mut fogbugz = Interface::new(server.url(), credentials()).unwrap();

    // Step 1: Log on
    let token = fogbugz.authenticate().await.expect("Failed to log on");
    assert_eq!(fogbugz.token(), Some(token.as_str()));

    // Step 2: Search with the token
    let response = fogbugz
        .command("search", query("crash"))
        .await
        .expect("Failed to search");
    let cases = response["cases"]["case"].as_sequence();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0]["sTitle"].as_str(), Some("Crash on save"));
    assert_eq!(cases[1]["ixBug"].as_i64(), Some(3));

    // Step 3: Log off, and the server forgets the token
    fogbugz.logoff().await.expect("Failed to log off");
    assert!(fogbugz.token().is_none());
    assert!(!server.state().read().await.is_valid_token(&token));

    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_password_fails() {
    let server = MockServer::start().await;
    let mut fogbugz = Interface::new(
        server.url(),
        InterfaceOptions::default().with_credentials("test@example.com", "wrong"),
    )
    .unwrap();

    let result = fogbugz.authenticate().await;
    assert!(matches!(result, Err(FogbugzError::AuthenticationFailed(_))));

    server.shutdown().await;
}

#[tokio::test]
async fn test_preissued_token_skips_logon() {
    let state = MockState::new()
        .with_token("preissued", "test@example.com")
        .with_project(Fixtures::project(7, "Backlog"));
    let server = MockServer::with_state(state).await;

    let fogbugz = Interface::new(
        server.url(),
        InterfaceOptions::default().with_token("preissued"),
    )
    .unwrap();

    let response = fogbugz.command("listProjects", Params::new()).await.unwrap();
    let project = &response["projects"]["project"];
    assert_eq!(project["sProject"].as_str(), Some("Backlog"));
    assert_eq!(project["ixProject"].as_i64(), Some(7));

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.requests.len(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_command_without_token_reports_error() {
    let server = MockServer::start().await;
    let fogbugz = Interface::new(server.url(), InterfaceOptions::default()).unwrap();

    let response = fogbugz.command("search", query("crash")).await.unwrap();
    assert_eq!(response["error"]["code"].as_str(), Some("3"));

    server.shutdown().await;
}

// =============================================================================
// Request Shape Tests
// =============================================================================

#[tokio::test]
async fn test_root_and_endpoint_reach_server() {
    let server = MockServer::start().await;
    let mut fogbugz = Interface::new(
        server.url(),
        credentials().with_root("fogbugz").with_endpoint("api.php"),
    )
    .unwrap();

    fogbugz.authenticate().await.unwrap();

    let state = server.state();
    let state = state.read().await;
    let request = state.last_request().unwrap();
    assert_eq!(request.path, "/fogbugz/api.php");
    assert_eq!(request.method, "POST");

    server.shutdown().await;
}

#[tokio::test]
async fn test_get_requests_and_injected_params() {
    let server = MockServer::start().await;
    let mut fogbugz = Interface::new(
        server.url(),
        credentials().with_method(RequestMethod::Get),
    )
    .unwrap();
    let token = fogbugz.authenticate().await.unwrap();

    let response = fogbugz
        .command_with("search", Params::new(), |cmd| {
            cmd.param("q", "login");
        })
        .await
        .unwrap();
    assert_eq!(response["cases"]["count"].as_i64(), Some(1));

    let state = server.state();
    let state = state.read().await;
    let request = state.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.params.get("cmd").map(String::as_str), Some("search"));
    assert_eq!(request.params.get("q").map(String::as_str), Some("login"));
    assert_eq!(request.params.get("token"), Some(&token));

    server.shutdown().await;
}

#[tokio::test]
async fn test_http_failure_surfaces_as_api_error() {
    let state = MockState::new().with_failure(500, "database offline");
    let server = MockServer::with_state(state).await;
    let fogbugz = Interface::new(server.url(), InterfaceOptions::default()).unwrap();

    let err = fogbugz.command("search", Params::new()).await.unwrap_err();
    match err {
        FogbugzError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database offline");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }

    server.shutdown().await;
}
