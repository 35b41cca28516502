//! Mock FogBugz API server.
//!
//! Provides an axum-based HTTP server that simulates the FogBugz XML API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock FogBugz server for testing.
///
/// The server runs in the background and answers commands on every path,
/// so any root/endpoint combination reaches it.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating an `Interface` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows inspecting recorded requests or modifying the mock data
    /// during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for user in scenario.users {
            state = state.with_user(user);
        }

        for project in scenario.projects {
            state = state.with_project(project);
        }

        for case in scenario.cases {
            state = state.with_case(case);
        }

        state
    }

    /// Create the axum router.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .fallback(handlers::dispatch)
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::fixtures::{DEFAULT_EMAIL, DEFAULT_PASSWORD};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(path: &str, form: &str) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_router_logon_returns_token() {
        let state = MockServer::default_state().shared();
        let app = MockServer::create_router(state.clone());

        let form = format!("cmd=logon&email={DEFAULT_EMAIL}&password={DEFAULT_PASSWORD}");
        let response = app.oneshot(form_request("/api.asp", &form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<token><![CDATA[token-1]]></token>"), "{body}");
        assert!(state.read().await.is_valid_token("token-1"));
    }

    #[tokio::test]
    async fn test_router_requires_token() {
        let app = MockServer::create_router(MockServer::default_state().shared());

        let request = Request::get("/api.asp?cmd=search&q=crash")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let body = body_text(response).await;
        assert!(body.contains(r#"<error code="3">"#), "{body}");
    }

    #[tokio::test]
    async fn test_router_records_requests() {
        let state = MockState::new().with_token("tok", DEFAULT_EMAIL).shared();
        let app = MockServer::create_router(state.clone());

        let request = Request::get("/fogbugz/api.php?cmd=listProjects&token=tok")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap();

        let state = state.read().await;
        let recorded = state.last_request().unwrap();
        assert_eq!(recorded.method, "GET");
        assert_eq!(recorded.path, "/fogbugz/api.php");
        assert_eq!(recorded.params.get("cmd").map(String::as_str), Some("listProjects"));
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }
}
