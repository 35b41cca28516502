//! Mock FogBugz API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates a FogBugz
//! installation for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server keeps users, tokens and cases
//! across requests, enabling realistic logon/search/logoff workflows.
//!
//! # Example
//!
//! ```ignore
//! use fogbugz::mock_server::MockServer;
//! use fogbugz::{Interface, InterfaceOptions, Params};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let mut fogbugz = Interface::new(
//!         server.url(),
//!         InterfaceOptions::default().with_credentials("test@example.com", "testpassword"),
//!     )
//!     .unwrap();
//!
//!     fogbugz.authenticate().await.unwrap();
//!     let cases = fogbugz.command("search", Params::new()).await.unwrap();
//!     assert_eq!(cases["cases"]["count"].as_i64(), Some(3));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MockCase, MockProject, MockState, MockUser, RecordedRequest};
