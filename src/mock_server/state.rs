//! Mock server state management.
//!
//! Provides the in-memory data store for the mock FogBugz server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A user account that can log on.
#[derive(Debug, Clone)]
pub struct MockUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// A case returned by `search`.
#[derive(Debug, Clone)]
pub struct MockCase {
    pub ix_bug: u64,
    pub title: String,
    pub project: String,
}

/// A project returned by `listProjects`.
#[derive(Debug, Clone)]
pub struct MockProject {
    pub ix_project: u64,
    pub name: String,
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Accounts indexed by email.
    pub users: HashMap<String, MockUser>,

    /// Live tokens mapped to the email they were issued for.
    pub tokens: HashMap<String, String>,

    /// Cases indexed by ixBug.
    pub cases: BTreeMap<u64, MockCase>,

    /// Projects in listing order.
    pub projects: Vec<MockProject>,

    /// Every request received, oldest first.
    pub requests: Vec<RecordedRequest>,

    /// When set, every command is answered with this HTTP status and body.
    pub failure: Option<(u16, String)>,

    issued: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user account.
    pub fn with_user(mut self, user: MockUser) -> Self {
        self.users.insert(user.email.clone(), user);
        self
    }

    /// Register a token as already issued for `email`.
    pub fn with_token(mut self, token: &str, email: &str) -> Self {
        self.tokens.insert(token.to_string(), email.to_string());
        self
    }

    /// Add a case.
    pub fn with_case(mut self, case: MockCase) -> Self {
        self.cases.insert(case.ix_bug, case);
        self
    }

    /// Add a project.
    pub fn with_project(mut self, project: MockProject) -> Self {
        self.projects.push(project);
        self
    }

    /// Answer every command with an HTTP error.
    pub fn with_failure(mut self, status: u16, body: &str) -> Self {
        self.failure = Some((status, body.to_string()));
        self
    }

    /// Check credentials and issue a fresh token.
    pub fn logon(&mut self, email: &str, password: &str) -> Option<String> {
        let user = self.users.get(email)?;
        if user.password != password {
            return None;
        }
        self.issued += 1;
        let token = format!("token-{}", self.issued);
        self.tokens.insert(token.clone(), email.to_string());
        Some(token)
    }

    /// Invalidate a token. Returns whether it was live.
    pub fn logoff(&mut self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    /// Whether `token` is live.
    pub fn is_valid_token(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Cases whose title contains `query`, case-insensitively. An empty
    /// query matches everything.
    pub fn search(&self, query: &str) -> Vec<&MockCase> {
        let query = query.to_lowercase();
        self.cases
            .values()
            .filter(|c| c.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Remember a request.
    pub fn record(&mut self, request: RecordedRequest) {
        self.requests.push(request);
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<&RecordedRequest> {
        self.requests.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, password: &str) -> MockUser {
        MockUser {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Test User".to_string(),
        }
    }

    fn case(ix_bug: u64, title: &str) -> MockCase {
        MockCase {
            ix_bug,
            title: title.to_string(),
            project: "Inbox".to_string(),
        }
    }

    #[test]
    fn test_state_logon_issues_unique_tokens() {
        let mut state = MockState::new().with_user(user("a@example.com", "pw"));

        let first = state.logon("a@example.com", "pw").unwrap();
        let second = state.logon("a@example.com", "pw").unwrap();

        assert_ne!(first, second);
        assert!(state.is_valid_token(&first));
        assert!(state.is_valid_token(&second));
    }

    #[test]
    fn test_state_logon_rejects_bad_credentials() {
        let mut state = MockState::new().with_user(user("a@example.com", "pw"));

        assert!(state.logon("a@example.com", "wrong").is_none());
        assert!(state.logon("b@example.com", "pw").is_none());
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_state_logoff() {
        let mut state = MockState::new().with_token("tok", "a@example.com");

        assert!(state.logoff("tok"));
        assert!(!state.is_valid_token("tok"));
        assert!(!state.logoff("tok"));
    }

    #[test]
    fn test_state_search() {
        let state = MockState::new()
            .with_case(case(1, "Crash on save"))
            .with_case(case(2, "Typo on login page"))
            .with_case(case(3, "crash when offline"));

        assert_eq!(state.search("").len(), 3);
        assert_eq!(state.search("CRASH").len(), 2);
        assert_eq!(state.search("login")[0].ix_bug, 2);
    }
}
