//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use super::state::{MockCase, MockProject, MockUser};

/// Email of the default account.
pub const DEFAULT_EMAIL: &str = "test@example.com";
/// Password of the default account.
pub const DEFAULT_PASSWORD: &str = "testpassword";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Create a user account.
    pub fn user(email: &str, password: &str) -> MockUser {
        MockUser {
            email: email.to_string(),
            password: password.to_string(),
            full_name: email.split('@').next().unwrap_or(email).to_string(),
        }
    }

    /// Create a case in the `Inbox` project.
    pub fn case(ix_bug: u64, title: &str) -> MockCase {
        Self::case_in(ix_bug, title, "Inbox")
    }

    /// Create a case in a given project.
    pub fn case_in(ix_bug: u64, title: &str, project: &str) -> MockCase {
        MockCase {
            ix_bug,
            title: title.to_string(),
            project: project.to_string(),
        }
    }

    /// Create a project.
    pub fn project(ix_project: u64, name: &str) -> MockProject {
        MockProject {
            ix_project,
            name: name.to_string(),
        }
    }

    /// Create a default scenario with one account, two projects and three
    /// cases.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario.
pub struct DefaultScenario {
    pub users: Vec<MockUser>,
    pub projects: Vec<MockProject>,
    pub cases: Vec<MockCase>,
}

impl DefaultScenario {
    fn new() -> Self {
        Self {
            users: vec![
                Fixtures::user(DEFAULT_EMAIL, DEFAULT_PASSWORD),
                Fixtures::user("test-2@example.com", "test"),
            ],
            projects: vec![Fixtures::project(1, "Inbox"), Fixtures::project(2, "Website")],
            cases: vec![
                Fixtures::case(1, "Crash on save"),
                Fixtures::case_in(2, "Typo on login page", "Website"),
                Fixtures::case(3, "Crash when offline"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_full_name() {
        let user = Fixtures::user("alice@example.com", "pw");
        assert_eq!(user.full_name, "alice");
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert!(scenario.users.iter().any(|u| u.email == DEFAULT_EMAIL));
        assert_eq!(scenario.projects.len(), 2);
        assert_eq!(scenario.cases.len(), 3);
    }
}
