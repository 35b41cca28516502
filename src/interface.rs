//! FogBugz session.
//!
//! Holds the endpoint and authentication state, and turns command names plus
//! parameters into [`Command`]s.

use std::env;

use reqwest::Client;
use url::Url;

use crate::command::{Command, Params, RequestMethod};
use crate::error::{FogbugzError, Result};
use crate::value::{Value, CONTENT_KEY};

/// Endpoint filename used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "api.asp";
const USER_AGENT: &str = concat!("fogbugz/", env!("CARGO_PKG_VERSION"));

/// Options accepted by [`Interface::new`].
///
/// Every field is optional. `endpoint` defaults to [`DEFAULT_ENDPOINT`] and
/// `method` to [`RequestMethod::Post`].
#[derive(Debug, Clone, Default)]
pub struct InterfaceOptions {
    /// Email address used by [`Interface::authenticate`].
    pub email: Option<String>,
    /// Password used by [`Interface::authenticate`].
    pub password: Option<String>,
    /// A token issued earlier; commands use it without a logon.
    pub token: Option<String>,
    /// Path segment between the host and the endpoint, e.g. `fogbugz`.
    pub root: Option<String>,
    /// Endpoint filename, e.g. `api.php`.
    pub endpoint: Option<String>,
    /// How parameters are sent.
    pub method: RequestMethod,
}

impl InterfaceOptions {
    /// Set the stored credentials.
    #[must_use]
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Set a pre-issued token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the root path.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the endpoint filename.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request method.
    #[must_use]
    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }
}

/// Email/password pair for a one-off [`Interface::logon`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A FogBugz client session.
///
/// Cloning is cheap; clones share the HTTP connection pool but carry their
/// own token.
///
/// # Example
///
/// ```no_run
/// use fogbugz::{Interface, InterfaceOptions, Params};
///
/// # async fn example() -> fogbugz::Result<()> {
/// let mut fogbugz = Interface::new(
///     "https://example.com",
///     InterfaceOptions::default()
///         .with_root("fogbugz")
///         .with_credentials("me@example.com", "secret"),
/// )?;
/// assert_eq!(fogbugz.uri().as_str(), "https://example.com/fogbugz/api.asp");
///
/// fogbugz.authenticate().await?;
///
/// let params = Params::from([("q".to_string(), "assignedto:me".to_string())]);
/// let cases = fogbugz.command("search", params).await?;
/// for case in cases["cases"]["case"].as_sequence() {
///     println!("{}: {}", case["ixBug"].to_display_string(), case["sTitle"].to_display_string());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Interface {
    http: Client,
    uri: Url,
    email: Option<String>,
    password: Option<String>,
    token: Option<String>,
    method: RequestMethod,
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("uri", &self.uri.as_str())
            .field("email", &self.email)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl Interface {
    /// Create an interface from environment variables.
    ///
    /// Reads `FOGBUGZ_URL` (required) and the optional `FOGBUGZ_ROOT`,
    /// `FOGBUGZ_ENDPOINT`, `FOGBUGZ_EMAIL`, `FOGBUGZ_PASSWORD` and
    /// `FOGBUGZ_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if `FOGBUGZ_URL` is not set or is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let uri = env::var("FOGBUGZ_URL").map_err(|_| {
            FogbugzError::ConfigMissing("FOGBUGZ_URL environment variable not set".to_string())
        })?;

        let options = InterfaceOptions {
            email: env::var("FOGBUGZ_EMAIL").ok(),
            password: env::var("FOGBUGZ_PASSWORD").ok(),
            token: env::var("FOGBUGZ_TOKEN").ok(),
            root: env::var("FOGBUGZ_ROOT").ok(),
            endpoint: env::var("FOGBUGZ_ENDPOINT").ok(),
            method: RequestMethod::default(),
        };

        Self::new(&uri, options)
    }

    /// Create an interface for the installation at `uri`.
    ///
    /// The endpoint URI is `uri`, then `root` (if any), then the endpoint
    /// filename, joined by single `/` separators. No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the assembled URI is invalid or the HTTP client
    /// cannot be built.
    pub fn new(uri: &str, options: InterfaceOptions) -> Result<Self> {
        let uri = build_uri(
            uri,
            options.root.as_deref(),
            options.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            http,
            uri,
            email: options.email,
            password: options.password,
            token: options.token,
            method: options.method,
        })
    }

    /// The endpoint URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The stored email address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The stored password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The current token, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the current token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Log on and store the returned token.
    ///
    /// `credentials` overrides the stored email and password for this call
    /// only. Returns the new token.
    ///
    /// # Errors
    ///
    /// - [`FogbugzError::ConfigMissing`] if no credentials are available.
    /// - [`FogbugzError::AuthenticationFailed`] if the reply has no token.
    /// - Any error from [`Command::execute`].
    #[tracing::instrument(skip(self, credentials), fields(uri = %self.uri))]
    pub async fn logon(&mut self, credentials: Option<&Credentials>) -> Result<String> {
        let (email, password) = match credentials {
            Some(c) => (c.email.clone(), c.password.clone()),
            None => match (&self.email, &self.password) {
                (Some(e), Some(p)) => (e.clone(), p.clone()),
                _ => {
                    return Err(FogbugzError::ConfigMissing(
                        "email and password required to log on".to_string(),
                    ))
                }
            },
        };

        let params = Params::from([
            ("email".to_string(), email),
            ("password".to_string(), password),
        ]);
        let response = self.command("logon", params).await?;

        match response["token"].as_str().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.token = Some(token.to_string());
                Ok(token.to_string())
            }
            None => {
                let reason = error_message(&response);
                tracing::warn!(%reason, "logon rejected");
                Err(FogbugzError::AuthenticationFailed(reason))
            }
        }
    }

    /// Log on with the stored credentials.
    ///
    /// # Errors
    ///
    /// See [`logon`](Self::logon).
    pub async fn authenticate(&mut self) -> Result<String> {
        self.logon(None).await
    }

    /// Invalidate the current token on the server and forget it.
    ///
    /// Does nothing when no token is held.
    ///
    /// # Errors
    ///
    /// Any error from [`Command::execute`]; the token is kept in that case.
    pub async fn logoff(&mut self) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }
        self.command("logoff", Params::new()).await?;
        self.token = None;
        Ok(())
    }

    /// Build a command without sending it.
    ///
    /// The parameters are `params` plus `cmd` set to `name` and, when
    /// authenticated, `token`. The interface's `cmd` and `token` take
    /// precedence over entries in `params`.
    pub fn prepare(&self, name: &str, mut params: Params) -> Command {
        params.insert("cmd".to_string(), name.to_string());
        if let Some(token) = &self.token {
            params.insert("token".to_string(), token.clone());
        }

        tracing::debug!(cmd = name, "prepared command");
        Command::new(self.http.clone(), self.uri.clone(), params, self.method)
    }

    /// Run a command and return the decoded reply.
    ///
    /// # Errors
    ///
    /// Any error from [`Command::execute`].
    pub async fn command(&self, name: &str, params: Params) -> Result<Value> {
        self.prepare(name, params).execute().await
    }

    /// Run a command after letting `customize` adjust it.
    ///
    /// # Errors
    ///
    /// Any error from [`Command::execute`].
    pub async fn command_with<F>(&self, name: &str, params: Params, customize: F) -> Result<Value>
    where
        F: FnOnce(&mut Command),
    {
        let mut command = self.prepare(name, params);
        customize(&mut command);
        command.execute().await
    }
}

/// Join host, root and endpoint with single separators.
fn build_uri(uri: &str, root: Option<&str>, endpoint: &str) -> Result<Url> {
    let mut assembled = uri.trim_end_matches('/').to_string();

    if let Some(root) = root.map(|r| r.trim_matches('/')).filter(|r| !r.is_empty()) {
        assembled.push('/');
        assembled.push_str(root);
    }

    assembled.push('/');
    assembled.push_str(endpoint.trim_start_matches('/'));

    Ok(Url::parse(&assembled)?)
}

/// Pull a human-readable reason out of an error reply.
fn error_message(response: &Value) -> String {
    let error = &response["error"];
    error
        .as_str()
        .or_else(|| error[CONTENT_KEY].as_str())
        .unwrap_or("no token in logon response")
        .to_string()
}
