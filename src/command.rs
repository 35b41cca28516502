//! A single FogBugz API call.

use std::collections::BTreeMap;

use reqwest::Client;
use url::Url;

use crate::error::{FogbugzError, Result};
use crate::value::Value;
use crate::xml::parse_response;

/// Request parameters, keyed by FogBugz field name.
pub type Params = BTreeMap<String, String>;

/// How parameters travel to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMethod {
    /// Parameters in the query string.
    Get,
    /// Parameters as a urlencoded form body.
    #[default]
    Post,
}

/// One request/response exchange with the FogBugz API.
///
/// Commands are usually built by [`Interface::prepare`](crate::Interface::prepare),
/// adjusted with [`param`](Self::param) and then consumed by
/// [`execute`](Self::execute).
///
/// # Example
///
/// ```no_run
/// use fogbugz::{Interface, InterfaceOptions, Params};
///
/// # async fn example() -> fogbugz::Result<()> {
/// let fogbugz = Interface::new(
///     "https://example.fogbugz.com",
///     InterfaceOptions::default().with_token("secret"),
/// )?;
///
/// let mut command = fogbugz.prepare("search", Params::new());
/// command.param("q", "assignedto:me").param("cols", "sTitle");
/// let cases = command.execute().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Command {
    http: Client,
    uri: Url,
    params: Params,
    method: RequestMethod,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("uri", &self.uri.as_str())
            .field("cmd", &self.name())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// Create a command. No I/O happens until [`execute`](Self::execute).
    pub fn new(http: Client, uri: Url, params: Params, method: RequestMethod) -> Self {
        Self {
            http,
            uri,
            params,
            method,
        }
    }

    /// Set or override a parameter.
    pub fn param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove_param(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// The parameters that will be sent.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The remote operation name (the `cmd` parameter).
    pub fn name(&self) -> Option<&str> {
        self.params.get("cmd").map(String::as_str)
    }

    /// The endpoint this command targets.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The HTTP method used for the request.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Send the request and decode the XML reply.
    ///
    /// # Errors
    ///
    /// - [`FogbugzError::Network`] if the request cannot be sent or the body
    ///   cannot be read.
    /// - [`FogbugzError::Api`] for a non-success HTTP status.
    /// - [`FogbugzError::Parse`] if the body is not a well-formed document.
    #[tracing::instrument(skip(self), fields(cmd = self.name().unwrap_or_default()))]
    pub async fn execute(self) -> Result<Value> {
        let request = match self.method {
            RequestMethod::Get => self.http.get(self.uri).query(&self.params),
            RequestMethod::Post => self.http.post(self.uri).form(&self.params),
        };

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "FogBugz responded");

        let body = response.text().await?;
        if !status.is_success() {
            return Err(FogbugzError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}
