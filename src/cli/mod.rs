//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the fogbugz binary.

use clap::{Args, Parser, Subcommand};

use crate::{InterfaceOptions, Params, RequestMethod};

/// FogBugz API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "fogbugz", about = "FogBugz API CLI", version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: Connection,

    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where and how to connect.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Installation URL.
    #[arg(long, env = "FOGBUGZ_URL", global = true)]
    pub url: Option<String>,

    /// Path to the installation below the host.
    #[arg(long, env = "FOGBUGZ_ROOT", global = true)]
    pub root: Option<String>,

    /// API endpoint filename (defaults to api.asp).
    #[arg(long, env = "FOGBUGZ_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Logon email.
    #[arg(long, env = "FOGBUGZ_EMAIL", global = true)]
    pub email: Option<String>,

    /// Logon password.
    #[arg(long, env = "FOGBUGZ_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Previously issued token.
    #[arg(long, env = "FOGBUGZ_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Send parameters in the query string instead of a form body.
    #[arg(long, global = true, default_value = "false")]
    pub get: bool,
}

impl Connection {
    /// Options for [`crate::Interface::new`].
    pub fn options(&self) -> InterfaceOptions {
        InterfaceOptions {
            email: self.email.clone(),
            password: self.password.clone(),
            token: self.token.clone(),
            root: self.root.clone(),
            endpoint: self.endpoint.clone(),
            method: if self.get {
                RequestMethod::Get
            } else {
                RequestMethod::Post
            },
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log on with the configured email and password and print the token.
    Logon,

    /// Run an API command.
    #[command(name = "command", alias = "cmd")]
    Run {
        /// The FogBugz command name, e.g. `search`.
        name: String,

        /// Parameters as key=value pairs.
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

impl Command {
    /// Collect `key=value` arguments into request parameters.
    pub fn params(&self) -> Params {
        match self {
            Self::Logon => Params::new(),
            Self::Run { params, .. } => params.iter().cloned().collect(),
        }
    }
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}
