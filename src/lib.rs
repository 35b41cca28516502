//! FogBugz API client library.
//!
//! A small client for the FogBugz XML API. An [`Interface`] holds the
//! endpoint and authentication state; every call becomes a [`Command`] that
//! is sent once and whose XML reply is decoded into a generic [`Value`] tree.
//!
//! # Quick Start
//!
//! ```no_run
//! use fogbugz::{Interface, Params};
//!
//! #[tokio::main]
//! async fn main() -> fogbugz::Result<()> {
//!     // Create an interface from environment variables
//!     let mut fogbugz = Interface::from_env()?;
//!
//!     // Exchange the stored email/password for a token
//!     let token = fogbugz.authenticate().await?;
//!     println!("Token: {token}");
//!
//!     // Run a command; the token is added automatically
//!     let projects = fogbugz.command("listProjects", Params::new()).await?;
//!     for project in projects["projects"]["project"].as_sequence() {
//!         println!("{}", project["sProject"].to_display_string());
//!     }
//!
//!     // Add parameters just before the request goes out
//!     let cases = fogbugz
//!         .command_with("search", Params::new(), |cmd| {
//!             cmd.param("q", "status:active").param("cols", "sTitle");
//!         })
//!         .await?;
//!     println!("{} cases", cases["cases"]["count"].to_display_string());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`Interface::new`] takes an [`InterfaceOptions`]. [`Interface::from_env`]
//! reads the same settings from the environment:
//!
//! - `FOGBUGZ_URL` (required) - Installation URL, e.g. `https://example.com`
//! - `FOGBUGZ_ROOT` (optional) - Path to the installation, e.g. `fogbugz`
//! - `FOGBUGZ_ENDPOINT` (optional) - API filename (defaults to `api.asp`)
//! - `FOGBUGZ_EMAIL`, `FOGBUGZ_PASSWORD` (optional) - Logon credentials
//! - `FOGBUGZ_TOKEN` (optional) - A previously issued token

pub mod cli;
mod command;
mod error;
mod interface;
pub mod output;
mod value;
mod xml;

#[cfg(feature = "test-server")]
pub mod mock_server;

pub use command::{Command, Params, RequestMethod};
pub use error::{FogbugzError, Result};
pub use interface::{Credentials, Interface, InterfaceOptions, DEFAULT_ENDPOINT};
pub use value::{Value, CONTENT_KEY};
pub use xml::parse_response;
