//! FogBugz API CLI binary.
//!
//! A command-line interface for running FogBugz API commands.

use clap::Parser;
use fogbugz::cli::{Cli, Command};
use fogbugz::output::PrettyPrint;
use fogbugz::{FogbugzError, Interface};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let fogbugz = match connect(&cli) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set FOGBUGZ_URL or pass --url");
            return ExitCode::FAILURE;
        }
    };

    match run(fogbugz, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(FogbugzError::Api { status, body }) => {
            eprintln!("Error: HTTP {status}");
            eprintln!("{body}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn connect(cli: &Cli) -> fogbugz::Result<Interface> {
    let url = cli.connection.url.as_deref().ok_or_else(|| {
        FogbugzError::ConfigMissing("installation URL not set".to_string())
    })?;
    Interface::new(url, cli.connection.options())
}

async fn run(mut fogbugz: Interface, cli: Cli) -> fogbugz::Result<()> {
    let params = cli.command.params();
    match cli.command {
        Command::Logon => {
            let token = fogbugz.authenticate().await?;
            println!("{token}");
        }
        Command::Run { name, .. } => {
            let has_credentials = fogbugz.email().is_some() && fogbugz.password().is_some();
            if fogbugz.token().is_none() && has_credentials && name != "logon" {
                fogbugz.authenticate().await?;
            }

            let response = fogbugz.command(&name, params).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.pretty_print());
            }
        }
    }
    Ok(())
}
