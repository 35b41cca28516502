//! Basic example demonstrating the FogBugz API client.
//!
//! Run with:
//! ```
//! FOGBUGZ_URL=https://example.fogbugz.com FOGBUGZ_EMAIL=me@example.com \
//!     FOGBUGZ_PASSWORD=secret cargo run --example basic
//! ```

use fogbugz::{Interface, Params};

#[tokio::main]
async fn main() -> fogbugz::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating FogBugz interface...");
    let mut fogbugz = Interface::from_env()?;
    println!("Endpoint: {}", fogbugz.uri());

    if fogbugz.token().is_none() {
        println!("\n--- Logging on ---");
        fogbugz.authenticate().await?;
        println!("Got a token");
    }

    println!("\n--- Listing Projects ---");
    let projects = fogbugz.command("listProjects", Params::new()).await?;
    for project in projects["projects"]["project"].as_sequence() {
        println!(
            "  - {} (#{})",
            project["sProject"].to_display_string(),
            project["ixProject"].to_display_string()
        );
    }

    println!("\n--- Searching Active Cases ---");
    let cases = fogbugz
        .command_with("search", Params::new(), |cmd| {
            cmd.param("q", "status:active").param("cols", "sTitle,sProject");
        })
        .await?;
    println!("Found {} cases", cases["cases"]["count"].to_display_string());

    for case in cases["cases"]["case"].as_sequence().iter().take(5) {
        println!(
            "  {}. {}",
            case["ixBug"].to_display_string(),
            case["sTitle"].to_display_string()
        );
    }

    fogbugz.logoff().await?;
    println!("\nDone!");
    Ok(())
}
