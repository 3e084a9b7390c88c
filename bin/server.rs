// fincalc - Web Server
// JSON API over the calculators, journaling every calculation

use anyhow::{Context, Result};
use fincalc::api::{router, AppState};
use fincalc::{open_journal, AppConfig, VERSION};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🌐 fincalc {} - Web Server", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Optional first argument: config file
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(explicit.as_deref())?;

    let rules = config.tax_rules()?;
    println!("✓ Tax rules: {}", rules.financial_year);

    let mut state = AppState::new(rules);
    if config.history.enabled {
        let conn = open_journal(&config.history.database_path)?;
        println!("✓ Journal opened: {}", config.history.database_path.display());
        state = state.with_journal(conn);
    } else {
        println!("✓ History disabled");
    }

    let app = router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/calculators", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
