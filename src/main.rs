// Main entry point - Dependency injection and server setup
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dashboard_signage::application::credential_store::CredentialStore;
use dashboard_signage::application::display_runtime::spawn_display;
use dashboard_signage::infrastructure::config::load_server_config;
use dashboard_signage::infrastructure::connection_tester::ConnectionTester;
use dashboard_signage::infrastructure::json_store::JsonFileStore;
use dashboard_signage::infrastructure::proxy_gateway::ProxyGateway;
use dashboard_signage::infrastructure::uptimekuma_source::UptimeKumaSource;
use dashboard_signage::presentation::app_state::AppState;
use dashboard_signage::presentation::router::create_router;

#[derive(Debug, Parser)]
#[command(name = "dashboard-signage", version, about = "Rotating dashboard display with a framing proxy")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "SIGNAGE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "SIGNAGE_PORT")]
    port: Option<u16>,

    /// Path of the dashboard store
    #[arg(long, env = "SIGNAGE_STORE")]
    store: Option<PathBuf>,

    /// Print the stored dashboard configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // Load configuration, flags win over file and environment
    let mut server_config = load_server_config()?;
    if let Some(host) = cli.host {
        server_config.server.host = host;
    }
    if let Some(port) = cli.port {
        server_config.server.port = port;
    }
    if let Some(store) = cli.store {
        server_config.store.path = store;
    }

    let store = Arc::new(JsonFileStore::new(server_config.store.path.clone()));
    let signage = store
        .load()
        .await
        .with_context(|| format!("Failed to load {}", store.path().display()))?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&signage.masked())?);
        return Ok(());
    }

    // Create adapters (infrastructure layer)
    let user_agent = server_config.proxy.user_agent.as_str();
    let gateway = ProxyGateway::new(user_agent, server_config.proxy_timeout())?;
    let tester = ConnectionTester::new(user_agent, server_config.tester_timeout())?;
    let status_source = Arc::new(UptimeKumaSource::new(user_agent, server_config.tester_timeout())?);

    // Start the display (application layer)
    tracing::info!(
        "Loaded {} dashboards ({} active) from {}",
        signage.dashboards.len(),
        signage.active_dashboards().len(),
        store.path().display()
    );
    let display = spawn_display(signage);

    let state = Arc::new(AppState {
        store,
        gateway,
        tester,
        status_source,
        display: display.clone(),
    });
    let router = create_router(state);

    let addr = server_config.bind_addr()?;
    tracing::info!("Starting dashboard-signage on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    display.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
