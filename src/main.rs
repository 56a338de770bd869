use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use buddies_corner::config::AppConfig;
use buddies_corner::routes::build_router;
use buddies_corner::startup::setup_backend;

#[derive(Parser, Debug)]
#[command(name = "buddies-corner")]
#[command(about = "Multi-tenant backend for organizing events with groups of friends")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (mut app_config, using_defaults) =
        if args.config == "config.yaml" && !Path::new("config.yaml").exists() {
            (AppConfig::default_config(), true)
        } else {
            let config = AppConfig::load_from_file(&args.config)
                .map_err(|e| format!("Failed to load configuration: {}", e))?;
            (config, false)
        };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app_config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if using_defaults {
        warn!("no config.yaml found, using in-memory SQLite and an unauthenticated tenant");
    }
    app_config.validate()?;

    let backend = setup_backend(&app_config).await?;
    let app_config = Arc::new(app_config);
    let app = build_router(backend, app_config.clone());

    let host: std::net::IpAddr = match app_config.server.host.parse() {
        Ok(host) => host,
        Err(_) => {
            warn!(host = %app_config.server.host, "invalid host address, using 127.0.0.1");
            [127, 0, 0, 1].into()
        }
    };
    let addr = SocketAddr::from((host, app_config.server.port));

    for tenant in &app_config.tenants {
        info!(
            tenant_id = tenant.id,
            base_path = %tenant.base_path(),
            auth = %tenant.auth.auth_type,
            "serving tenant"
        );
    }
    info!(%addr, "buddies corner listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
