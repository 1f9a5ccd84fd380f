use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipquery::auth::SignatureVerifier;
use ipquery::config::{Config, Overrides};
use ipquery::geoip::{GeoLookup, MaxMindProvider};
use ipquery::localization::{load_tables, Localizer};
use ipquery::query::QueryGateway;

/// IP geolocation query service
///
/// Serves `GET /query?ip=<ip>[,<ip>...]` over HTTP, or answers a single
/// batch with `--query` and exits.
#[derive(Parser)]
#[command(name = "ipquery", version, about, long_about = None)]
struct Cli {
    /// Query comma-separated IP addresses directly and print the JSON result
    #[arg(long)]
    query: Option<String>,

    /// Path to the GeoIP database [env: IPQUERY_DB_PATH]
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Listen host [env: IPQUERY_HOST]
    #[arg(long)]
    host: Option<String>,

    /// Listen port [env: IPQUERY_PORT]
    #[arg(long)]
    port: Option<u16>,

    /// Shared secret for request signatures; empty disables them [env: IPQUERY_API_KEY]
    #[arg(long)]
    api_key: Option<String>,

    /// Directory with countries.json, regions.json and cities.json [env: IPQUERY_LOCALIZATION_DIR]
    #[arg(long)]
    localization_dir: Option<PathBuf>,

    /// Locale subdirectory of the localization directory [env: IPQUERY_LOCALE]
    #[arg(long)]
    locale: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            db_path: self.db_path.clone(),
            host: self.host.clone(),
            port: self.port,
            api_key: self.api_key.clone(),
            localization_dir: self.localization_dir.clone(),
            locale: self.locale.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `--query` output stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.apply(cli.overrides());
    info!(
        db_path = %config.geoip.db_path.display(),
        listen = %config.server.bind_addr(),
        "Loaded configuration"
    );

    let provider: Arc<dyn GeoLookup> = Arc::new(MaxMindProvider::open(&config.geoip.db_path)?);
    info!("Opened GeoIP database {}", config.geoip.db_path.display());

    let tables = load_tables(
        &config.localization.dir,
        config.localization.locale.as_deref(),
    );
    let localizer = Arc::new(Localizer::new(tables));

    let verifier = config
        .auth
        .api_key
        .clone()
        .and_then(SignatureVerifier::new);
    let gateway = QueryGateway::new(provider, localizer, verifier);

    if let Some(query) = cli.query.as_deref().filter(|q| !q.is_empty()) {
        let output = gateway.query_direct(query)?;
        println!("{}", output);
        return Ok(());
    }

    if gateway.auth_enabled() {
        info!("🔐 Request signatures required (time + sign parameters)");
    } else {
        info!("🔓 Request signatures disabled - all queries are allowed");
    }

    let router = ipquery::api::create_api_router(gateway);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🚀 API server listening on http://{}", addr);
    info!("   - Query endpoint: http://{}/query?ip=<ip>[,<ip>...]", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
