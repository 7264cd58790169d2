use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kvv_server::cache::CachedEfaClient;
use kvv_server::config::Settings;
use kvv_server::efa::EfaClient;
use kvv_server::persistence::{NoopSink, PostgisSink, StopSink};
use kvv_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "kvv_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from_env()?;

    let client = EfaClient::new(settings.efa.clone())?;
    let cached = CachedEfaClient::new(client, &settings.cache);

    let sink: Arc<dyn StopSink> = match settings.postgis.clone() {
        Some(config) => {
            info!("persisting discovered stops to PostGIS");
            Arc::new(PostgisSink::new(config)?)
        }
        None => {
            warn!("DATABASE_URL not set; discovered stops will not be persisted");
            Arc::new(NoopSink)
        }
    };

    let state = AppState::new(cached).with_stop_sink(sink);
    let app = create_router(state);

    info!(
        upstream = %settings.efa.base_url,
        ttl_secs = settings.cache.ttl.as_secs(),
        "KVV gateway listening on http://{}",
        settings.bind_addr
    );
    info!("  GET  /health");
    info!("  GET  /api/stops/search?q=&city=&location=");
    info!("  GET  /api/stops/:stop_id?detailed=&delay=&track=");

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
