//! geo-resolve - Place Name Resolution Service with Hexagonal Architecture
//!
//! This is the composition root that wires together all the components.

use geo_resolve::adapters::inbound::{ApiServer, ApiState};
use geo_resolve::adapters::outbound::{
    build_client, BingConfig, BingGeocoder, BoundaryServiceConfig, GazetteerRecognizer,
    GeocodeMapsBoundarySource, HttpEntityRecognizer, NominatimConfig, NominatimGeocoder,
};
use geo_resolve::application::{PipelineSettings, ResolutionContext, ResolutionService};
use geo_resolve::config::{load_config, Config};
use geo_resolve::domain::ports::{EntityRecognizer, GeocodingBackend};
use geo_resolve::infrastructure::{RetryPolicy, ShutdownController};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

/// Grace period for in-flight runs once the server stops accepting.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geo-resolve listen={} max_concurrent={} (hexagonal architecture)",
        cfg.listen_addr,
        cfg.max_concurrent
    );

    // ===== COMPOSITION ROOT =====

    // 1. Create outbound adapters
    let client = build_client(Duration::from_secs(cfg.http_timeout_secs), &cfg.user_agent)?;

    let geocoders = geocoders(&cfg, &client);
    if geocoders.is_empty() {
        anyhow::bail!("no geocoding backend configured (check GEORESOLVE_GEOCODERS and GEORESOLVE_BING_KEY)");
    }

    let recognizer = recognizer(&cfg, &client)?;

    let boundary_source = Arc::new(GeocodeMapsBoundarySource::new(
        BoundaryServiceConfig {
            base_url: cfg.boundary_url.clone(),
            api_key: cfg.boundary_api_key.clone(),
        },
        client,
    ));

    // 2. Create application service
    let settings = PipelineSettings {
        retry: RetryPolicy::new(
            cfg.geocode_attempts,
            Duration::from_secs(cfg.retry_delay_secs),
        ),
        lookup_timeout: Duration::from_secs(cfg.lookup_timeout_secs),
    };

    let service = Arc::new(ResolutionService::new(
        ResolutionContext::with_limit(cfg.max_concurrent),
        recognizer,
        geocoders,
        boundary_source,
        settings,
    ));

    // 3. Create inbound adapter and run
    let shutdown = ShutdownController::new();
    let server = ApiServer::new(cfg.listen_addr.clone(), ApiState::new(service, shutdown.clone()));

    server.run().await?;

    if !shutdown.wait_for_drain(DRAIN_TIMEOUT).await {
        tracing::warn!(
            "shutdown with {} resolution run(s) still in flight",
            shutdown.active_runs()
        );
    }
    tracing::info!("geo-resolve stopped");
    Ok(())
}

/// Geocoding backends in configured fallback order.
fn geocoders(cfg: &Config, client: &reqwest::Client) -> Vec<Arc<dyn GeocodingBackend>> {
    let mut backends: Vec<Arc<dyn GeocodingBackend>> = Vec::new();

    for name in &cfg.geocoders {
        match name.as_str() {
            "bing" => match &cfg.bing_key {
                Some(key) => backends.push(Arc::new(BingGeocoder::new(
                    BingConfig {
                        base_url: cfg.bing_url.clone(),
                        api_key: key.clone(),
                    },
                    client.clone(),
                ))),
                None => tracing::warn!("bing geocoder skipped: GEORESOLVE_BING_KEY not set"),
            },
            "nominatim" => backends.push(Arc::new(NominatimGeocoder::new(
                NominatimConfig {
                    base_url: cfg.nominatim_url.clone(),
                    user_agent: cfg.user_agent.clone(),
                },
                client.clone(),
            ))),
            other => tracing::warn!("ignoring unknown geocoder {}", other),
        }
    }

    let names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
    tracing::info!("geocoders: {}", names.join(" -> "));
    backends
}

/// NER server when configured, otherwise the gazetteer.
fn recognizer(cfg: &Config, client: &reqwest::Client) -> anyhow::Result<Arc<dyn EntityRecognizer>> {
    if let Some(url) = &cfg.ner_url {
        tracing::info!("entity recognizer: NER server at {}", url);
        return Ok(Arc::new(HttpEntityRecognizer::new(url.clone(), client.clone())));
    }

    let gazetteer = match &cfg.gazetteer_path {
        Some(path) => {
            let g = GazetteerRecognizer::from_file(path)?;
            tracing::info!("entity recognizer: gazetteer {} ({} entries)", path, g.len());
            g
        }
        None => {
            let g = GazetteerRecognizer::builtin();
            tracing::info!("entity recognizer: built-in gazetteer ({} entries)", g.len());
            g
        }
    };
    Ok(Arc::new(gazetteer))
}
