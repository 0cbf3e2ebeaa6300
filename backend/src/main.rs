//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use flowboard::config::{AppSettings, BuildMode, token_secret_from_env};
use flowboard::inbound::http::health::HealthState;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;

use server::{SecurityConfig, ServerConfig, build_http_state, connect_storage, create_server};

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("flowboard")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mode = BuildMode::from_debug_assertions();
    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let security = SecurityConfig {
        bcrypt_cost: settings.bcrypt_cost().map_err(std::io::Error::other)?,
        token_ttl: settings.token_ttl().map_err(std::io::Error::other)?,
        secret: token_secret_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)?,
    };
    if security.secret.is_ephemeral() {
        warn!("issued tokens will not survive a restart");
    }

    let storage = connect_storage(&settings, mode).await?;
    let http_state = build_http_state(&storage, security);

    let config = ServerConfig::new(bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    info!(%bind_addr, "starting flowboard");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
