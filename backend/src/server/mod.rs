//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::{SecurityConfig, Storage, build_http_state, connect_storage};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use flowboard::Trace;
use flowboard::doc::ApiDoc;
use flowboard::inbound::http::health::{HealthState, live, ready};
use flowboard::inbound::http::{HttpState, configure_api};

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    swagger_ui: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    app.configure(|cfg| {
        if swagger_ui {
            cfg.service(
                SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }
    })
}

/// Bind the HTTP server. Readiness flips once the listener is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails, or when
/// the `metrics` feature is on and no Prometheus middleware was configured.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        bind_addr,
        swagger_ui,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    #[cfg(feature = "metrics")]
    let prometheus = prometheus.ok_or_else(|| {
        std::io::Error::other("metrics feature enabled without Prometheus middleware")
    })?;

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone(), swagger_ui);

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
