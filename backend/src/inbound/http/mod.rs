//! HTTP inbound adapter exposing the REST API.
//!
//! [`configure_api`] mounts every `/api` route; health probes and
//! documentation are mounted separately by the server.

pub mod auth;
pub mod error;
pub mod health;
pub mod pages;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

/// Register the `/api` scope and its JSON configuration.
///
/// ```
/// use actix_web::App;
/// use flowboard::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(validation::json_config())
            .service(users::signup)
            .service(users::login)
            .service(users::current_user)
            .service(pages::list_pages)
            .service(pages::create_page)
            .service(pages::get_page)
            .service(pages::update_page)
            .service(pages::delete_page),
    );
}
