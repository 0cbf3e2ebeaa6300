//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler and DTO schema. Swagger UI serves it
//! at `/docs` in debug builds and `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ApiError;
use crate::inbound::http::pages::{PageRequest, PageResponse};
use crate::inbound::http::users::{
    AuthResponse, LoginRequest, ProfileResponse, SignupRequest, UserResponse,
};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME_NAME: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME_NAME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/signup or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Flowboard API",
        description = "Multi-tenant notes: account registration, bearer-token login and owner-scoped pages."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::pages::list_pages,
        crate::inbound::http::pages::create_page,
        crate::inbound::http::pages::get_page,
        crate::inbound::http::pages::update_page,
        crate::inbound::http::pages::delete_page,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        SignupRequest,
        LoginRequest,
        UserResponse,
        AuthResponse,
        ProfileResponse,
        PageRequest,
        PageResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "The authenticated user"),
        (name = "pages", description = "Pages owned by the authenticated user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
