//! Bearer-token authentication extractor.
//!
//! Handlers that take an [`AuthenticatedUser`] argument only run once the
//! `Authorization: Bearer <token>` header carries a valid token. Rejections
//! are 401 responses in the standard error envelope.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderValue};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::{Error, UserId};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

pub(crate) const MISSING_HEADER_MESSAGE: &str = "authorization header required";
pub(crate) const INVALID_HEADER_MESSAGE: &str = "invalid authorization header";
pub(crate) const INVALID_TOKEN_MESSAGE: &str = "invalid token";

/// The user id proven by the request's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Only the exact `Bearer` scheme followed by a non-empty token is accepted.
pub(crate) fn bearer_token(value: &HeaderValue) -> Result<&str, Error> {
    let raw = value
        .to_str()
        .map_err(|_| Error::unauthorized(INVALID_HEADER_MESSAGE))?;
    match raw.split_once(' ') {
        Some((BEARER_SCHEME, token)) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(Error::unauthorized(INVALID_HEADER_MESSAGE)),
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("HttpState missing from app data");
        Error::internal("authentication is not configured")
    })?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(MISSING_HEADER_MESSAGE))?;
    let token = bearer_token(header)?;
    let user_id = state.tokens.verify(token).map_err(|err| {
        debug!(reason = %err, "bearer token rejected");
        Error::unauthorized(INVALID_TOKEN_MESSAGE)
    })?;
    Ok(AuthenticatedUser(user_id))
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req).map_err(ApiError::from))
    }
}
