//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field-level failures become `invalid_request` errors whose details name
//! the offending field and a stable reason code:
//! `{"field": "title", "code": "empty_title"}`.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{CredentialsValidationError, Error, PageId, PageValidationError};
use crate::inbound::http::error::ApiError;

const MALFORMED_BODY_MESSAGE: &str = "request body must be valid JSON";
const INVALID_PAGE_ID_MESSAGE: &str = "invalid page id";

fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn map_credentials_error(err: &CredentialsValidationError) -> Error {
    field_error(err.to_string(), err.field(), err.code())
}

pub(crate) fn map_page_error(err: &PageValidationError) -> Error {
    field_error(err.to_string(), err.field(), err.code())
}

/// Parse the `{id}` path segment of a page route.
pub(crate) fn parse_page_id(raw: &str) -> Result<PageId, Error> {
    raw.parse::<PageId>().map_err(|err| {
        field_error(INVALID_PAGE_ID_MESSAGE, err.field(), err.code())
    })
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let error = match err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("content type must be application/json")
        }
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            Error::invalid_request("request body too large")
        }
        _ => Error::invalid_request(MALFORMED_BODY_MESSAGE),
    };
    ApiError::from(error).into()
}

/// JSON extractor configuration reporting body errors in the API envelope.
pub(crate) fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}
