//! Page API handlers.
//!
//! Every route requires a bearer token and only ever touches the caller's
//! own pages. A page owned by someone else answers `404` exactly like a page
//! that does not exist.
//!
//! ```text
//! GET    /api/pages
//! POST   /api/pages {"title":"Groceries","content":"milk, eggs"}
//! GET    /api/pages/{id}
//! PUT    /api/pages/{id} {"title":"Groceries","content":"milk"}
//! DELETE /api/pages/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Page, PageDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_page_error, parse_page_id};

/// Body for creating or replacing a page.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    #[schema(example = "Groceries")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "milk, eggs")]
    pub content: String,
}

impl TryFrom<PageRequest> for PageDraft {
    type Error = Error;

    fn try_from(value: PageRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.title, &value.content).map_err(|err| map_page_error(&err))
    }
}

/// Page as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Id of the owning user.
    #[schema(example = 1)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        Self {
            id: page.id.as_i64(),
            title: page.title,
            content: page.content,
            user_id: page.owner_id.as_i64(),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// List the caller's pages, oldest first.
#[utoipa::path(
    get,
    path = "/api/pages",
    responses(
        (status = 200, description = "Caller's pages", body = [PageResponse]),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["pages"],
    operation_id = "listPages",
    security(("BearerAuth" = []))
)]
#[get("/pages")]
pub async fn list_pages(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<PageResponse>>> {
    let pages = state.pages_query.list_pages(&caller.user_id()).await?;
    Ok(web::Json(pages.into_iter().map(PageResponse::from).collect()))
}

/// Create a page owned by the caller.
#[utoipa::path(
    post,
    path = "/api/pages",
    request_body = PageRequest,
    responses(
        (status = 201, description = "Page created", body = PageResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["pages"],
    operation_id = "createPage",
    security(("BearerAuth" = []))
)]
#[post("/pages")]
pub async fn create_page(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<PageRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PageDraft::try_from(payload.into_inner())?;
    let page = state.pages.create_page(&caller.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(PageResponse::from(page)))
}

/// Fetch one of the caller's pages.
#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page identifier")),
    responses(
        (status = 200, description = "Page", body = PageResponse),
        (status = 400, description = "Invalid page id", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "No such page for this caller", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["pages"],
    operation_id = "getPage",
    security(("BearerAuth" = []))
)]
#[get("/pages/{id}")]
pub async fn get_page(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<PageResponse>> {
    let id = parse_page_id(&path)?;
    let page = state.pages_query.get_page(&caller.user_id(), id).await?;
    Ok(web::Json(page.into()))
}

/// Replace the title and content of one of the caller's pages.
#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page identifier")),
    request_body = PageRequest,
    responses(
        (status = 200, description = "Updated page", body = PageResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "No such page for this caller", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["pages"],
    operation_id = "updatePage",
    security(("BearerAuth" = []))
)]
#[put("/pages/{id}")]
pub async fn update_page(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<PageRequest>,
) -> ApiResult<web::Json<PageResponse>> {
    let id = parse_page_id(&path)?;
    let draft = PageDraft::try_from(payload.into_inner())?;
    let page = state
        .pages
        .update_page(&caller.user_id(), id, draft)
        .await?;
    Ok(web::Json(page.into()))
}

/// Delete one of the caller's pages.
#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page identifier")),
    responses(
        (status = 204, description = "Page deleted"),
        (status = 400, description = "Invalid page id", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "No such page for this caller", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["pages"],
    operation_id = "deletePage",
    security(("BearerAuth" = []))
)]
#[delete("/pages/{id}")]
pub async fn delete_page(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_page_id(&path)?;
    state.pages.delete_page(&caller.user_id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}
