//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data<HttpState>` and only see domain
//! ports, so tests can swap in mocks or in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{AccountService, PagesCommand, PagesQuery, TokenService};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub pages: Arc<dyn PagesCommand>,
    pub pages_query: Arc<dyn PagesQuery>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Bundle the ports handlers depend on.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        pages: Arc<dyn PagesCommand>,
        pages_query: Arc<dyn PagesQuery>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            pages,
            pages_query,
            tokens,
        }
    }
}
