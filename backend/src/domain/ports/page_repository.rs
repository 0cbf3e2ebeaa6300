//! Port abstraction for page persistence adapters and their errors.
//!
//! The repository stores pages for every tenant; ownership checks belong to
//! the domain service that drives it.
use async_trait::async_trait;

use crate::domain::{NewPage, Page, PageId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by page repository adapters.
    pub enum PagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "page repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "page repository query failed: {message}",
        /// The targeted page no longer exists.
        Missing { id: i64 } => "page {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert a new page and return it with its assigned id.
    async fn create(&self, page: &NewPage) -> Result<Page, PagePersistenceError>;

    /// Fetch a page by identifier regardless of owner.
    async fn find_by_id(&self, id: PageId) -> Result<Option<Page>, PagePersistenceError>;

    /// All pages owned by `owner`, ordered by id ascending.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Page>, PagePersistenceError>;

    /// Persist title, content and `updated_at` of an existing page.
    ///
    /// Fails with [`PagePersistenceError::Missing`] if the row is gone.
    async fn save(&self, page: &Page) -> Result<(), PagePersistenceError>;

    /// Remove a page. Fails with [`PagePersistenceError::Missing`] if absent.
    async fn delete(&self, id: PageId) -> Result<(), PagePersistenceError>;
}
