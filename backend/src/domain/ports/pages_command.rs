//! Driving port for page mutations on behalf of an authenticated user.

use async_trait::async_trait;

use crate::domain::{Error, Page, PageDraft, PageId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PagesCommand: Send + Sync {
    /// Create a page owned by `actor`.
    async fn create_page(&self, actor: &UserId, draft: PageDraft) -> Result<Page, Error>;

    /// Replace title and content of a page owned by `actor`.
    async fn update_page(&self, actor: &UserId, id: PageId, draft: PageDraft)
    -> Result<Page, Error>;

    /// Delete a page owned by `actor`.
    async fn delete_page(&self, actor: &UserId, id: PageId) -> Result<(), Error>;
}
