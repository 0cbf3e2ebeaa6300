//! Driving port for reading pages on behalf of an authenticated user.

use async_trait::async_trait;

use crate::domain::{Error, Page, PageId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PagesQuery: Send + Sync {
    /// Pages owned by `actor`, oldest first.
    async fn list_pages(&self, actor: &UserId) -> Result<Vec<Page>, Error>;

    /// A single page owned by `actor`. Pages owned by anyone else are
    /// reported exactly like missing ones.
    async fn get_page(&self, actor: &UserId, id: PageId) -> Result<Page, Error>;
}
