//! Page workflows scoped to the authenticated owner.
//!
//! Every by-id operation goes through [`PageService::resolve_owned`], which
//! reports pages owned by someone else exactly like pages that do not exist.
//! Callers therefore cannot discover which page ids other tenants hold.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{PagePersistenceError, PageRepository, PagesCommand, PagesQuery};
use crate::domain::{Error, NewPage, Page, PageDraft, PageId, UserId};

/// Page service implementing the page command and query ports.
#[derive(Clone)]
pub struct PageService<P: ?Sized> {
    pages: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized> PageService<P> {
    /// Create a service over the given page store.
    pub fn new(pages: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { pages, clock }
    }
}

fn page_not_found() -> Error {
    Error::not_found("page not found")
}

fn map_page_persistence_error(err: PagePersistenceError) -> Error {
    match err {
        PagePersistenceError::Missing { .. } => page_not_found(),
        PagePersistenceError::Connection { message } => {
            error!(%message, "page store unavailable");
            Error::internal("page store unavailable")
        }
        PagePersistenceError::Query { message } => {
            error!(%message, "page store query failed");
            Error::internal("page store error")
        }
    }
}

impl<P> PageService<P>
where
    P: PageRepository + ?Sized,
{
    /// Load `id` if and only if `actor` owns it.
    async fn resolve_owned(&self, actor: &UserId, id: PageId) -> Result<Page, Error> {
        match self
            .pages
            .find_by_id(id)
            .await
            .map_err(map_page_persistence_error)?
        {
            Some(page) if page.is_owned_by(*actor) => Ok(page),
            Some(_) => {
                debug!(page_id = %id, user_id = %actor, "page belongs to another user");
                Err(page_not_found())
            }
            None => Err(page_not_found()),
        }
    }
}

#[async_trait]
impl<P> PagesCommand for PageService<P>
where
    P: PageRepository + ?Sized,
{
    async fn create_page(&self, actor: &UserId, draft: PageDraft) -> Result<Page, Error> {
        let page = self
            .pages
            .create(&NewPage::from_draft(draft, *actor, self.clock.utc()))
            .await
            .map_err(map_page_persistence_error)?;
        info!(page_id = %page.id, user_id = %actor, "page created");
        Ok(page)
    }

    async fn update_page(
        &self,
        actor: &UserId,
        id: PageId,
        draft: PageDraft,
    ) -> Result<Page, Error> {
        let mut page = self.resolve_owned(actor, id).await?;
        page.apply(draft, self.clock.utc());
        self.pages
            .save(&page)
            .await
            .map_err(map_page_persistence_error)?;
        info!(page_id = %id, user_id = %actor, "page updated");
        Ok(page)
    }

    async fn delete_page(&self, actor: &UserId, id: PageId) -> Result<(), Error> {
        self.resolve_owned(actor, id).await?;
        self.pages
            .delete(id)
            .await
            .map_err(map_page_persistence_error)?;
        info!(page_id = %id, user_id = %actor, "page deleted");
        Ok(())
    }
}

#[async_trait]
impl<P> PagesQuery for PageService<P>
where
    P: PageRepository + ?Sized,
{
    async fn list_pages(&self, actor: &UserId) -> Result<Vec<Page>, Error> {
        self.pages
            .list_by_owner(actor)
            .await
            .map_err(map_page_persistence_error)
    }

    async fn get_page(&self, actor: &UserId, id: PageId) -> Result<Page, Error> {
        self.resolve_owned(actor, id).await
    }
}
