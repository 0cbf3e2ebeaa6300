use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{PagePersistenceError, PageRepository};
use crate::domain::{NewPage, Page, PageId, UserId};

use super::poisoned;

#[derive(Debug, Default)]
struct PageTable {
    last_id: i64,
    rows: BTreeMap<i64, Page>,
}

/// Mutex-guarded page store. Listing order follows id order.
#[derive(Debug, Default)]
pub struct InMemoryPageRepository {
    table: Mutex<PageTable>,
}

impl InMemoryPageRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(
        &self,
        f: impl FnOnce(&mut PageTable) -> Result<T, PagePersistenceError>,
    ) -> Result<T, PagePersistenceError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| PagePersistenceError::query(poisoned()))?;
        f(&mut *table)
    }
}

#[async_trait]
impl PageRepository for InMemoryPageRepository {
    async fn create(&self, page: &NewPage) -> Result<Page, PagePersistenceError> {
        self.with_table(|table| {
            table.last_id += 1;
            let id = PageId::new(table.last_id)
                .map_err(|err| PagePersistenceError::query(err.to_string()))?;
            let stored = Page {
                id,
                title: page.title.clone(),
                content: page.content.clone(),
                owner_id: page.owner_id,
                created_at: page.created_at,
                updated_at: page.created_at,
            };
            table.rows.insert(id.as_i64(), stored.clone());
            Ok(stored)
        })
    }

    async fn find_by_id(&self, id: PageId) -> Result<Option<Page>, PagePersistenceError> {
        self.with_table(|table| Ok(table.rows.get(&id.as_i64()).cloned()))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Page>, PagePersistenceError> {
        self.with_table(|table| {
            Ok(table
                .rows
                .values()
                .filter(|page| page.is_owned_by(*owner))
                .cloned()
                .collect())
        })
    }

    async fn save(&self, page: &Page) -> Result<(), PagePersistenceError> {
        self.with_table(|table| {
            let stored = table
                .rows
                .get_mut(&page.id.as_i64())
                .ok_or_else(|| PagePersistenceError::missing(page.id.as_i64()))?;
            stored.title.clone_from(&page.title);
            stored.content.clone_from(&page.content);
            stored.updated_at = page.updated_at;
            Ok(())
        })
    }

    async fn delete(&self, id: PageId) -> Result<(), PagePersistenceError> {
        self.with_table(|table| {
            table
                .rows
                .remove(&id.as_i64())
                .map(|_| ())
                .ok_or_else(|| PagePersistenceError::missing(id.as_i64()))
        })
    }
}
