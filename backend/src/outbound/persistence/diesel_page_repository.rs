//! PostgreSQL-backed [`PageRepository`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PagePersistenceError, PageRepository};
use crate::domain::{NewPage, Page, PageId, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewPageRow, PageChangeset, PageRow};
use super::pool::{DbPool, PoolError};
use super::schema::pages;

/// Diesel implementation of the page store.
#[derive(Clone)]
pub struct DieselPageRepository {
    pool: DbPool,
}

impl DieselPageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PagePersistenceError {
    PagePersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: &diesel::result::Error) -> PagePersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => {
            PagePersistenceError::connection(DieselFailure::Connection.message())
        }
        failure => PagePersistenceError::query(failure.message()),
    }
}

fn row_to_page(row: PageRow) -> Result<Page, PagePersistenceError> {
    let id = PageId::new(row.id)
        .map_err(|_| PagePersistenceError::query(format!("stored page id {} is invalid", row.id)))?;
    let owner_id = UserId::new(row.user_id).map_err(|_| {
        PagePersistenceError::query(format!("stored owner id {} is invalid", row.user_id))
    })?;
    Ok(Page {
        id,
        title: row.title,
        content: row.content,
        owner_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn expect_one_row(affected: usize, id: PageId) -> Result<(), PagePersistenceError> {
    if affected == 0 {
        return Err(PagePersistenceError::missing(id.as_i64()));
    }
    Ok(())
}

#[async_trait]
impl PageRepository for DieselPageRepository {
    async fn create(&self, page: &NewPage) -> Result<Page, PagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPageRow {
            title: &page.title,
            content: &page.content,
            user_id: page.owner_id.as_i64(),
            created_at: page.created_at,
            updated_at: page.created_at,
        };

        let stored = diesel::insert_into(pages::table)
            .values(&row)
            .returning(PageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        row_to_page(stored)
    }

    async fn find_by_id(&self, id: PageId) -> Result<Option<Page>, PagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        pages::table
            .find(id.as_i64())
            .select(PageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(row_to_page)
            .transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Page>, PagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PageRow> = pages::table
            .filter(pages::user_id.eq(owner.as_i64()))
            .order(pages::id.asc())
            .select(PageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        rows.into_iter().map(row_to_page).collect()
    }

    async fn save(&self, page: &Page) -> Result<(), PagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(pages::table.find(page.id.as_i64()))
            .set(&PageChangeset {
                title: &page.title,
                content: &page.content,
                updated_at: page.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        expect_one_row(affected, page.id)
    }

    async fn delete(&self, id: PageId) -> Result<(), PagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(pages::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        expect_one_row(affected, id)
    }
}
