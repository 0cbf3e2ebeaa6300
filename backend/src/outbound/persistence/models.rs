//! Internal Diesel row structs.
//!
//! Rows never leave the persistence module; repositories convert them into
//! domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{pages, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PageRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pages)]
pub(crate) struct NewPageRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns of a page. Owner and creation time are never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pages)]
pub(crate) struct PageChangeset<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub updated_at: DateTime<Utc>,
}
