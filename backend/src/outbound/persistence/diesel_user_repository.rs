//! PostgreSQL-backed [`UserRepository`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUserAccount, PasswordHash, UserAccount, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the user store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(
    error: &diesel::result::Error,
    attempted_email: Option<&str>,
) -> UserPersistenceError {
    match (classify_diesel_error(error), attempted_email) {
        (DieselFailure::UniqueViolation, Some(email)) => UserPersistenceError::duplicate_email(email),
        (DieselFailure::Connection, _) => {
            UserPersistenceError::connection(DieselFailure::Connection.message())
        }
        (failure, _) => UserPersistenceError::query(failure.message()),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let id = UserId::new(row.id)
        .map_err(|_| UserPersistenceError::query(format!("stored user id {} is invalid", row.id)))?;
    Ok(UserAccount {
        id,
        name: row.name,
        email: row.email,
        password_hash: PasswordHash::new(row.password_hash),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            name: account.name.as_ref(),
            email: account.email.as_ref(),
            password_hash: account.password_hash.as_str(),
            created_at: account.created_at,
            updated_at: account.created_at,
        };

        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, Some(account.email.as_ref())))?;
        row_to_account(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, None))?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, None))?
            .map(row_to_account)
            .transpose()
    }
}
