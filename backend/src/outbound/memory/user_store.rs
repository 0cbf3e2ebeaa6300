use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUserAccount, UserAccount, UserId};

use super::poisoned;

#[derive(Debug, Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<i64, UserAccount>,
}

/// Mutex-guarded user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(
        &self,
        f: impl FnOnce(&mut UserTable) -> Result<T, UserPersistenceError>,
    ) -> Result<T, UserPersistenceError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| UserPersistenceError::query(poisoned()))?;
        f(&mut *table)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError> {
        self.with_table(|table| {
            if table
                .rows
                .values()
                .any(|row| row.email == account.email.as_ref())
            {
                return Err(UserPersistenceError::duplicate_email(account.email.as_ref()));
            }
            table.last_id += 1;
            let id = UserId::new(table.last_id)
                .map_err(|err| UserPersistenceError::query(err.to_string()))?;
            let stored = UserAccount {
                id,
                name: account.name.as_ref().to_owned(),
                email: account.email.as_ref().to_owned(),
                password_hash: account.password_hash.clone(),
                created_at: account.created_at,
                updated_at: account.created_at,
            };
            table.rows.insert(id.as_i64(), stored.clone());
            Ok(stored)
        })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.with_table(|table| {
            Ok(table
                .rows
                .values()
                .find(|row| row.email == email.as_ref())
                .cloned())
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.with_table(|table| Ok(table.rows.get(&id.as_i64()).cloned()))
    }
}
