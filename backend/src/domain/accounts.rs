//! Account workflows: registration, authentication and profile lookup.
//!
//! [`AccountServiceImpl`] implements the [`AccountService`] driving port on
//! top of a [`UserRepository`] and a [`PasswordHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::domain::ports::{
    AccountService, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUserAccount, PasswordHash, Registration, User, UserId,
};

/// Message shared by every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

const ABSENT_ACCOUNT_PASSWORD: &str = "flowboard:absent-account";

/// Account service backed by a user store and a password hasher.
#[derive(Clone)]
pub struct AccountServiceImpl<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    absent_account_digest: Arc<OnceCell<PasswordHash>>,
}

impl<U: ?Sized, H: ?Sized> AccountServiceImpl<U, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
            absent_account_digest: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H> AccountServiceImpl<U, H>
where
    U: ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Digest checked when no account matches a login email.
    ///
    /// Hashed once with the configured hasher, so verifying against it costs
    /// the same as checking a real account's password.
    async fn absent_account_digest(&self) -> Result<&PasswordHash, Error> {
        self.absent_account_digest
            .get_or_try_init(|| async {
                self.hasher
                    .hash(ABSENT_ACCOUNT_PASSWORD)
                    .await
                    .map_err(map_hash_error)
            })
            .await
    }
}

fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { .. } => email_taken(),
        UserPersistenceError::Connection { message } => {
            error!(%message, "user store unavailable");
            Error::internal("user store unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user store query failed");
            Error::internal("user store error")
        }
    }
}

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("password processing failed")
}

fn email_taken() -> Error {
    Error::conflict("an account with this email already exists")
}

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_persistence_error)?
            .is_some()
        {
            info!("registration rejected: email already registered");
            return Err(email_taken());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;

        // A concurrent signup can still win the race; the store's unique
        // constraint reports it as DuplicateEmail.
        let account = self
            .users
            .create(&NewUserAccount {
                name: registration.name().clone(),
                email: registration.email().clone(),
                password_hash,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %account.id, "user registered");
        Ok(account.into_profile())
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            // Unknown emails pay for one verify, exactly like a wrong password.
            let digest = self.absent_account_digest().await?;
            self.hasher
                .verify(credentials.password(), digest)
                .await
                .map_err(map_hash_error)?;
            info!("login rejected");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            info!("login rejected");
            return Err(invalid_credentials());
        }

        info!(user_id = %account.id, "user authenticated");
        Ok(account.into_profile())
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .map(|account| account.into_profile())
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::{EmailAddress, ErrorCode, PasswordHash, UserAccount};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn account(id: i64, email: &str, at: DateTime<Utc>) -> UserAccount {
        UserAccount {
            id: UserId::new(id).expect("valid id"),
            name: "Alice".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new("stored-digest"),
            created_at: at,
            updated_at: at,
        }
    }

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
        at: DateTime<Utc>,
    ) -> AccountServiceImpl<MockUserRepository, MockPasswordHasher> {
        AccountServiceImpl::new(Arc::new(users), Arc::new(hasher), Arc::new(FixedClock(at)))
    }

    fn registration() -> Registration {
        Registration::try_from_parts("Alice", "Alice@Example.com", "hunter2").expect("valid")
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_password_and_returns_profile(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_create()
            .withf(move |new| {
                new.email.as_ref() == "alice@example.com"
                    && new.password_hash.as_str() == "hashed:hunter2"
                    && new.created_at == now
            })
            .times(1)
            .returning(move |new| {
                Ok(UserAccount {
                    id: UserId::new(1).expect("valid id"),
                    name: new.name.as_ref().to_owned(),
                    email: new.email.as_ref().to_owned(),
                    password_hash: new.password_hash.clone(),
                    created_at: new.created_at,
                    updated_at: new.created_at,
                })
            });
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|pw| Ok(PasswordHash::new(format!("hashed:{pw}"))));

        let user = service(users, hasher, now)
            .register(registration())
            .await
            .expect("registration succeeds");

        assert_eq!(user.id().as_i64(), 1);
        assert_eq!(user.email(), "alice@example.com");
        assert_eq!(user.created_at(), now);
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_taken_email_without_hashing(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account(1, "alice@example.com", now))));
        users.expect_create().never();
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let err = service(users, hasher, now)
            .register(registration())
            .await
            .expect_err("duplicate email");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_store_duplicate_to_conflict(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(UserPersistenceError::duplicate_email("alice@example.com")));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(PasswordHash::new("digest")));

        let err = service(users, hasher, now)
            .register(registration())
            .await
            .expect_err("race lost");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn register_surfaces_store_failure_as_internal(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Err(UserPersistenceError::connection("refused")));
        let hasher = MockPasswordHasher::new();

        let err = service(users, hasher, now)
            .register(registration())
            .await
            .expect_err("store down");

        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("refused"));
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_accepts_matching_password(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email: &EmailAddress| email.as_ref() == "alice@example.com")
            .returning(move |_| Ok(Some(account(5, "alice@example.com", now))));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|pw, hash| pw == "hunter2" && hash.as_str() == "stored-digest")
            .returning(|_, _| Ok(true));

        let creds = LoginCredentials::try_from_parts("ALICE@example.com", "hunter2")
            .expect("valid credentials");
        let user = service(users, hasher, now)
            .authenticate(&creds)
            .await
            .expect("login succeeds");

        assert_eq!(user.id().as_i64(), 5);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable(now: DateTime<Utc>) {
        let creds =
            LoginCredentials::try_from_parts("alice@example.com", "wrong").expect("valid");

        let mut unknown_users = MockUserRepository::new();
        unknown_users.expect_find_by_email().returning(|_| Ok(None));
        let mut absent_hasher = MockPasswordHasher::new();
        absent_hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::new("absent-digest")));
        absent_hasher
            .expect_verify()
            .withf(|pw, hash| pw == "wrong" && hash.as_str() == "absent-digest")
            .times(1)
            .returning(|_, _| Ok(false));
        let unknown = service(unknown_users, absent_hasher, now)
            .authenticate(&creds)
            .await
            .expect_err("unknown email");

        let mut known_users = MockUserRepository::new();
        known_users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account(1, "alice@example.com", now))));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        hasher
            .expect_verify()
            .withf(|_, hash| hash.as_str() == "stored-digest")
            .times(1)
            .returning(|_, _| Ok(false));
        let mismatch = service(known_users, hasher, now)
            .authenticate(&creds)
            .await
            .expect_err("wrong password");

        assert_eq!(unknown, mismatch);
        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown.message(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn absent_account_digest_is_hashed_once(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(3).returning(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::new("absent-digest")));
        hasher.expect_verify().times(3).returning(|_, _| Ok(false));
        let svc = service(users, hasher, now);

        for email in ["a@example.com", "b@example.com", "c@example.com"] {
            let creds = LoginCredentials::try_from_parts(email, "pw").expect("valid");
            let err = svc.authenticate(&creds).await.expect_err("no such account");
            assert_eq!(err.code(), ErrorCode::Unauthorized);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn matching_the_absent_digest_still_fails(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(PasswordHash::new("absent-digest")));
        hasher.expect_verify().times(1).returning(|_, _| Ok(true));

        let creds = LoginCredentials::try_from_parts("ghost@example.com", "anything")
            .expect("valid");
        let err = service(users, hasher, now)
            .authenticate(&creds)
            .await
            .expect_err("no such account");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_returns_user_or_not_found(now: DateTime<Utc>) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |id| {
            Ok((id.as_i64() == 1).then(|| account(1, "alice@example.com", now)))
        });
        let svc = service(users, MockPasswordHasher::new(), now);

        let found = svc
            .profile(&UserId::new(1).expect("valid id"))
            .await
            .expect("profile");
        assert_eq!(found.name(), "Alice");

        let missing = svc
            .profile(&UserId::new(2).expect("valid id"))
            .await
            .expect_err("no such user");
        assert_eq!(missing.code(), ErrorCode::NotFound);
    }
}
