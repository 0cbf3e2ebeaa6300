//! Wiring of driven adapters into the HTTP state.

use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use flowboard::config::{AppSettings, BuildMode, TokenSecret};
use flowboard::domain::ports::{PageRepository, UserRepository};
use flowboard::domain::{AccountServiceImpl, PageService};
use flowboard::inbound::http::HttpState;
use flowboard::outbound::memory::{InMemoryPageRepository, InMemoryUserRepository};
use flowboard::outbound::persistence::{
    DbPool, DieselPageRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use flowboard::outbound::security::{BcryptPasswordHasher, JwtTokenService};

/// Credential stores selected at startup.
pub(crate) enum Storage {
    Postgres(DbPool),
    InMemory,
}

/// Connect to PostgreSQL and migrate, or fall back to memory in debug builds.
///
/// # Errors
///
/// Fails when the database is unreachable, a migration fails, or no
/// database is configured in a release build.
pub(crate) async fn connect_storage(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<Storage> {
    let Some(url) = settings.database_url() else {
        if mode == BuildMode::Release {
            return Err(std::io::Error::other(
                "FLOWBOARD_DATABASE_URL must be set in release builds",
            ));
        }
        warn!("no database configured; using in-memory stores (dev only)");
        return Ok(Storage::InMemory);
    };

    let max_size = settings.max_db_connections().map_err(std::io::Error::other)?;
    run_pending_migrations(url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(max_size))
        .await
        .map_err(|err| std::io::Error::other(err.into_message()))?;
    info!(max_size, "database pool ready");
    Ok(Storage::Postgres(pool))
}

/// Parameters for the credential adapters.
pub(crate) struct SecurityConfig {
    pub(crate) bcrypt_cost: u32,
    pub(crate) token_ttl: Duration,
    pub(crate) secret: TokenSecret,
}

fn assemble<U, P>(
    users: Arc<U>,
    pages: Arc<P>,
    security: SecurityConfig,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    P: PageRepository + 'static,
{
    let hasher = Arc::new(BcryptPasswordHasher::new(security.bcrypt_cost));
    // Keys are derived here; `security.secret` is wiped when it drops.
    let tokens = Arc::new(JwtTokenService::new(
        security.secret.expose(),
        security.token_ttl,
        clock.clone(),
    ));
    let accounts = Arc::new(AccountServiceImpl::new(users, hasher, clock.clone()));
    let page_service = Arc::new(PageService::new(pages, clock));
    HttpState::new(accounts, page_service.clone(), page_service, tokens)
}

/// Build the handler state over the selected stores.
pub(crate) fn build_http_state(storage: &Storage, security: SecurityConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match storage {
        Storage::Postgres(pool) => assemble(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselPageRepository::new(pool.clone())),
            security,
            clock,
        ),
        Storage::InMemory => assemble(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPageRepository::new()),
            security,
            clock,
        ),
    }
}
