//! Shared wiring for backend integration tests.
//!
//! Builds the real HTTP state over in-memory stores, bcrypt at its minimum
//! cost and HS256 tokens, with time controlled by [`MovableClock`].

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use flowboard::Trace;
use flowboard::domain::{AccountServiceImpl, PageService};
use flowboard::inbound::http::{HttpState, configure_api};
use flowboard::outbound::memory::{InMemoryPageRepository, InMemoryUserRepository};
use flowboard::outbound::security::{BcryptPasswordHasher, JwtTokenService};

pub const TEST_SECRET: &[u8] = b"integration-secret-integration-s";

/// Clock that only moves when told to.
pub struct MovableClock(Mutex<DateTime<Utc>>);

impl MovableClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for MovableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Services over fresh in-memory stores.
pub struct Stack {
    pub clock: Arc<MovableClock>,
    pub accounts: Arc<AccountServiceImpl<InMemoryUserRepository, BcryptPasswordHasher>>,
    pub pages: Arc<PageService<InMemoryPageRepository>>,
    pub tokens: Arc<JwtTokenService>,
}

impl Stack {
    pub fn new() -> Self {
        let clock = Arc::new(MovableClock::starting_at(start_time()));
        let shared_clock: Arc<dyn Clock> = clock.clone();
        let accounts = Arc::new(AccountServiceImpl::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BcryptPasswordHasher::new(4)),
            shared_clock.clone(),
        ));
        let pages = Arc::new(PageService::new(
            Arc::new(InMemoryPageRepository::new()),
            shared_clock.clone(),
        ));
        let tokens = Arc::new(JwtTokenService::new(
            TEST_SECRET,
            Duration::hours(24),
            shared_clock,
        ));
        Self {
            clock,
            accounts,
            pages,
            tokens,
        }
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            self.accounts.clone(),
            self.pages.clone(),
            self.pages.clone(),
            self.tokens.clone(),
        )
    }
}

/// The production route table, traced, over `stack`.
pub fn app(
    stack: &Stack,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(stack.http_state()))
        .wrap(Trace)
        .configure(configure_api)
}
