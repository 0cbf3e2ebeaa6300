//! Helpers for handler tests: mock-backed app construction and sample data.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockAccountService, MockPagesCommand, MockPagesQuery, MockTokenService,
};
use crate::domain::{PasswordHash, User, UserAccount, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Mocks wired into [`test_app`]. Unset ports reject any call.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountService,
    pub pages: MockPagesCommand,
    pub pages_query: MockPagesQuery,
    pub tokens: MockTokenService,
}

impl From<TestPorts> for HttpState {
    fn from(ports: TestPorts) -> Self {
        Self::new(
            Arc::new(ports.accounts),
            Arc::new(ports.pages),
            Arc::new(ports.pages_query),
            Arc::new(ports.tokens),
        )
    }
}

/// Build the `/api` app over the given mocks.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::from(ports)))
        .configure(configure_api)
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn sample_user(id: i64, name: &str, email: &str) -> User {
    UserAccount {
        id: UserId::new(id).expect("valid user id"),
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash: PasswordHash::new("$2b$04$unused"),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
    .into_profile()
}
