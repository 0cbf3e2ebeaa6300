//! Account API handlers.
//!
//! ```text
//! POST /api/auth/signup {"name":"Alice","email":"alice@example.com","password":"pw"}
//! POST /api/auth/login {"email":"alice@example.com","password":"pw"}
//! GET /api/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_credentials_error;

/// Signup request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    #[schema(example = "Alice")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<SignupRequest> for Registration {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
            .map_err(|err| map_credentials_error(&err))
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
            .map_err(|err| map_credentials_error(&err))
    }
}

/// Public user representation. There is deliberately no password field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().as_i64(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Body returned by signup and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

/// Body returned by `GET /api/users/me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
}

fn auth_response(state: &HttpState, user: User) -> Result<AuthResponse, Error> {
    let token = state.tokens.issue(user.id()).map_err(|err| {
        error!(user_id = %user.id(), error = %err, "failed to issue token");
        Error::internal("failed to issue token")
    })?;
    Ok(AuthResponse {
        user: user.into(),
        token: token.into_string(),
    })
}

/// Register a new account and return a token for it.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    let body = auth_response(&state, user)?;
    Ok(HttpResponse::Created().json(body))
}

/// Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.accounts.authenticate(&credentials).await?;
    let body = auth_response(&state, user)?;
    Ok(HttpResponse::Ok().json(body))
}

/// Profile of the token holder.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "Token subject no longer exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user = state.accounts.profile(&caller.user_id()).await?;
    Ok(web::Json(ProfileResponse { user: user.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountService, MockTokenService};
    use crate::domain::{AccessToken, INVALID_CREDENTIALS_MESSAGE, TokenError, UserId};
    use crate::inbound::http::test_utils::{TestPorts, fixed_time, sample_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn issuing_tokens() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|id| Ok(AccessToken::new(format!("token-{id}"), fixed_time())));
        tokens
    }

    #[actix_web::test]
    async fn signup_returns_created_user_and_token() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_register()
            .withf(|reg| reg.email().as_ref() == "alice@example.com")
            .times(1)
            .returning(|_| Ok(sample_user(1, "Alice", "alice@example.com")));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens: issuing_tokens(),
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({"name": "Alice", "email": "Alice@Example.com", "password": "pw"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["token"], "token-1");
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
    }

    struct ValidationExpectation {
        field: &'static str,
        code: &'static str,
    }

    #[rstest]
    #[case(
        json!({"name": "", "email": "a@example.com", "password": "pw"}),
        ValidationExpectation { field: "name", code: "empty_name" }
    )]
    #[case(
        json!({"name": "A", "email": "  ", "password": "pw"}),
        ValidationExpectation { field: "email", code: "empty_email" }
    )]
    #[case(
        json!({"name": "A", "email": "a@example.com"}),
        ValidationExpectation { field: "password", code: "empty_password" }
    )]
    #[case(
        json!({"name": "n".repeat(65), "email": "a@example.com", "password": "pw"}),
        ValidationExpectation { field: "name", code: "name_too_long" }
    )]
    #[case(
        json!({"name": "A", "email": format!("{}@example.com", "e".repeat(250)), "password": "pw"}),
        ValidationExpectation { field: "email", code: "email_too_long" }
    )]
    #[case(
        json!({"name": "A", "email": "a@example.com", "password": "p".repeat(73)}),
        ValidationExpectation { field: "password", code: "password_too_long" }
    )]
    #[actix_rt::test]
    async fn signup_validation_never_reaches_the_service(
        #[case] payload: Value,
        #[case] expected: ValidationExpectation,
    ) {
        let mut accounts = MockAccountService::new();
        accounts.expect_register().never();
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], expected.field);
        assert_eq!(body["details"]["code"], expected.code);
    }

    #[actix_web::test]
    async fn duplicate_signup_is_conflict() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_register()
            .returning(|_| Err(Error::conflict("an account with this email already exists")));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({"name": "A", "email": "a@example.com", "password": "pw"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn login_returns_token() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_authenticate()
            .withf(|creds| creds.password() == "pw")
            .returning(|_| Ok(sample_user(3, "Carol", "carol@example.com")));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens: issuing_tokens(),
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "carol@example.com", "password": "pw"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["user"]["id"], 3);
        assert_eq!(body["token"], "token-3");
    }

    #[actix_web::test]
    async fn rejected_login_is_unauthorized() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "carol@example.com", "password": "nope"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"email\":")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn token_failure_is_internal() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_authenticate()
            .returning(|_| Ok(sample_user(3, "Carol", "carol@example.com")));
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().returning(|_| {
            Err(TokenError::Signing {
                message: "key rejected".to_owned(),
            })
        });
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "carol@example.com", "password": "pw"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn me_returns_the_token_subject() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .returning(|token| match token {
                "alice" => Ok(UserId::new(1).expect("valid id")),
                _ => Err(TokenError::BadSignature),
            });
        let mut accounts = MockAccountService::new();
        accounts
            .expect_profile()
            .withf(|id| id.as_i64() == 1)
            .returning(|_| Ok(sample_user(1, "Alice", "alice@example.com")));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users/me")
                .insert_header(("Authorization", "Bearer alice"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["user"]["name"], "Alice");
        assert!(body["user"]["createdAt"].is_string());
    }

    #[rstest]
    #[case(None, "authorization header required")]
    #[case(Some("Token abc"), "invalid authorization header")]
    #[case(Some("Bearer forged"), "invalid token")]
    #[actix_rt::test]
    async fn me_rejects_bad_credentials(
        #[case] header: Option<&'static str>,
        #[case] message: &str,
    ) {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .returning(|_| Err(TokenError::BadSignature));
        let mut accounts = MockAccountService::new();
        accounts.expect_profile().never();
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens,
            ..TestPorts::default()
        }))
        .await;

        let mut req = actix_test::TestRequest::get().uri("/api/users/me");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(body["message"], message);
    }

    #[actix_web::test]
    async fn me_for_deleted_subject_is_not_found() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .returning(|_| Ok(UserId::new(9).expect("valid id")));
        let mut accounts = MockAccountService::new();
        accounts
            .expect_profile()
            .returning(|_| Err(Error::not_found("user not found")));
        let app = actix_test::init_service(test_app(TestPorts {
            accounts,
            tokens,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users/me")
                .insert_header(("Authorization", "Bearer stale"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
