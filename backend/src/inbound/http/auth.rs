//! Authentication API handlers.
//!
//! ```text
//! POST /auth/login {"identifier":"23101A0001"}
//! POST /auth/signup {"username":"alice","email":"alice@x.com","password":"password1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, ClientInfo, Error, LoginCredentials, LoginValidationError, SignupDetails,
    SignupInput, SignupValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AuthSessionSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Login request body for `POST /auth/login`.
///
/// The identifier is a roll number, username, or email. Roll numbers log in
/// without a password.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "23101A0001")]
    pub identifier: Option<String>,
    pub password: Option<String>,
}

/// Signup request body for `POST /auth/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` (default) or `admin`.
    #[schema(example = "user")]
    pub role: Option<String>,
    #[schema(example = "23101A0002")]
    pub roll_number: Option<String>,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.identifier.as_deref(), value.password.as_deref())
    }
}

impl TryFrom<&SignupRequest> for SignupDetails {
    type Error = SignupValidationError;

    fn try_from(value: &SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_input(SignupInput {
            username: value.username.as_deref(),
            email: value.email.as_deref(),
            password: value.password.as_deref(),
            role: value.role.as_deref(),
            roll_number: value.roll_number.as_deref(),
        })
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyIdentifier => missing_field_error(FieldName::new("identifier")),
    }
}

fn map_signup_validation_error(err: SignupValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// Exchange an identifier (and password, unless it is a roll number) for a
/// bearer token. Unseen roll numbers are registered on first login.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthSessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    client: ClientInfo,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let credentials =
        LoginCredentials::try_from(&payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.auth.login(&credentials, &client).await?;
    Ok(web::Json(session))
}

/// Create an account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthSessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "User already exists", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
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
    let details =
        SignupDetails::try_from(&payload.into_inner()).map_err(map_signup_validation_error)?;
    let session = state.auth.signup(&details).await?;
    Ok(HttpResponse::Created().json(session))
}
