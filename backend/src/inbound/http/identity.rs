//! Bearer-token extractor.
//!
//! Handlers that take [`Authenticated`] only run for requests carrying a
//! valid `Authorization: Bearer <token>` header. Role checks stay in the
//! domain services.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";
const TOKEN_REQUIRED: &str = "access token required";

/// Identity of a caller whose bearer token verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(Identity);

impl Authenticated {
    /// Borrow the decoded identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Take ownership of the decoded identity.
    #[must_use]
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

/// Extract the token from an `Authorization` header value.
///
/// # Examples
/// ```
/// use canteen::inbound::http::identity::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
/// ```
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| Error::unauthorized(TOKEN_REQUIRED))?;
    state.auth.authenticate(token).map(Authenticated)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
