//! Request extractor for the caller metadata recorded in audit entries.

use std::convert::Infallible;

use actix_web::http::header::USER_AGENT;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::ClientInfo;

/// Read the caller's IP address and user agent from a request.
///
/// The IP honours `Forwarded` and `X-Forwarded-For` when present, falling
/// back to the socket peer.
#[must_use]
pub fn client_info(req: &HttpRequest) -> ClientInfo {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_owned);
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    ClientInfo {
        ip_address,
        user_agent,
    }
}

impl FromRequest for ClientInfo {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(client_info(req)))
    }
}
