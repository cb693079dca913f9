//! Port for issuing and verifying bearer tokens.

use crate::domain::Identity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// The token was malformed or its signature did not verify.
        Invalid { message: String } => "invalid token: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signed, time-limited bearer tokens carrying an [`Identity`].
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `identity`.
    fn issue(&self, identity: &Identity) -> Result<String, TokenCodecError>;

    /// Verify a token and return the identity it carries.
    fn verify(&self, token: &str) -> Result<Identity, TokenCodecError>;
}
