//! Driving port for login, signup, and token authentication.
//!
//! Inbound adapters call this port to exchange credentials for a bearer token
//! and to resolve a token back into the caller's [`Identity`] without knowing
//! which store, hasher, or signer backs it.

use async_trait::async_trait;

use crate::domain::{AuthSession, ClientInfo, Error, Identity, LoginCredentials, SignupDetails};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Validate credentials, provisioning roll-number users on first login.
    async fn login(
        &self,
        credentials: &LoginCredentials,
        client: &ClientInfo,
    ) -> Result<AuthSession, Error>;

    /// Create an account and sign a token for it.
    async fn signup(&self, details: &SignupDetails) -> Result<AuthSession, Error>;

    /// Resolve a bearer token into the caller's identity.
    fn authenticate(&self, token: &str) -> Result<Identity, Error>;
}
