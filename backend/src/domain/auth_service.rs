//! Authentication domain service.
//!
//! Implements [`AuthCommand`] over the user repository, the audit log, a
//! credential hasher, and a token codec. Roll-number identifiers log in
//! without a password and unseen roll numbers are provisioned on first use.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuditLogRepository, AuditLogRepositoryError, AuthCommand, CredentialHasher,
    CredentialHasherError, TokenCodec, TokenCodecError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuditEntry, AuthSession, ClientInfo, Error, Identity, LoginCredentials, NewUser, RollNumber,
    SignupDetails, User, UserAccount,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Authentication service implementing [`AuthCommand`].
#[derive(Clone)]
pub struct AuthService<U, A> {
    users: Arc<U>,
    audit: Arc<A>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenCodec>,
}

impl<U, A> AuthService<U, A> {
    /// Create a service from its collaborators.
    pub fn new(
        users: Arc<U>,
        audit: Arc<A>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            users,
            audit,
            hasher,
            tokens,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { .. } => Error::conflict("user already exists"),
    }
}

pub(crate) fn map_audit_error(error: AuditLogRepositoryError) -> Error {
    match error {
        AuditLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("audit log unavailable: {message}"))
        }
        AuditLogRepositoryError::Query { message } => {
            Error::internal(format!("audit log error: {message}"))
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Run a hasher operation on the blocking pool so Argon2 does not stall the
/// request worker.
async fn run_hasher<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("credential hashing task failed: {err}")))?
        .map_err(map_hasher_error)
}

fn map_token_error(error: TokenCodecError) -> Error {
    match error {
        TokenCodecError::Invalid { .. } | TokenCodecError::Expired => {
            Error::unauthorized("invalid token")
        }
        TokenCodecError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

impl<U, A> AuthService<U, A>
where
    U: UserRepository,
    A: AuditLogRepository,
{
    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self
            .tokens
            .issue(&Identity::from(&user))
            .map_err(map_token_error)?;
        Ok(AuthSession { token, user })
    }

    async fn check_password(
        &self,
        credentials: &LoginCredentials,
        account: &UserAccount,
    ) -> Result<(), Error> {
        let password = credentials.password().ok_or_else(|| {
            Error::invalid_request("password is required")
                .with_details(json!({ "field": "password", "code": "missing_password" }))
        })?;
        let Some(hash) = account.password_hash.as_ref() else {
            debug!(user_id = %account.user.id, "password login for account without a password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.clone();
        if run_hasher(move || hasher.verify(&password, &hash)).await? {
            Ok(())
        } else {
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }

    /// Create the account for an unseen roll number, tolerating a concurrent
    /// login that inserted it first.
    async fn provision_student(&self, roll_number: RollNumber) -> Result<User, Error> {
        let identifier = roll_number.as_str().to_owned();
        match self
            .users
            .insert(&NewUser::provisioned_student(roll_number))
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, "provisioned student account");
                Ok(user)
            }
            Err(UserPersistenceError::Conflict { message }) => {
                debug!(%message, "roll number provisioned concurrently; re-reading");
                self.users
                    .find_by_identifier(&identifier)
                    .await
                    .map_err(map_user_error)?
                    .map(|account| account.user)
                    .ok_or_else(|| Error::internal("provisioned account vanished after conflict"))
            }
            Err(other) => Err(map_user_error(other)),
        }
    }
}

#[async_trait]
impl<U, A> AuthCommand for AuthService<U, A>
where
    U: UserRepository,
    A: AuditLogRepository,
{
    async fn login(
        &self,
        credentials: &LoginCredentials,
        client: &ClientInfo,
    ) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_identifier(credentials.identifier())
            .await
            .map_err(map_user_error)?;
        let user = match (existing, credentials.roll_number()) {
            (Some(account), Some(_)) => account.user,
            (Some(account), None) => {
                self.check_password(credentials, &account).await?;
                account.user
            }
            (None, Some(roll_number)) => self.provision_student(roll_number).await?,
            (None, None) => return Err(Error::unauthorized(INVALID_CREDENTIALS)),
        };

        self.audit
            .append(&AuditEntry::login(user.id, credentials.identifier()).with_client(client))
            .await
            .map_err(map_audit_error)?;
        self.session_for(user)
    }

    async fn signup(&self, details: &SignupDetails) -> Result<AuthSession, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(details.password.clone());
        let password_hash = run_hasher(move || hasher.hash(&password)).await?;
        let new_user = NewUser {
            roll_number: details.roll_number.clone(),
            username: details.username.clone(),
            email: details.email.clone(),
            password_hash: Some(password_hash),
            role: details.role,
        };
        let user = self.users.insert(&new_user).await.map_err(|err| {
            if matches!(err, UserPersistenceError::Conflict { .. }) {
                warn!(username = details.username.as_str(), "signup rejected: user exists");
            }
            map_user_error(err)
        })?;
        info!(user_id = %user.id, role = %user.role, "account created");
        self.session_for(user)
    }

    fn authenticate(&self, token: &str) -> Result<Identity, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
