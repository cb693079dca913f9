//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the value.
        Conflict { message: String } => "user already exists: {message}",
    }
}

/// Port for reading and creating user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find the account whose roll number, username, or email equals
    /// `identifier`.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;


    /// Insert a new account. Unique violations surface as
    /// [`UserPersistenceError::Conflict`].
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Every user ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
