//! Driving port for user listings.
//!
//! Inbound adapters use this port to fetch account summaries without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Identity, User};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account, ordered by id. Admin only.
    async fn list_users(&self, caller: &Identity) -> Result<Vec<User>, Error>;
}
