//! Admin user listing service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth_service::map_user_error;
use crate::domain::ports::{UserRepository, UsersQuery};
use crate::domain::{Error, Identity, User};

/// Service implementing [`UsersQuery`] over a user repository.
#[derive(Clone)]
pub struct UsersService<U> {
    users: Arc<U>,
}

impl<U> UsersService<U> {
    /// Create a service from its repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UsersQuery for UsersService<U>
where
    U: UserRepository,
{
    async fn list_users(&self, caller: &Identity) -> Result<Vec<User>, Error> {
        caller.require_admin()?;
        self.users.list_all().await.map_err(map_user_error)
    }
}
