//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordHash, Role, RollNumber, User, UserAccount, UserId, Username,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(
    operation: &'static str,
) -> impl Fn(diesel::result::Error) -> UserPersistenceError {
    move |error| match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation(constraint) => UserPersistenceError::conflict(constraint),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let user = User {
        id: UserId::new(row.id),
        roll_number: row
            .roll_number
            .as_deref()
            .map(RollNumber::new)
            .transpose()
            .map_err(invalid)?,
        username: Username::new(&row.username).map_err(invalid)?,
        email: Email::new(&row.email).map_err(invalid)?,
        role: row.role.parse::<Role>().map_err(invalid)?,
        created_at: row.created_at,
    };
    Ok(UserAccount {
        user,
        password_hash: row.password_hash.map(PasswordHash::new),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_account(row).map(|account| account.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(
                users::roll_number
                    .is_not_distinct_from(identifier)
                    .or(users::username.eq(identifier))
                    .or(users::email.eq(identifier)),
            )
            .order_by(users::id.asc())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find user by identifier"))?;
        row.map(row_to_account).transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            roll_number: user.roll_number.as_ref().map(RollNumber::as_str),
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_ref().map(PasswordHash::as_str),
            role: user.role.as_str(),
        };
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("insert user"))?;
        row_to_user(row)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order_by(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list users"))?;
        rows.into_iter().map(row_to_user).collect()
    }
}
