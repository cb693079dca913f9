//! PostgreSQL-backed `AuditLogRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::QueryResult;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::AuditEntry;
use crate::domain::ports::{AuditLogRepository, AuditLogRepositoryError};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::NewUserLogRow;
use super::pool::DbPool;
use super::schema::user_logs;

/// Diesel-backed implementation of the audit log port.
#[derive(Clone)]
pub struct DieselAuditLogRepository {
    pool: DbPool,
}

impl DieselAuditLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Insert `entry` on an existing connection, typically inside a transaction.
pub(crate) async fn insert_entry(
    conn: &mut AsyncPgConnection,
    entry: &AuditEntry,
) -> QueryResult<()> {
    let row = NewUserLogRow {
        user_id: entry.user_id.as_i32(),
        action: entry.action.as_str(),
        details: &entry.details,
        ip_address: entry.ip_address.as_deref(),
        user_agent: entry.user_agent.as_deref(),
    };
    diesel::insert_into(user_logs::table)
        .values(&row)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl AuditLogRepository for DieselAuditLogRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditLogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AuditLogRepositoryError::connection(pool_error_message(err)))?;
        insert_entry(&mut conn, entry)
            .await
            .map_err(|err| match classify_diesel_error(err, "append audit entry") {
                DieselFailure::Connection(message) => AuditLogRepositoryError::connection(message),
                DieselFailure::UniqueViolation(constraint) => {
                    AuditLogRepositoryError::query(format!(
                        "unexpected unique violation on {constraint}"
                    ))
                }
                DieselFailure::Query(message) => AuditLogRepositoryError::query(message),
            })
    }
}
