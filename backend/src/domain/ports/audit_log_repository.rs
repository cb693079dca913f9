//! Port for the append-only audit log.

use async_trait::async_trait;

use crate::domain::AuditEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit log adapters.
    pub enum AuditLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "audit log connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } => "audit log write failed: {message}",
    }
}

/// Port for appending audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditLogRepositoryError>;
}
