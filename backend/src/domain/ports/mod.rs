//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (`*Repository`, [`CredentialHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_log_repository;
mod auth_command;
mod credential_hasher;
mod menu_command;
mod menu_query;
mod menu_repository;
mod order_command;
mod order_query;
mod order_repository;
mod token_codec;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use audit_log_repository::MockAuditLogRepository;
pub use audit_log_repository::{AuditLogRepository, AuditLogRepositoryError};
#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::AuthCommand;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use menu_command::MockMenuCommand;
pub use menu_command::MenuCommand;
#[cfg(test)]
pub use menu_query::MockMenuQuery;
pub use menu_query::MenuQuery;
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
pub use menu_repository::{MenuRepository, MenuRepositoryError};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::OrderCommand;
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
