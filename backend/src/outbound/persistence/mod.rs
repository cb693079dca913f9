//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and hold no business logic beyond what the ports require to be atomic.
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module.
//!
//! # Example
//!
//! ```ignore
//! use canteen::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/canteen")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_audit_log_repository;
mod diesel_basic_error_mapping;
mod diesel_menu_repository;
mod diesel_order_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_audit_log_repository::DieselAuditLogRepository;
pub use diesel_menu_repository::DieselMenuRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
