//! Builders wiring HTTP state over the configured storage backend.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use canteen::domain::ports::TokenCodec;
use canteen::inbound::http::state::{HttpState, Repositories};
use canteen::outbound::memory::MemoryStore;
use canteen::outbound::persistence::{
    DbPool, DieselAuditLogRepository, DieselMenuRepository, DieselOrderRepository,
    DieselUserRepository,
};
use canteen::outbound::security::{Argon2Hasher, JwtCodec};

use super::ServerConfig;

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselMenuRepository,
    DieselOrderRepository,
    DieselAuditLogRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        menu: Arc::new(DieselMenuRepository::new(pool.clone())),
        orders: Arc::new(DieselOrderRepository::new(pool.clone())),
        audit: Arc::new(DieselAuditLogRepository::new(pool.clone())),
    }
}

fn memory_repositories(
    store: Arc<MemoryStore>,
) -> Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    Repositories {
        users: store.clone(),
        menu: store.clone(),
        orders: store.clone(),
        audit: store,
    }
}

/// Build the HTTP state: PostgreSQL repositories when a pool is configured,
/// otherwise a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(
        &config.token_secret,
        config.token_ttl,
        clock.clone(),
    ));
    let hasher = Arc::new(Argon2Hasher::default());

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            HttpState::from_repositories(diesel_repositories(pool), hasher, tokens, clock)
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on restart");
            let store = Arc::new(MemoryStore::with_clock(clock.clone()));
            HttpState::from_repositories(memory_repositories(store), hasher, tokens, clock)
        }
    }
}
