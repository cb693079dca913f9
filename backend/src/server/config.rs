//! Server settings loaded via OrthoConfig and the assembled server
//! configuration.

use std::net::{Ipv4Addr, SocketAddr};

use canteen::outbound::persistence::{DEFAULT_MAX_SIZE, DbPool};
use canteen::outbound::security::DEFAULT_TOKEN_TTL_HOURS;
use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_PORT: u16 = 4000;
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Process settings. Every field may be set as `CANTEEN_<FIELD>` or the
/// matching command-line flag.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CANTEEN")]
pub struct ServerSettings {
    /// Listen address; defaults to `0.0.0.0:4000`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Bearer-token lifetime.
    #[ortho_config(default = 24)]
    pub token_ttl_hours: i64,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured URL, otherwise the conventional `DATABASE_URL`.
    pub fn database_url<E: Env>(&self, env: &E) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env.string(DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        if self.db_max_connections == 0 {
            DEFAULT_MAX_SIZE
        } else {
            self.db_max_connections
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        let hours = if self.token_ttl_hours > 0 {
            self.token_ttl_hours
        } else {
            DEFAULT_TOKEN_TTL_HOURS
        };
        chrono::Duration::hours(hours)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        token_secret: Zeroizing<Vec<u8>>,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; without one the server runs on the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
