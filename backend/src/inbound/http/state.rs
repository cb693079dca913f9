//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuditLogRepository, AuthCommand, CredentialHasher, MenuCommand, MenuQuery, MenuRepository,
    OrderCommand, OrderQuery, OrderRepository, TokenCodec, UserRepository, UsersQuery,
};
use crate::domain::{AuthService, MenuService, OrderService, UsersService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login, signup, and bearer-token resolution.
    pub auth: Arc<dyn AuthCommand>,
    /// Public menu listing.
    pub menu: Arc<dyn MenuQuery>,
    /// Admin menu edits.
    pub menu_admin: Arc<dyn MenuCommand>,
    /// Order placement and status changes.
    pub orders: Arc<dyn OrderCommand>,
    /// Order listings, kitchen queue, and analytics.
    pub orders_query: Arc<dyn OrderQuery>,
    /// Admin user listing.
    pub users: Arc<dyn UsersQuery>,
}

/// Driven adapters the domain services are built over.
pub struct Repositories<U, M, O, A> {
    /// Account storage.
    pub users: Arc<U>,
    /// Menu storage.
    pub menu: Arc<M>,
    /// Order storage; placement and status changes are transactional.
    pub orders: Arc<O>,
    /// Append-only audit log.
    pub audit: Arc<A>,
}

impl HttpState {
    /// Wire every domain service over one set of repositories.
    pub fn from_repositories<U, M, O, A>(
        repositories: Repositories<U, M, O, A>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        M: MenuRepository + 'static,
        O: OrderRepository + 'static,
        A: AuditLogRepository + 'static,
    {
        let Repositories {
            users,
            menu,
            orders,
            audit,
        } = repositories;
        let auth = Arc::new(AuthService::new(users.clone(), audit.clone(), hasher, tokens));
        let menu = Arc::new(MenuService::new(menu, audit));
        let orders = Arc::new(OrderService::new(orders, clock));
        Self {
            auth,
            menu: menu.clone(),
            menu_admin: menu,
            orders: orders.clone(),
            orders_query: orders,
            users: Arc::new(UsersService::new(users)),
        }
    }
}
