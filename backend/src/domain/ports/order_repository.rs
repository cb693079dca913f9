//! Port for order persistence.
//!
//! Placing an order and changing its status are each a single atomic unit in
//! the adapter: prices are read, rows written, and the audit entry appended
//! together or not at all.

use async_trait::async_trait;

use crate::domain::{
    ClientInfo, Order, OrderFilter, OrderId, OrderLine, OrderStatus, PricingError, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// A referenced menu item is missing or unavailable.
        UnavailableMenuItem { menu_item_id: i32 } =>
            "menu item {menu_item_id} not found or unavailable",
        /// The order total exceeds the largest storable amount.
        TotalTooLarge => "order total too large",
        /// The order does not exist.
        OrderNotFound { order_id: i32 } => "order {order_id} not found",
        /// The requested status change is not allowed.
        InvalidTransition { from: OrderStatus, to: OrderStatus } =>
            "cannot move order from {from} to {to}",
    }
}

impl From<PricingError> for OrderRepositoryError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::Unavailable(id) => Self::unavailable_menu_item(id.as_i32()),
            PricingError::TotalTooLarge => Self::total_too_large(),
        }
    }
}

/// Port for placing, listing, and progressing orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Price `lines` from current menu prices and persist a pending order
    /// for `user_id` with a `place_order` audit entry.
    async fn place_order(
        &self,
        user_id: UserId,
        lines: &[OrderLine],
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError>;

    /// Move an order to `to` under a row lock, appending an
    /// `update_order_status` audit entry attributed to `actor`.
    async fn transition_status(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        actor: UserId,
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError>;

    /// Orders selected by `filter`, each with its line items.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderRepositoryError>;
}
