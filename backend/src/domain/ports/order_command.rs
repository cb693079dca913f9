//! Driving port for placing orders and progressing their status.

use async_trait::async_trait;

use crate::domain::{ClientInfo, Error, Identity, Order, OrderId, OrderLineInput};

/// Domain use-case port for order writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Validate, price, and persist an order for the caller.
    async fn place_order(
        &self,
        caller: &Identity,
        lines: Vec<OrderLineInput>,
        client: &ClientInfo,
    ) -> Result<Order, Error>;

    /// Move an order to `status`. Admin only.
    async fn update_status(
        &self,
        caller: &Identity,
        order_id: OrderId,
        status: Option<String>,
        client: &ClientInfo,
    ) -> Result<Order, Error>;
}
