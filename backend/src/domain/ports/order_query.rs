//! Driving port for order listings and the admin dashboard.

use async_trait::async_trait;

use crate::domain::{Analytics, Error, Identity, Order};

/// Domain use-case port for order reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Every order for admins, otherwise the caller's own, newest first.
    async fn list_orders(&self, caller: &Identity) -> Result<Vec<Order>, Error>;

    /// Pending and preparing orders, oldest first. Admin only.
    async fn kitchen_queue(&self, caller: &Identity) -> Result<Vec<Order>, Error>;

    /// Order totals and sales breakdowns. Admin only.
    async fn analytics(&self, caller: &Identity) -> Result<Analytics, Error>;
}
