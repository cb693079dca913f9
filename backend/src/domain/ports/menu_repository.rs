//! Port for menu item persistence.

use async_trait::async_trait;

use crate::domain::{MenuItem, MenuItemId, MenuItemPatch, NewMenuItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by menu repository adapters.
    pub enum MenuRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "menu repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "menu repository query failed: {message}",
    }
}

/// Port for reading and editing the menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Available items ordered by category then name.
    async fn list_available(&self) -> Result<Vec<MenuItem>, MenuRepositoryError>;

    /// Insert a new, available item.
    async fn insert(&self, item: &NewMenuItem) -> Result<MenuItem, MenuRepositoryError>;

    /// Apply a partial update, returning `None` when the item does not exist.
    async fn update(
        &self,
        id: MenuItemId,
        patch: &MenuItemPatch,
    ) -> Result<Option<MenuItem>, MenuRepositoryError>;
}
