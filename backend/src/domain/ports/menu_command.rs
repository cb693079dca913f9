//! Driving port for admin menu edits.
//!
//! Raw input is passed through so the caller's role is checked before the
//! payload is validated.

use async_trait::async_trait;

use crate::domain::{
    ClientInfo, Error, Identity, MenuItem, MenuItemId, MenuItemInput, MenuItemPatchInput,
};

/// Domain use-case port for menu writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuCommand: Send + Sync {
    /// Validate and insert a new item.
    async fn add_item(
        &self,
        caller: &Identity,
        input: MenuItemInput,
        client: &ClientInfo,
    ) -> Result<MenuItem, Error>;

    /// Validate and apply a partial update.
    async fn update_item(
        &self,
        caller: &Identity,
        id: MenuItemId,
        input: MenuItemPatchInput,
        client: &ClientInfo,
    ) -> Result<MenuItem, Error>;
}
