//! Menu domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::auth_service::map_audit_error;
use crate::domain::ports::{
    AuditLogRepository, MenuCommand, MenuQuery, MenuRepository, MenuRepositoryError,
};
use crate::domain::{
    AuditEntry, ClientInfo, Error, Identity, MenuItem, MenuItemId, MenuItemInput, MenuItemPatch,
    MenuItemPatchInput, MenuValidationError, NewMenuItem,
};

/// Menu service implementing [`MenuQuery`] and [`MenuCommand`].
#[derive(Clone)]
pub struct MenuService<M, A> {
    menu: Arc<M>,
    audit: Arc<A>,
}

impl<M, A> MenuService<M, A> {
    /// Create a service from its repositories.
    pub fn new(menu: Arc<M>, audit: Arc<A>) -> Self {
        Self { menu, audit }
    }
}

fn map_menu_error(error: MenuRepositoryError) -> Error {
    match error {
        MenuRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("menu repository unavailable: {message}"))
        }
        MenuRepositoryError::Query { message } => {
            Error::internal(format!("menu repository error: {message}"))
        }
    }
}

fn map_validation_error(error: MenuValidationError) -> Error {
    let message = error.to_string();
    match error.field() {
        Some(field) => Error::invalid_request(message).with_details(json!({ "field": field })),
        None => Error::invalid_request(message),
    }
}

#[async_trait]
impl<M, A> MenuQuery for MenuService<M, A>
where
    M: MenuRepository,
    A: AuditLogRepository,
{
    async fn list_menu(&self) -> Result<Vec<MenuItem>, Error> {
        self.menu.list_available().await.map_err(map_menu_error)
    }
}

#[async_trait]
impl<M, A> MenuCommand for MenuService<M, A>
where
    M: MenuRepository,
    A: AuditLogRepository,
{
    async fn add_item(
        &self,
        caller: &Identity,
        input: MenuItemInput,
        client: &ClientInfo,
    ) -> Result<MenuItem, Error> {
        caller.require_admin()?;
        let new_item = NewMenuItem::try_from(input).map_err(map_validation_error)?;
        let item = self.menu.insert(&new_item).await.map_err(map_menu_error)?;
        self.audit
            .append(&AuditEntry::add_menu_item(caller.id, item.id, &item.name).with_client(client))
            .await
            .map_err(map_audit_error)?;
        info!(menu_item_id = %item.id, admin_id = %caller.id, "menu item added");
        Ok(item)
    }

    async fn update_item(
        &self,
        caller: &Identity,
        id: MenuItemId,
        input: MenuItemPatchInput,
        client: &ClientInfo,
    ) -> Result<MenuItem, Error> {
        caller.require_admin()?;
        let patch = MenuItemPatch::try_from(input).map_err(map_validation_error)?;
        let item = self
            .menu
            .update(id, &patch)
            .await
            .map_err(map_menu_error)?
            .ok_or_else(|| {
                Error::not_found("menu item not found").with_details(json!({ "menu_item_id": id }))
            })?;
        let fields = patch.fields();
        self.audit
            .append(&AuditEntry::update_menu_item(caller.id, id, &fields).with_client(client))
            .await
            .map_err(map_audit_error)?;
        info!(menu_item_id = %id, ?fields, "menu item updated");
        Ok(item)
    }
}
