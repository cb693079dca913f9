//! Append-only audit entries for user-triggered actions.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::auth::ClientInfo;
use super::menu::MenuItemId;
use super::order::{OrderId, OrderStatus};
use super::user::UserId;

/// Audited action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// Successful login.
    Login,
    /// Menu item created.
    AddMenuItem,
    /// Menu item edited.
    UpdateMenuItem,
    /// Order placed.
    PlaceOrder,
    /// Order status changed.
    UpdateOrderStatus,
}

impl AuditAction {
    /// Stored action tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AddMenuItem => "add_menu_item",
            Self::UpdateMenuItem => "update_menu_item",
            Self::PlaceOrder => "place_order",
            Self::UpdateOrderStatus => "update_order_status",
        }
    }
}

/// A single audit record awaiting storage.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// Acting user.
    pub user_id: UserId,
    /// Action tag.
    pub action: AuditAction,
    /// Action-specific JSON payload.
    pub details: Value,
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller user agent.
    pub user_agent: Option<String>,
}

impl AuditEntry {
    fn new(user_id: UserId, action: AuditAction, details: Value) -> Self {
        Self {
            user_id,
            action,
            details,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attach the caller's network details.
    #[must_use]
    pub fn with_client(mut self, client: &ClientInfo) -> Self {
        self.ip_address.clone_from(&client.ip_address);
        self.user_agent.clone_from(&client.user_agent);
        self
    }

    /// `login` entry recording the identifier used.
    #[must_use]
    pub fn login(user_id: UserId, identifier: &str) -> Self {
        Self::new(user_id, AuditAction::Login, json!({ "identifier": identifier }))
    }

    /// `add_menu_item` entry.
    #[must_use]
    pub fn add_menu_item(user_id: UserId, menu_item_id: MenuItemId, name: &str) -> Self {
        Self::new(
            user_id,
            AuditAction::AddMenuItem,
            json!({ "menu_item_id": menu_item_id, "name": name }),
        )
    }

    /// `update_menu_item` entry listing the changed fields.
    #[must_use]
    pub fn update_menu_item(user_id: UserId, menu_item_id: MenuItemId, fields: &[&str]) -> Self {
        Self::new(
            user_id,
            AuditAction::UpdateMenuItem,
            json!({ "menu_item_id": menu_item_id, "fields": fields }),
        )
    }

    /// `place_order` entry.
    #[must_use]
    pub fn place_order(user_id: UserId, order_id: OrderId, total_amount: Decimal) -> Self {
        Self::new(
            user_id,
            AuditAction::PlaceOrder,
            json!({ "order_id": order_id, "total_amount": total_amount.to_string() }),
        )
    }

    /// `update_order_status` entry.
    #[must_use]
    pub fn update_order_status(
        user_id: UserId,
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Self {
        Self::new(
            user_id,
            AuditAction::UpdateOrderStatus,
            json!({ "order_id": order_id, "from": from, "to": to }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_entries_record_both_ends() {
        let entry = AuditEntry::update_order_status(
            UserId::new(1),
            OrderId::new(7),
            OrderStatus::Pending,
            OrderStatus::Preparing,
        );
        assert_eq!(entry.action.as_str(), "update_order_status");
        assert_eq!(
            entry.details,
            json!({ "order_id": 7, "from": "pending", "to": "preparing" })
        );
    }

    #[rstest]
    fn client_details_are_copied() {
        let client = ClientInfo {
            ip_address: Some("10.0.0.5".to_owned()),
            user_agent: Some("curl/8".to_owned()),
        };
        let entry = AuditEntry::login(UserId::new(2), "alice").with_client(&client);
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert_eq!(entry.details["identifier"], "alice");
    }

    #[rstest]
    fn order_totals_are_recorded_exactly() {
        let entry =
            AuditEntry::place_order(UserId::new(2), OrderId::new(4), Decimal::new(17050, 2));
        assert_eq!(entry.details["total_amount"], "170.50");
    }
}
