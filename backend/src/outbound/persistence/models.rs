//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{menu_items, order_items, orders, user_logs, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub roll_number: Option<String>,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub roll_number: Option<&'a str>,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub role: &'a str,
}

/// Row struct for reading from the menu_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MenuItemRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new menu items.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_items)]
pub(crate) struct NewMenuItemRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub category: &'a str,
    pub image_url: Option<&'a str>,
    pub available: bool,
}

/// Changeset for partial menu updates. `None` skips a column; for nullable
/// columns `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = menu_items)]
pub(crate) struct MenuItemChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub price: Option<Decimal>,
    pub category: Option<&'a str>,
    pub image_url: Option<Option<&'a str>>,
    pub available: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new orders.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub user_id: i32,
    pub status: &'a str,
    pub total_amount: Decimal,
}

/// Order line joined to the menu fields shown with it.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct OrderItemWithMenuRow {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: Decimal,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}

/// Insertable struct for order lines.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow {
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub price: Decimal,
}

/// Insertable struct for audit entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_logs)]
pub(crate) struct NewUserLogRow<'a> {
    pub user_id: i32,
    pub action: &'a str,
    pub details: &'a serde_json::Value,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}
