//! Orders, their line items, and the status workflow.
//!
//! Orders are priced from current menu prices when placed and the total is
//! never recomputed. Status moves forward one step at a time; any order that
//! has not finished can be cancelled.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::menu::{MAX_AMOUNT, MenuItemId, Price};
use super::user::UserId;

/// Validation errors raised while parsing order input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// The order carried no lines.
    #[error("order items are required")]
    EmptyItems,
    /// A line had a missing or non-positive menu item id.
    #[error("item {index} must reference a menu item")]
    InvalidMenuItem {
        /// Zero-based line index.
        index: usize,
    },
    /// A line had a missing or non-positive quantity.
    #[error("item {index} must have a positive quantity")]
    InvalidQuantity {
        /// Zero-based line index.
        index: usize,
    },
    /// The status was missing or not one of the known values.
    #[error("valid status required")]
    UnknownStatus,
}

/// Database-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(i32);

impl OrderId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed and waiting for the kitchen.
    Pending,
    /// Being prepared.
    Preparing,
    /// Ready for collection.
    Ready,
    /// Collected.
    Completed,
    /// Abandoned before completion.
    Cancelled,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    /// Current status.
    pub from: OrderStatus,
    /// Requested status.
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses shown in the kitchen queue.
    pub const KITCHEN: [Self; 2] = [Self::Pending, Self::Preparing];

    /// Stable lowercase label used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether revenue figures include orders in this status.
    #[must_use]
    pub const fn counts_as_revenue(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// The single forward step from this status, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether `self → to` is allowed.
    ///
    /// # Examples
    /// ```
    /// use canteen::domain::OrderStatus;
    ///
    /// assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
    /// assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
    /// assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
    /// assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }

    /// Validate `self → to`, returning the new status.
    pub fn transition_to(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(OrderValidationError::UnknownStatus)
    }
}

/// Raw order line as received from a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderLineInput {
    /// Referenced menu item.
    pub menu_item_id: Option<i64>,
    /// Requested quantity.
    pub quantity: Option<i64>,
}

/// Validated order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// Referenced menu item.
    pub menu_item_id: MenuItemId,
    /// Positive quantity.
    pub quantity: i32,
}

impl OrderLine {
    /// Validate every line of an order. The list must be non-empty.
    pub fn parse_all(lines: &[OrderLineInput]) -> Result<Vec<Self>, OrderValidationError> {
        if lines.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| Self::parse(index, *line))
            .collect()
    }

    fn parse(index: usize, line: OrderLineInput) -> Result<Self, OrderValidationError> {
        let menu_item_id = positive_i32(line.menu_item_id)
            .ok_or(OrderValidationError::InvalidMenuItem { index })?;
        let quantity =
            positive_i32(line.quantity).ok_or(OrderValidationError::InvalidQuantity { index })?;
        Ok(Self {
            menu_item_id: MenuItemId::new(menu_item_id),
            quantity,
        })
    }
}

fn positive_i32(value: Option<i64>) -> Option<i32> {
    value
        .filter(|raw| *raw > 0)
        .and_then(|raw| i32::try_from(raw).ok())
}

/// An order line with its captured unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Referenced menu item.
    pub menu_item_id: MenuItemId,
    /// Positive quantity.
    pub quantity: i32,
    /// Unit price at order time.
    pub unit_price: Price,
}

/// Lines priced against the menu, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Priced lines in request order.
    pub lines: Vec<PricedLine>,
    /// Sum of `unit_price × quantity`.
    pub total_amount: Decimal,
}

/// Reasons an order cannot be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// A line references an item that is missing or unavailable.
    #[error("menu item {0} not found or unavailable")]
    Unavailable(MenuItemId),
    /// The total exceeds the largest storable amount.
    #[error("order total too large")]
    TotalTooLarge,
}

/// Price lines against the currently orderable menu items.
///
/// `prices` holds only items that exist and are available. The first line
/// whose item is absent is reported. Totals above [`MAX_AMOUNT`] are
/// rejected.
pub fn price_order(
    lines: &[OrderLine],
    prices: &HashMap<MenuItemId, Price>,
) -> Result<PricedOrder, PricingError> {
    let lines = lines
        .iter()
        .map(|line| {
            prices
                .get(&line.menu_item_id)
                .map(|unit_price| PricedLine {
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                    unit_price: *unit_price,
                })
                .ok_or(PricingError::Unavailable(line.menu_item_id))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let total_amount = lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| {
            line.unit_price
                .amount()
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
        })
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or(PricingError::TotalTooLarge)?;
    Ok(PricedOrder {
        lines,
        total_amount,
    })
}

/// Menu fields shown alongside an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemMenu {
    /// Menu item name.
    pub name: String,
    /// Menu item description.
    pub description: Option<String>,
    /// Menu item category.
    pub category: String,
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    /// Line identifier.
    pub id: i32,
    /// Referenced menu item.
    pub menu_item_id: MenuItemId,
    /// Quantity ordered.
    pub quantity: i32,
    /// Unit price captured at order time.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Current menu details of the referenced item.
    pub menu_item: OrderItemMenu,
}

impl OrderItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A persisted order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Current status.
    pub status: OrderStatus,
    /// Total captured at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
    /// Line items.
    pub items: Vec<OrderItem>,
}

/// Which orders a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order, newest first.
    All,
    /// One user's orders, newest first.
    ForUser(UserId),
    /// Pending and preparing orders, oldest first.
    KitchenQueue,
}

impl OrderFilter {
    /// Whether an order belongs in this listing.
    #[must_use]
    pub fn matches(self, user_id: UserId, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::ForUser(owner) => owner == user_id,
            Self::KitchenQueue => OrderStatus::KITCHEN.contains(&status),
        }
    }

    /// Whether results are ordered oldest first.
    #[must_use]
    pub const fn oldest_first(self) -> bool {
        matches!(self, Self::KitchenQueue)
    }
}

#[cfg(test)]
mod tests;
