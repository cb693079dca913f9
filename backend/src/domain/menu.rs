//! Menu items and their validation rules.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Maximum menu item name length in characters.
pub const NAME_MAX: usize = 128;
/// Maximum category length in characters.
pub const CATEGORY_MAX: usize = 64;
/// Fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 2;
/// Largest amount a `NUMERIC(10, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Validation errors for menu input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuValidationError {
    /// Name, price, or category was missing on create.
    #[error("name, price, and category are required")]
    MissingRequired,
    /// A text field was present but blank.
    #[error("{field} must not be empty")]
    Blank {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeded its limit.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Configured limit.
        max: usize,
    },
    /// The price was zero or negative.
    #[error("price must be greater than zero")]
    NonPositivePrice,
    /// The price exceeded [`MAX_AMOUNT`].
    #[error("price must be at most 99999999.99")]
    PriceTooLarge,
    /// An update carried no fields.
    #[error("at least one field must be provided")]
    EmptyPatch,
}

impl MenuValidationError {
    /// Name of the offending field, when there is a single one.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => Some(field),
            Self::NonPositivePrice | Self::PriceTooLarge => Some("price"),
            Self::MissingRequired | Self::EmptyPatch => None,
        }
    }
}

/// Database-assigned menu item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MenuItemId(i32);

impl MenuItemId {
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

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Positive unit price with two fractional digits.
///
/// # Examples
/// ```
/// use canteen::domain::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(85_005, 3)).expect("positive");
/// assert_eq!(price.amount(), Decimal::new(8501, 2));
/// assert!(Price::new(Decimal::ZERO).is_err());
/// assert!(Price::new(Decimal::new(100_000_000, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Validate a price, rounding half away from zero to two places.
    pub fn new(amount: Decimal) -> Result<Self, MenuValidationError> {
        let rounded =
            amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(MenuValidationError::NonPositivePrice);
        }
        if rounded > MAX_AMOUNT {
            return Err(MenuValidationError::PriceTooLarge);
        }
        Ok(Self(rounded))
    }

    /// Decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Database identifier.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current unit price.
    pub price: Price,
    /// Free-text category used for grouping.
    pub category: String,
    /// Optional image location.
    pub image_url: Option<String>,
    /// Whether the item can currently be ordered.
    pub available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Raw create fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct MenuItemInput {
    /// Display name.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Option<Decimal>,
    /// Category.
    pub category: Option<String>,
    /// Optional image location.
    pub image_url: Option<String>,
}

/// Validated create payload. New items start available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Category.
    pub category: String,
    /// Optional image location.
    pub image_url: Option<String>,
}

impl TryFrom<MenuItemInput> for NewMenuItem {
    type Error = MenuValidationError;

    fn try_from(input: MenuItemInput) -> Result<Self, Self::Error> {
        let MenuItemInput {
            name,
            description,
            price,
            category,
            image_url,
        } = input;
        let (Some(name), Some(price), Some(category)) = (
            name.filter(|value| !value.trim().is_empty()),
            price,
            category.filter(|value| !value.trim().is_empty()),
        ) else {
            return Err(MenuValidationError::MissingRequired);
        };
        Ok(Self {
            name: bounded("name", &name, NAME_MAX)?,
            description: optional_text(description),
            price: Price::new(price)?,
            category: bounded("category", &category, CATEGORY_MAX)?,
            image_url: optional_text(image_url),
        })
    }
}

/// Raw update fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct MenuItemPatchInput {
    /// New display name.
    pub name: Option<String>,
    /// New description; blank clears it.
    pub description: Option<String>,
    /// New unit price.
    pub price: Option<Decimal>,
    /// New category.
    pub category: Option<String>,
    /// New image location; blank clears it.
    pub image_url: Option<String>,
    /// New availability flag.
    pub available: Option<bool>,
}

/// Validated partial update. `None` leaves a column untouched; for nullable
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New unit price.
    pub price: Option<Price>,
    /// New category.
    pub category: Option<String>,
    /// New image location.
    pub image_url: Option<Option<String>>,
    /// New availability flag.
    pub available: Option<bool>,
}

impl MenuItemPatch {
    /// Names of the fields this patch changes, in a stable order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("price", self.price.is_some()),
            ("category", self.category.is_some()),
            ("image_url", self.image_url.is_some()),
            ("available", self.available.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    /// Apply the patch to an item in place.
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            item.description.clone_from(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = &self.category {
            item.category.clone_from(category);
        }
        if let Some(image_url) = &self.image_url {
            item.image_url.clone_from(image_url);
        }
        if let Some(available) = self.available {
            item.available = available;
        }
    }
}

impl TryFrom<MenuItemPatchInput> for MenuItemPatch {
    type Error = MenuValidationError;

    fn try_from(input: MenuItemPatchInput) -> Result<Self, Self::Error> {
        let patch = Self {
            name: input
                .name
                .map(|name| required_text("name", &name, NAME_MAX))
                .transpose()?,
            description: input.description.map(|value| optional_text(Some(value))),
            price: input.price.map(Price::new).transpose()?,
            category: input
                .category
                .map(|category| required_text("category", &category, CATEGORY_MAX))
                .transpose()?,
            image_url: input.image_url.map(|value| optional_text(Some(value))),
            available: input.available,
        };
        if patch.fields().is_empty() {
            return Err(MenuValidationError::EmptyPatch);
        }
        Ok(patch)
    }
}

fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, MenuValidationError> {
    if value.trim().is_empty() {
        return Err(MenuValidationError::Blank { field });
    }
    bounded(field, value, max)
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, MenuValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(MenuValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
