//! PostgreSQL-backed `MenuRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MenuRepository, MenuRepositoryError};
use crate::domain::{MenuItem, MenuItemId, MenuItemPatch, NewMenuItem, Price};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{MenuItemChangeset, MenuItemRow, NewMenuItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::menu_items;

/// Diesel-backed implementation of the menu repository port.
#[derive(Clone)]
pub struct DieselMenuRepository {
    pool: DbPool,
}

impl DieselMenuRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MenuRepositoryError {
    MenuRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    operation: &'static str,
) -> impl Fn(diesel::result::Error) -> MenuRepositoryError {
    move |error| match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => MenuRepositoryError::connection(message),
        DieselFailure::UniqueViolation(constraint) => {
            MenuRepositoryError::query(format!("unexpected unique violation on {constraint}"))
        }
        DieselFailure::Query(message) => MenuRepositoryError::query(message),
    }
}

pub(crate) fn row_to_menu_item(row: MenuItemRow) -> Result<MenuItem, MenuRepositoryError> {
    let price = Price::new(row.price).map_err(|err| {
        MenuRepositoryError::query(format!("stored menu item {} is invalid: {err}", row.id))
    })?;
    Ok(MenuItem {
        id: MenuItemId::new(row.id),
        name: row.name,
        description: row.description,
        price,
        category: row.category,
        image_url: row.image_url,
        available: row.available,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn patch_to_changeset(patch: &MenuItemPatch) -> MenuItemChangeset<'_> {
    MenuItemChangeset {
        name: patch.name.as_deref(),
        description: patch.description.as_ref().map(Option::as_deref),
        price: patch.price.map(Price::amount),
        category: patch.category.as_deref(),
        image_url: patch.image_url.as_ref().map(Option::as_deref),
        available: patch.available,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl MenuRepository for DieselMenuRepository {
    async fn list_available(&self) -> Result<Vec<MenuItem>, MenuRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MenuItemRow> = menu_items::table
            .filter(menu_items::available.eq(true))
            .order_by((menu_items::category.asc(), menu_items::name.asc()))
            .select(MenuItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list menu"))?;
        rows.into_iter().map(row_to_menu_item).collect()
    }

    async fn insert(&self, item: &NewMenuItem) -> Result<MenuItem, MenuRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewMenuItemRow {
            name: &item.name,
            description: item.description.as_deref(),
            price: item.price.amount(),
            category: &item.category,
            image_url: item.image_url.as_deref(),
            available: true,
        };
        let row = diesel::insert_into(menu_items::table)
            .values(&new_row)
            .returning(MenuItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("insert menu item"))?;
        row_to_menu_item(row)
    }

    async fn update(
        &self,
        id: MenuItemId,
        patch: &MenuItemPatch,
    ) -> Result<Option<MenuItem>, MenuRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(menu_items::table.find(id.as_i32()))
            .set(&patch_to_changeset(patch))
            .returning(MenuItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("update menu item"))?;
        row.map(row_to_menu_item).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    fn patches_only_touch_named_columns() {
        let patch = MenuItemPatch {
            description: Some(None),
            available: Some(false),
            ..MenuItemPatch::default()
        };
        let changeset = patch_to_changeset(&patch);
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.description, Some(None));
        assert_eq!(changeset.available, Some(false));
    }

    #[rstest]
    fn non_positive_stored_prices_are_rejected() {
        let now = Utc::now();
        let row = MenuItemRow {
            id: 4,
            name: "Tea".to_owned(),
            description: None,
            price: Decimal::ZERO,
            category: "Drinks".to_owned(),
            image_url: None,
            available: true,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(row_to_menu_item(row), Err(MenuRepositoryError::Query { .. })));
    }
}
