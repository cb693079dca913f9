//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Placing an order and changing its status each run in one transaction.
//! Status changes lock the order row with `SELECT ... FOR UPDATE` so
//! concurrent updates serialise.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use rust_decimal::Decimal;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    AuditEntry, ClientInfo, MenuItemId, Order, OrderFilter, OrderId, OrderItem, OrderItemMenu,
    OrderLine, OrderStatus, Price, UserId, price_order,
};

use super::diesel_audit_log_repository::insert_entry;
use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewOrderItemRow, NewOrderRow, OrderItemWithMenuRow, OrderRow};
use super::pool::DbPool;
use super::schema::{menu_items, order_items, orders};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a transaction: either Diesel's or a domain rejection that
/// must still roll the transaction back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Rejected(OrderRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> OrderRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => OrderRepositoryError::connection(message),
        DieselFailure::UniqueViolation(constraint) => {
            OrderRepositoryError::query(format!("unexpected unique violation on {constraint}"))
        }
        DieselFailure::Query(message) => OrderRepositoryError::query(message),
    }
}

fn map_tx_error(operation: &'static str) -> impl Fn(TxError) -> OrderRepositoryError {
    move |error| match error {
        TxError::Diesel(error) => map_diesel_error(error, operation),
        TxError::Rejected(error) => error,
    }
}

fn parse_status(row: &OrderRow) -> Result<OrderStatus, TxError> {
    row.status.parse::<OrderStatus>().map_err(|_| {
        TxError::Rejected(OrderRepositoryError::query(format!(
            "stored order {} has unknown status {:?}",
            row.id, row.status
        )))
    })
}

fn item_from_row(row: OrderItemWithMenuRow) -> OrderItem {
    OrderItem {
        id: row.id,
        menu_item_id: MenuItemId::new(row.menu_item_id),
        quantity: row.quantity,
        price: row.price,
        menu_item: OrderItemMenu {
            name: row.name,
            description: row.description,
            category: row.category,
        },
    }
}

/// Attach line items to order rows, keeping the rows' order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<OrderRow>,
) -> Result<Vec<Order>, TxError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let item_rows: Vec<OrderItemWithMenuRow> = order_items::table
        .inner_join(menu_items::table)
        .filter(order_items::order_id.eq_any(ids))
        .order_by(order_items::id.asc())
        .select((
            order_items::id,
            order_items::order_id,
            order_items::menu_item_id,
            order_items::quantity,
            order_items::price,
            menu_items::name,
            menu_items::description,
            menu_items::category,
        ))
        .load(conn)
        .await?;

    let mut items: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for row in item_rows {
        items.entry(row.order_id).or_default().push(item_from_row(row));
    }

    rows.into_iter()
        .map(|row| {
            let status = parse_status(&row)?;
            Ok(Order {
                id: OrderId::new(row.id),
                user_id: UserId::new(row.user_id),
                status,
                total_amount: row.total_amount,
                created_at: row.created_at,
                updated_at: row.updated_at,
                items: items.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

async fn hydrate_one(conn: &mut AsyncPgConnection, row: OrderRow) -> Result<Order, TxError> {
    let order_id = row.id;
    hydrate(conn, vec![row]).await?.pop().ok_or_else(|| {
        TxError::Rejected(OrderRepositoryError::query(format!(
            "order {order_id} vanished while loading"
        )))
    })
}

async fn orderable_prices(
    conn: &mut AsyncPgConnection,
    lines: &[OrderLine],
) -> Result<HashMap<MenuItemId, Price>, TxError> {
    let ids: Vec<i32> = lines.iter().map(|line| line.menu_item_id.as_i32()).collect();
    let rows: Vec<(i32, Decimal)> = menu_items::table
        .filter(menu_items::id.eq_any(ids))
        .filter(menu_items::available.eq(true))
        .select((menu_items::id, menu_items::price))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, price)| Price::new(price).ok().map(|price| (MenuItemId::new(id), price)))
        .collect())
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn place_order(
        &self,
        user_id: UserId,
        lines: &[OrderLine],
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| OrderRepositoryError::connection(pool_error_message(err)))?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let prices = orderable_prices(conn, lines).await?;
                let priced = price_order(lines, &prices)
                    .map_err(|err| TxError::Rejected(OrderRepositoryError::from(err)))?;

                let order_row: OrderRow = diesel::insert_into(orders::table)
                    .values(&NewOrderRow {
                        user_id: user_id.as_i32(),
                        status: OrderStatus::Pending.as_str(),
                        total_amount: priced.total_amount,
                    })
                    .returning(OrderRow::as_returning())
                    .get_result(conn)
                    .await?;

                let item_rows: Vec<NewOrderItemRow> = priced
                    .lines
                    .iter()
                    .map(|line| NewOrderItemRow {
                        order_id: order_row.id,
                        menu_item_id: line.menu_item_id.as_i32(),
                        quantity: line.quantity,
                        price: line.unit_price.amount(),
                    })
                    .collect();
                diesel::insert_into(order_items::table)
                    .values(&item_rows)
                    .execute(conn)
                    .await?;

                let entry = AuditEntry::place_order(
                    user_id,
                    OrderId::new(order_row.id),
                    priced.total_amount,
                )
                .with_client(client);
                insert_entry(conn, &entry).await?;

                hydrate_one(conn, order_row).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error("place order"))
    }

    async fn transition_status(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        actor: UserId,
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| OrderRepositoryError::connection(pool_error_message(err)))?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let current: OrderRow = orders::table
                    .find(order_id.as_i32())
                    .select(OrderRow::as_select())
                    .for_update()
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| {
                        TxError::Rejected(OrderRepositoryError::order_not_found(
                            order_id.as_i32(),
                        ))
                    })?;
                let from = parse_status(&current)?;
                let next = from.transition_to(to).map_err(|rejected| {
                    TxError::Rejected(OrderRepositoryError::invalid_transition(
                        rejected.from,
                        rejected.to,
                    ))
                })?;

                let updated: OrderRow = diesel::update(orders::table.find(order_id.as_i32()))
                    .set((
                        orders::status.eq(next.as_str()),
                        orders::updated_at.eq(Utc::now()),
                    ))
                    .returning(OrderRow::as_returning())
                    .get_result(conn)
                    .await?;

                let entry = AuditEntry::update_order_status(actor, order_id, from, next)
                    .with_client(client);
                insert_entry(conn, &entry).await?;

                hydrate_one(conn, updated).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error("transition order status"))
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| OrderRepositoryError::connection(pool_error_message(err)))?;

        let query = orders::table
            .select(OrderRow::as_select())
            .into_boxed::<Pg>();
        let query = match filter {
            OrderFilter::All => query,
            OrderFilter::ForUser(user_id) => query.filter(orders::user_id.eq(user_id.as_i32())),
            OrderFilter::KitchenQueue => query.filter(
                orders::status.eq_any(OrderStatus::KITCHEN.map(OrderStatus::as_str).to_vec()),
            ),
        };
        let query = if filter.oldest_first() {
            query.order_by((orders::created_at.asc(), orders::id.asc()))
        } else {
            query.order_by((orders::created_at.desc(), orders::id.desc()))
        };

        let rows: Vec<OrderRow> = query
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list orders"))?;
        hydrate(&mut conn, rows)
            .await
            .map_err(map_tx_error("load order items"))
    }
}
