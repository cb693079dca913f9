//! Order domain service.
//!
//! Validates order input and status requests, enforces roles, and maps
//! repository failures onto domain errors. Pricing, row locking, and audit
//! writes happen inside the repository's transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{OrderCommand, OrderQuery, OrderRepository, OrderRepositoryError};
use crate::domain::{
    Analytics, ClientInfo, Error, Identity, Order, OrderFilter, OrderId, OrderLine,
    OrderLineInput, OrderStatus, OrderValidationError,
};

/// Order service implementing [`OrderCommand`] and [`OrderQuery`].
#[derive(Clone)]
pub struct OrderService<O> {
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<O> OrderService<O> {
    /// Create a service. `clock` decides which day analytics treat as today.
    pub fn new(orders: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }
}

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderRepositoryError::UnavailableMenuItem { menu_item_id } => Error::invalid_request(
            format!("menu item {menu_item_id} not found or unavailable"),
        )
        .with_details(json!({ "menu_item_id": menu_item_id })),
        OrderRepositoryError::TotalTooLarge => Error::invalid_request("order total too large"),
        OrderRepositoryError::OrderNotFound { order_id } => {
            Error::not_found("order not found").with_details(json!({ "order_id": order_id }))
        }
        OrderRepositoryError::InvalidTransition { from, to } => {
            Error::conflict(format!("cannot move order from {from} to {to}"))
                .with_details(json!({ "from": from, "to": to }))
        }
    }
}

fn map_validation_error(error: OrderValidationError) -> Error {
    let message = error.to_string();
    match error {
        OrderValidationError::EmptyItems => {
            Error::invalid_request(message).with_details(json!({ "field": "items" }))
        }
        OrderValidationError::InvalidMenuItem { index } => Error::invalid_request(message)
            .with_details(json!({ "field": "menu_item_id", "index": index })),
        OrderValidationError::InvalidQuantity { index } => Error::invalid_request(message)
            .with_details(json!({ "field": "quantity", "index": index })),
        OrderValidationError::UnknownStatus => {
            let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
            Error::invalid_request(message)
                .with_details(json!({ "field": "status", "allowed": allowed }))
        }
    }
}

#[async_trait]
impl<O> OrderCommand for OrderService<O>
where
    O: OrderRepository,
{
    async fn place_order(
        &self,
        caller: &Identity,
        lines: Vec<OrderLineInput>,
        client: &ClientInfo,
    ) -> Result<Order, Error> {
        let lines = OrderLine::parse_all(&lines).map_err(map_validation_error)?;
        let order = self
            .orders
            .place_order(caller.id, &lines, client)
            .await
            .map_err(map_order_error)?;
        info!(
            order_id = %order.id,
            user_id = %caller.id,
            total_amount = %order.total_amount,
            "order placed"
        );
        Ok(order)
    }

    async fn update_status(
        &self,
        caller: &Identity,
        order_id: OrderId,
        status: Option<String>,
        client: &ClientInfo,
    ) -> Result<Order, Error> {
        caller.require_admin()?;
        let to = status
            .as_deref()
            .unwrap_or_default()
            .parse::<OrderStatus>()
            .map_err(map_validation_error)?;
        let order = self
            .orders
            .transition_status(order_id, to, caller.id, client)
            .await
            .map_err(map_order_error)?;
        info!(
            order_id = %order.id,
            status = %order.status,
            admin_id = %caller.id,
            "order status updated"
        );
        Ok(order)
    }
}

#[async_trait]
impl<O> OrderQuery for OrderService<O>
where
    O: OrderRepository,
{
    async fn list_orders(&self, caller: &Identity) -> Result<Vec<Order>, Error> {
        let filter = if caller.is_admin() {
            OrderFilter::All
        } else {
            OrderFilter::ForUser(caller.id)
        };
        self.orders.list_orders(filter).await.map_err(map_order_error)
    }

    async fn kitchen_queue(&self, caller: &Identity) -> Result<Vec<Order>, Error> {
        caller.require_admin()?;
        self.orders
            .list_orders(OrderFilter::KitchenQueue)
            .await
            .map_err(map_order_error)
    }

    async fn analytics(&self, caller: &Identity) -> Result<Analytics, Error> {
        caller.require_admin()?;
        let orders = self
            .orders
            .list_orders(OrderFilter::All)
            .await
            .map_err(map_order_error)?;
        Ok(Analytics::compute(&orders, self.clock.utc().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockOrderRepository;
    use crate::domain::{ErrorCode, Role, UserId};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixtureClock(
            Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn identity(id: i32, role: Role) -> Identity {
        Identity {
            id: UserId::new(id),
            username: format!("user{id}"),
            role,
            roll_number: None,
        }
    }

    fn order(id: i32, user_id: i32, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new(user_id),
            status,
            total_amount: Decimal::new(170, 0),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            items: Vec::new(),
        }
    }

    fn service(repo: MockOrderRepository) -> OrderService<MockOrderRepository> {
        OrderService::new(Arc::new(repo), clock())
    }

    #[rstest]
    #[tokio::test]
    async fn empty_orders_never_reach_the_repository() {
        let mut repo = MockOrderRepository::new();
        repo.expect_place_order().times(0);

        let err = service(repo)
            .place_order(&identity(2, Role::User), Vec::new(), &ClientInfo::default())
            .await
            .expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "order items are required");
    }

    #[rstest]
    #[tokio::test]
    async fn unavailable_items_carry_their_id() {
        let mut repo = MockOrderRepository::new();
        repo.expect_place_order()
            .returning(|_, _, _| Err(OrderRepositoryError::unavailable_menu_item(9)));

        let err = service(repo)
            .place_order(
                &identity(2, Role::User),
                vec![OrderLineInput {
                    menu_item_id: Some(9),
                    quantity: Some(1),
                }],
                &ClientInfo::default(),
            )
            .await
            .expect_err("invalid");

        assert_eq!(err.message(), "menu item 9 not found or unavailable");
        assert_eq!(err.details(), Some(&json!({ "menu_item_id": 9 })));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("delivered"))]
    #[tokio::test]
    async fn unknown_statuses_are_rejected(#[case] status: Option<&str>) {
        let mut repo = MockOrderRepository::new();
        repo.expect_transition_status().times(0);

        let err = service(repo)
            .update_status(
                &identity(1, Role::Admin),
                OrderId::new(1),
                status.map(str::to_owned),
                &ClientInfo::default(),
            )
            .await
            .expect_err("invalid");

        assert_eq!(err.message(), "valid status required");
        assert_eq!(
            err.details().map(|details| details["allowed"].clone()),
            Some(json!(["pending", "preparing", "ready", "completed", "cancelled"]))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_transitions_conflict_with_both_statuses() {
        let mut repo = MockOrderRepository::new();
        repo.expect_transition_status().returning(|_, to, _, _| {
            Err(OrderRepositoryError::invalid_transition(OrderStatus::Completed, to))
        });

        let err = service(repo)
            .update_status(
                &identity(1, Role::Admin),
                OrderId::new(1),
                Some("pending".to_owned()),
                &ClientInfo::default(),
            )
            .await
            .expect_err("conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details(), Some(&json!({ "from": "completed", "to": "pending" })));
    }

    #[rstest]
    #[tokio::test]
    async fn status_updates_require_admin() {
        let err = service(MockOrderRepository::new())
            .update_status(
                &identity(2, Role::User),
                OrderId::new(1),
                Some("ready".to_owned()),
                &ClientInfo::default(),
            )
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Admin, OrderFilter::All)]
    #[case(Role::User, OrderFilter::ForUser(UserId::new(2)))]
    #[tokio::test]
    async fn listings_are_scoped_by_role(#[case] role: Role, #[case] expected: OrderFilter) {
        let mut repo = MockOrderRepository::new();
        repo.expect_list_orders()
            .withf(move |filter| *filter == expected)
            .times(1)
            .returning(|_| Ok(vec![order(1, 2, OrderStatus::Pending)]));

        let orders = service(repo)
            .list_orders(&identity(2, role))
            .await
            .expect("orders listed");

        assert_eq!(orders.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn kitchen_queue_is_admin_only() {
        let err = service(MockOrderRepository::new())
            .kitchen_queue(&identity(2, Role::User))
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn analytics_use_the_injected_clock() {
        let mut repo = MockOrderRepository::new();
        repo.expect_list_orders().returning(|_| {
            Ok(vec![
                order(1, 2, OrderStatus::Completed),
                order(2, 2, OrderStatus::Cancelled),
            ])
        });

        let analytics = service(repo)
            .analytics(&identity(1, Role::Admin))
            .await
            .expect("analytics computed");

        assert_eq!(analytics.total_orders, 2);
        assert_eq!(analytics.revenue, Decimal::new(170, 0));
        assert_eq!(
            analytics.daily_sales.last().map(|day| day.date.to_string()),
            Some("2026-03-10".to_owned())
        );
    }
}
