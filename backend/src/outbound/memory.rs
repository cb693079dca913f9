//! In-memory store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. All state sits behind one mutex, so each port call is atomic in the
//! same way a database transaction would be.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use rust_decimal::Decimal;

use crate::domain::ports::{
    AuditLogRepository, AuditLogRepositoryError, MenuRepository, MenuRepositoryError,
    OrderRepository, OrderRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuditEntry, ClientInfo, MenuItem, MenuItemId, MenuItemPatch, NewMenuItem, NewUser, Order,
    OrderFilter, OrderId, OrderItem, OrderItemMenu, OrderLine, OrderStatus, Price, User,
    UserAccount, UserId, price_order,
};

#[derive(Debug, Clone)]
struct StoredOrder {
    id: i32,
    user_id: UserId,
    status: OrderStatus,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredOrderItem {
    id: i32,
    order_id: i32,
    menu_item_id: MenuItemId,
    quantity: i32,
    price: Decimal,
}

#[derive(Debug, Default)]
struct State {
    accounts: Vec<UserAccount>,
    menu: Vec<MenuItem>,
    orders: Vec<StoredOrder>,
    order_items: Vec<StoredOrderItem>,
    audit: Vec<AuditEntry>,
    next_user_id: i32,
    next_menu_item_id: i32,
    next_order_id: i32,
    next_order_item_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl State {
    fn conflicting_constraint(&self, user: &NewUser) -> Option<&'static str> {
        self.accounts.iter().find_map(|account| {
            let existing = &account.user;
            if existing.username == user.username {
                Some("users_username_key")
            } else if existing.email == user.email {
                Some("users_email_key")
            } else if user.roll_number.is_some() && existing.roll_number == user.roll_number {
                Some("users_roll_number_key")
            } else {
                None
            }
        })
    }

    fn hydrate(&self, order: &StoredOrder) -> Order {
        let items = self
            .order_items
            .iter()
            .filter(|item| item.order_id == order.id)
            .map(|item| {
                let menu_item = self
                    .menu
                    .iter()
                    .find(|menu_item| menu_item.id == item.menu_item_id);
                OrderItem {
                    id: item.id,
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    price: item.price,
                    menu_item: OrderItemMenu {
                        name: menu_item.map(|m| m.name.clone()).unwrap_or_default(),
                        description: menu_item.and_then(|m| m.description.clone()),
                        category: menu_item.map(|m| m.category.clone()).unwrap_or_default(),
                    },
                }
            })
            .collect();
        Order {
            id: OrderId::new(order.id),
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
        }
    }

    fn orderable_prices(&self) -> HashMap<MenuItemId, Price> {
        self.menu
            .iter()
            .filter(|item| item.available)
            .map(|item| (item.id, item.price))
            .collect()
    }
}

/// Shared in-memory backing store.
///
/// # Examples
/// ```
/// use canteen::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// assert!(store.audit_entries().is_empty());
/// ```
pub struct MemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store stamped with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty store stamped with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Snapshot of every audit entry appended so far, oldest first.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.lock().audit.clone()
    }

    // A panic while holding the lock leaves each collection internally
    // consistent, so the poisoned state is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .find(|account| {
                let user = &account.user;
                user.roll_number
                    .as_ref()
                    .is_some_and(|roll| roll.as_str() == identifier)
                    || user.username.as_str() == identifier
                    || user.email.as_str() == identifier
            })
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        if let Some(constraint) = state.conflicting_constraint(user) {
            return Err(UserPersistenceError::conflict(constraint));
        }
        let created = User {
            id: UserId::new(next_id(&mut state.next_user_id)),
            roll_number: user.roll_number.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: now,
        };
        state.accounts.push(UserAccount {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .map(|account| account.user.clone())
            .collect())
    }
}

#[async_trait]
impl MenuRepository for MemoryStore {
    async fn list_available(&self) -> Result<Vec<MenuItem>, MenuRepositoryError> {
        let state = self.lock();
        let mut items: Vec<MenuItem> = state
            .menu
            .iter()
            .filter(|item| item.available)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn insert(&self, item: &NewMenuItem) -> Result<MenuItem, MenuRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let created = MenuItem {
            id: MenuItemId::new(next_id(&mut state.next_menu_item_id)),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            category: item.category.clone(),
            image_url: item.image_url.clone(),
            available: true,
            created_at: now,
            updated_at: now,
        };
        state.menu.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: MenuItemId,
        patch: &MenuItemPatch,
    ) -> Result<Option<MenuItem>, MenuRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        Ok(state.menu.iter_mut().find(|item| item.id == id).map(|item| {
            patch.apply_to(item);
            item.updated_at = now;
            item.clone()
        }))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(
        &self,
        user_id: UserId,
        lines: &[OrderLine],
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let priced = price_order(lines, &state.orderable_prices())?;

        let order = StoredOrder {
            id: next_id(&mut state.next_order_id),
            user_id,
            status: OrderStatus::Pending,
            total_amount: priced.total_amount,
            created_at: now,
            updated_at: now,
        };
        for line in &priced.lines {
            let item = StoredOrderItem {
                id: next_id(&mut state.next_order_item_id),
                order_id: order.id,
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
                price: line.unit_price.amount(),
            };
            state.order_items.push(item);
        }
        state.audit.push(
            AuditEntry::place_order(user_id, OrderId::new(order.id), priced.total_amount)
                .with_client(client),
        );
        let hydrated = state.hydrate(&order);
        state.orders.push(order);
        Ok(hydrated)
    }

    async fn transition_status(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        actor: UserId,
        client: &ClientInfo,
    ) -> Result<Order, OrderRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|order| order.id == order_id.as_i32())
            .ok_or_else(|| OrderRepositoryError::order_not_found(order_id.as_i32()))?;
        let from = order.status;
        let next = from
            .transition_to(to)
            .map_err(|rejected| {
                OrderRepositoryError::invalid_transition(rejected.from, rejected.to)
            })?;
        order.status = next;
        order.updated_at = now;
        let updated = order.clone();
        state
            .audit
            .push(AuditEntry::update_order_status(actor, order_id, from, next).with_client(client));
        Ok(state.hydrate(&updated))
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.lock();
        let mut selected: Vec<&StoredOrder> = state
            .orders
            .iter()
            .filter(|order| filter.matches(order.user_id, order.status))
            .collect();
        selected.sort_by_key(|order| (order.created_at, order.id));
        if !filter.oldest_first() {
            selected.reverse();
        }
        Ok(selected.into_iter().map(|order| state.hydrate(order)).collect())
    }
}

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditLogRepositoryError> {
        self.lock().audit.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour shared with the PostgreSQL adapters.
    use super::*;
    use crate::domain::{Email, Role, RollNumber, Username};
    use rstest::{fixture, rstest};

    fn new_user(username: &str, email: &str, roll: Option<&str>) -> NewUser {
        NewUser {
            roll_number: roll.map(|r| RollNumber::new(r).expect("roll number")),
            username: Username::new(username).expect("username"),
            email: Email::new(email).expect("email"),
            password_hash: None,
            role: Role::User,
        }
    }

    fn dish(name: &str, category: &str, price: i64) -> NewMenuItem {
        NewMenuItem {
            name: name.to_owned(),
            description: None,
            price: Price::new(Decimal::from(price)).expect("price"),
            category: category.to_owned(),
            image_url: None,
        }
    }

    fn line(id: i32, quantity: i32) -> OrderLine {
        OrderLine {
            menu_item_id: MenuItemId::new(id),
            quantity,
        }
    }

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    #[rstest]
    #[case(new_user("alice", "other@x.com", None))]
    #[case(new_user("bob", "alice@x.com", None))]
    #[case(new_user("carol", "carol@x.com", Some("23101A0001")))]
    #[tokio::test]
    async fn duplicate_unique_fields_conflict(store: MemoryStore, #[case] duplicate: NewUser) {
        UserRepository::insert(&store, &new_user("alice", "alice@x.com", Some("23101A0001")))
            .await
            .expect("first insert");

        let err = UserRepository::insert(&store, &duplicate)
            .await
            .expect_err("duplicate rejected");
        assert!(matches!(err, UserPersistenceError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn identifiers_match_roll_number_username_or_email(store: MemoryStore) {
        UserRepository::insert(&store, &new_user("alice", "alice@x.com", Some("23101A0001")))
            .await
            .expect("insert");

        for identifier in ["23101A0001", "alice", "alice@x.com"] {
            let found = store.find_by_identifier(identifier).await.expect("lookup");
            assert!(found.is_some(), "{identifier} should match");
        }
        assert!(store.find_by_identifier("bob").await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn unavailable_items_leave_no_trace(store: MemoryStore) {
        let tea = MenuRepository::insert(&store, &dish("Tea", "Drinks", 10))
            .await
            .expect("insert");
        store
            .update(
                tea.id,
                &MenuItemPatch {
                    available: Some(false),
                    ..MenuItemPatch::default()
                },
            )
            .await
            .expect("update");

        let err = store
            .place_order(UserId::new(1), &[line(tea.id.as_i32(), 1)], &ClientInfo::default())
            .await
            .expect_err("unavailable");

        assert_eq!(err, OrderRepositoryError::unavailable_menu_item(tea.id.as_i32()));
        assert!(store.list_orders(OrderFilter::All).await.expect("list").is_empty());
        assert!(store.audit_entries().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn oversized_totals_are_rejected_without_writes(store: MemoryStore) {
        let dosa = MenuRepository::insert(&store, &dish("Dosa", "South Indian", 85))
            .await
            .expect("insert");

        let err = store
            .place_order(
                UserId::new(1),
                &[line(dosa.id.as_i32(), 2_000_000)],
                &ClientInfo::default(),
            )
            .await
            .expect_err("too large");

        assert_eq!(err, OrderRepositoryError::total_too_large());
        assert!(store.list_orders(OrderFilter::All).await.expect("list").is_empty());
        assert!(store.audit_entries().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn placed_orders_capture_prices_and_audit(store: MemoryStore) {
        for item in [
            dish("Idli", "South Indian", 40),
            dish("Vada", "South Indian", 30),
            dish("Dosa", "South Indian", 85),
        ] {
            MenuRepository::insert(&store, &item).await.expect("insert");
        }

        let order = store
            .place_order(UserId::new(7), &[line(3, 2)], &ClientInfo::default())
            .await
            .expect("placed");

        assert_eq!(order.total_amount, Decimal::from(170));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].menu_item.name, "Dosa");
        let audit = store.audit_entries();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action.as_str(), "place_order");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_transitions_leave_orders_unchanged(store: MemoryStore) {
        MenuRepository::insert(&store, &dish("Tea", "Drinks", 10))
            .await
            .expect("insert");
        let order = store
            .place_order(UserId::new(1), &[line(1, 1)], &ClientInfo::default())
            .await
            .expect("placed");

        let err = store
            .transition_status(order.id, OrderStatus::Ready, UserId::new(2), &ClientInfo::default())
            .await
            .expect_err("skipping a step is rejected");

        assert_eq!(
            err,
            OrderRepositoryError::invalid_transition(OrderStatus::Pending, OrderStatus::Ready)
        );
        let orders = store.list_orders(OrderFilter::All).await.expect("list");
        assert_eq!(orders[0].status, OrderStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn kitchen_queue_is_oldest_first_and_excludes_finished_orders(store: MemoryStore) {
        MenuRepository::insert(&store, &dish("Tea", "Drinks", 10))
            .await
            .expect("insert");
        let mut ids = Vec::new();
        for _ in 0..3 {
            let order = store
                .place_order(UserId::new(1), &[line(1, 1)], &ClientInfo::default())
                .await
                .expect("placed");
            ids.push(order.id);
        }
        store
            .transition_status(
                ids[1],
                OrderStatus::Cancelled,
                UserId::new(2),
                &ClientInfo::default(),
            )
            .await
            .expect("cancelled");

        let queue: Vec<OrderId> = store
            .list_orders(OrderFilter::KitchenQueue)
            .await
            .expect("queue")
            .into_iter()
            .map(|order| order.id)
            .collect();
        assert_eq!(queue, vec![ids[0], ids[2]]);

        let history: Vec<OrderId> = store
            .list_orders(OrderFilter::ForUser(UserId::new(1)))
            .await
            .expect("history")
            .into_iter()
            .map(|order| order.id)
            .collect();
        assert_eq!(history, vec![ids[2], ids[1], ids[0]]);
    }
}
