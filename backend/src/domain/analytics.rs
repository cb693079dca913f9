//! Admin dashboard figures derived from the order history.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::order::{Order, OrderStatus};

/// Number of days covered by [`Analytics::daily_sales`].
pub const DAILY_WINDOW: u64 = 7;

/// Orders and revenue for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    /// Calendar day.
    pub date: NaiveDate,
    /// Non-cancelled orders placed that day.
    pub orders: u64,
    /// Revenue from those orders.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Quantity and revenue for one menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    /// Menu category.
    pub category: String,
    /// Units sold.
    pub quantity: i64,
    /// Revenue from those units.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Summary of every order in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    /// Count of all orders, cancelled included.
    pub total_orders: u64,
    /// Count per status; every status is present.
    pub orders_by_status: BTreeMap<&'static str, u64>,
    /// Total of non-cancelled orders.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Last [`DAILY_WINDOW`] days ending `today`, oldest first.
    pub daily_sales: Vec<DailySales>,
    /// Per-category sales, highest revenue first.
    pub category_sales: Vec<CategorySales>,
}

impl Analytics {
    /// Compute the summary as of `today`.
    #[must_use]
    pub fn compute(orders: &[Order], today: NaiveDate) -> Self {
        let mut orders_by_status: BTreeMap<&'static str, u64> = OrderStatus::ALL
            .into_iter()
            .map(|status| (status.as_str(), 0))
            .collect();
        let mut daily_sales = daily_window(today);
        let mut categories: HashMap<&str, (i64, Decimal)> = HashMap::new();
        let mut revenue = Decimal::ZERO;

        for order in orders {
            *orders_by_status.entry(order.status.as_str()).or_default() += 1;
            if !order.status.counts_as_revenue() {
                continue;
            }
            revenue = revenue.saturating_add(order.total_amount);
            let day = order.created_at.date_naive();
            if let Some(slot) = daily_sales.iter_mut().find(|slot| slot.date == day) {
                slot.orders += 1;
                slot.revenue = slot.revenue.saturating_add(order.total_amount);
            }
            for item in &order.items {
                let entry = categories
                    .entry(item.menu_item.category.as_str())
                    .or_insert((0, Decimal::ZERO));
                entry.0 = entry.0.saturating_add(i64::from(item.quantity));
                entry.1 = entry.1.saturating_add(item.line_total());
            }
        }

        let mut category_sales: Vec<CategorySales> = categories
            .into_iter()
            .map(|(category, (quantity, revenue))| CategorySales {
                category: category.to_owned(),
                quantity,
                revenue,
            })
            .collect();
        category_sales.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            total_orders: orders.len() as u64,
            orders_by_status,
            revenue,
            daily_sales,
            category_sales,
        }
    }
}

fn daily_window(today: NaiveDate) -> Vec<DailySales> {
    (0..DAILY_WINDOW)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| DailySales {
            date,
            orders: 0,
            revenue: Decimal::ZERO,
        })
        .collect()
}
