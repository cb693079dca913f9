//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa when building the OpenAPI document"
)]

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with current state, such as a duplicate
    /// account or a disallowed status change.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "menu item 7 not found or unavailable")]
    message: String,
    /// Same text as `message`.
    #[schema(example = "menu item 7 not found or unavailable")]
    error: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    #[schema(rename = "user")]
    User,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::User`]. Credentials are never
/// serialised.
#[derive(ToSchema)]
#[schema(as = User)]
pub struct UserSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "23101A0001")]
    roll_number: Option<String>,
    #[schema(example = "23101A0001")]
    username: String,
    #[schema(example = "23101A0001@student.com")]
    email: String,
    role: RoleSchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::AuthSession`].
#[derive(ToSchema)]
#[schema(as = AuthSession)]
pub struct AuthSessionSchema {
    /// Bearer token for the `Authorization` header.
    token: String,
    user: UserSchema,
}

/// OpenAPI schema for [`crate::domain::MenuItem`].
#[derive(ToSchema)]
#[schema(as = MenuItem)]
pub struct MenuItemSchema {
    #[schema(example = 3)]
    id: i32,
    #[schema(example = "Masala Dosa")]
    name: String,
    description: Option<String>,
    #[schema(example = 85.0)]
    price: f64,
    #[schema(example = "South Indian")]
    category: String,
    image_url: Option<String>,
    available: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::OrderStatus`].
#[derive(ToSchema)]
#[schema(as = OrderStatus)]
pub enum OrderStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "preparing")]
    Preparing,
    #[schema(rename = "ready")]
    Ready,
    #[schema(rename = "completed")]
    Completed,
    #[schema(rename = "cancelled")]
    Cancelled,
}

/// OpenAPI schema for [`crate::domain::OrderItemMenu`].
#[derive(ToSchema)]
#[schema(as = OrderItemMenu)]
pub struct OrderItemMenuSchema {
    name: String,
    description: Option<String>,
    category: String,
}

/// OpenAPI schema for [`crate::domain::OrderItem`].
#[derive(ToSchema)]
#[schema(as = OrderItem)]
pub struct OrderItemSchema {
    id: i32,
    menu_item_id: i32,
    #[schema(example = 2)]
    quantity: i32,
    /// Unit price captured when the order was placed.
    #[schema(example = 85.0)]
    price: f64,
    menu_item: OrderItemMenuSchema,
}

/// OpenAPI schema for [`crate::domain::Order`].
#[derive(ToSchema)]
#[schema(as = Order)]
pub struct OrderSchema {
    id: i32,
    user_id: i32,
    status: OrderStatusSchema,
    #[schema(example = 170.0)]
    total_amount: f64,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    items: Vec<OrderItemSchema>,
}

/// OpenAPI schema for [`crate::domain::DailySales`].
#[derive(ToSchema)]
#[schema(as = DailySales)]
pub struct DailySalesSchema {
    #[schema(value_type = String, format = Date, example = "2026-03-10")]
    date: String,
    orders: u64,
    revenue: f64,
}

/// OpenAPI schema for [`crate::domain::CategorySales`].
#[derive(ToSchema)]
#[schema(as = CategorySales)]
pub struct CategorySalesSchema {
    category: String,
    quantity: i64,
    revenue: f64,
}

/// OpenAPI schema for [`crate::domain::Analytics`].
#[derive(ToSchema)]
#[schema(as = Analytics)]
pub struct AnalyticsSchema {
    total_orders: u64,
    /// Count per status; every status is present.
    orders_by_status: BTreeMap<String, u64>,
    /// Total of non-cancelled orders.
    revenue: f64,
    /// Seven UTC days ending today, oldest first.
    daily_sales: Vec<DailySalesSchema>,
    /// Highest revenue first.
    category_sales: Vec<CategorySalesSchema>,
}
