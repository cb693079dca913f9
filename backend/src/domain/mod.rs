//! Domain primitives, services, and ports.
//!
//! Purpose: define the validated types used by the API and persistence
//! layers, the services that implement each use case, and the ports that
//! separate them from adapters.
//!
//! Public surface:
//! - Error and ErrorCode: transport-agnostic failure payload.
//! - User, RollNumber, Role: accounts and their identifiers.
//! - MenuItem, Price: the menu.
//! - Order, OrderStatus: orders and the status workflow.
//! - Analytics: admin dashboard figures.

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod menu;
pub mod menu_service;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::analytics::{Analytics, CategorySales, DailySales};
pub use self::audit::{AuditAction, AuditEntry};
pub use self::auth::{
    AuthSession, ClientInfo, Identity, LoginCredentials, LoginValidationError, PASSWORD_MIN,
    SignupDetails, SignupInput, SignupValidationError,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::menu::{
    MAX_AMOUNT, MenuItem, MenuItemId, MenuItemInput, MenuItemPatch, MenuItemPatchInput,
    MenuValidationError, NewMenuItem, Price,
};
pub use self::menu_service::MenuService;
pub use self::order::{
    InvalidTransition, Order, OrderFilter, OrderId, OrderItem, OrderItemMenu, OrderLine,
    OrderLineInput, OrderStatus, OrderValidationError, PricedLine, PricedOrder, PricingError,
    price_order,
};
pub use self::order_service::OrderService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, PasswordHash, Role, RollNumber, User, UserAccount, UserId,
    UserValidationError, Username,
};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use canteen::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
