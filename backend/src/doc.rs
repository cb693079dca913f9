//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in [`crate::inbound::http`], the schema
//! wrappers from [`crate::inbound::http::schemas`], and the bearer-token
//! security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::menu::{MenuItemPatchRequest, MenuItemRequest};
use crate::inbound::http::orders::{
    OrderLineRequest, OrderPlacedResponse, PlaceOrderRequest, StatusUpdateRequest,
};
use crate::inbound::http::schemas::{
    AnalyticsSchema, AuthSessionSchema, CategorySalesSchema, DailySalesSchema, ErrorCodeSchema,
    ErrorSchema, MenuItemSchema, OrderItemMenuSchema, OrderItemSchema, OrderSchema,
    OrderStatusSchema, RoleSchema, UserSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /auth/login or POST /auth/signup.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Canteen backend API",
        description = "Menu browsing, ordering, and kitchen workflow for the campus canteen."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::health::index,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::signup,
        crate::inbound::http::menu::list_menu_items,
        crate::inbound::http::menu::add_menu_item,
        crate::inbound::http::menu::update_menu_item,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::kitchen_orders,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::users::list_users,
        crate::inbound::http::admin::analytics,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        RoleSchema,
        AuthSessionSchema,
        MenuItemSchema,
        OrderSchema,
        OrderItemSchema,
        OrderItemMenuSchema,
        OrderStatusSchema,
        AnalyticsSchema,
        DailySalesSchema,
        CategorySalesSchema,
        LoginRequest,
        SignupRequest,
        MenuItemRequest,
        MenuItemPatchRequest,
        OrderLineRequest,
        PlaceOrderRequest,
        StatusUpdateRequest,
        OrderPlacedResponse,
    )),
    tags(
        (name = "health", description = "Service banner and probes"),
        (name = "auth", description = "Login and signup"),
        (name = "menu", description = "Menu browsing and administration"),
        (name = "orders", description = "Ordering and the kitchen workflow"),
        (name = "users", description = "Account administration"),
        (name = "admin", description = "Dashboard figures")
    )
)]
pub struct ApiDoc;
