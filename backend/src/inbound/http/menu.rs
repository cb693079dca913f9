//! Menu API handlers.
//!
//! ```text
//! GET /menu_items
//! POST /menu_items {"name":"Masala Dosa","price":85,"category":"South Indian"}
//! PUT /menu_items/{id} {"available":false}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClientInfo, MenuItem, MenuItemId, MenuItemInput, MenuItemPatchInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, MenuItemSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request body for `POST /menu_items`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MenuItemRequest {
    #[schema(example = "Masala Dosa")]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Positive amount; rounded to two decimal places.
    #[schema(value_type = Option<f64>, example = 85.0)]
    pub price: Option<Decimal>,
    #[schema(example = "South Indian")]
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for `PUT /menu_items/{id}`. Omitted fields are unchanged; a
/// blank description or image URL clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MenuItemPatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

impl From<MenuItemRequest> for MenuItemInput {
    fn from(value: MenuItemRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            price: value.price,
            category: value.category,
            image_url: value.image_url,
        }
    }
}

impl From<MenuItemPatchRequest> for MenuItemPatchInput {
    fn from(value: MenuItemPatchRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            price: value.price,
            category: value.category,
            image_url: value.image_url,
            available: value.available,
        }
    }
}

/// List available menu items ordered by category, then name.
#[utoipa::path(
    get,
    path = "/menu_items",
    responses(
        (status = 200, description = "Available menu items", body = [MenuItemSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "listMenuItems",
    security([])
)]
#[get("/menu_items")]
pub async fn list_menu_items(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<MenuItem>>> {
    let items = state.menu.list_menu().await?;
    Ok(web::Json(items))
}

/// Add a menu item. Admin only.
#[utoipa::path(
    post,
    path = "/menu_items",
    request_body = MenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "addMenuItem"
)]
#[post("/menu_items")]
pub async fn add_menu_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    client: ClientInfo,
    payload: web::Json<MenuItemRequest>,
) -> ApiResult<HttpResponse> {
    let item = state
        .menu_admin
        .add_item(caller.identity(), payload.into_inner().into(), &client)
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// Edit a menu item, including its availability. Admin only.
#[utoipa::path(
    put,
    path = "/menu_items/{id}",
    request_body = MenuItemPatchRequest,
    params(("id" = i32, Path, description = "Menu item identifier")),
    responses(
        (status = 200, description = "Updated menu item", body = MenuItemSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "updateMenuItem"
)]
#[put("/menu_items/{id}")]
pub async fn update_menu_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    client: ClientInfo,
    path: web::Path<String>,
    payload: web::Json<MenuItemPatchRequest>,
) -> ApiResult<web::Json<MenuItem>> {
    let id = MenuItemId::new(parse_id(&path.into_inner(), FieldName::new("id"))?);
    let item = state
        .menu_admin
        .update_item(caller.identity(), id, payload.into_inner().into(), &client)
        .await?;
    Ok(web::Json(item))
}
