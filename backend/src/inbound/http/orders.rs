//! Order API handlers.
//!
//! ```text
//! POST /orders {"items":[{"menu_item_id":3,"quantity":2}]}
//! GET /orders
//! GET /kitchen/orders
//! PUT /orders/{id}/status {"status":"preparing"}
//! ```
//!
//! Listings are polled by clients and are served with `Cache-Control:
//! no-store`.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClientInfo, Order, OrderId, OrderLineInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, OrderSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const ORDER_PLACED: &str = "Order placed successfully";

/// One line of `POST /orders`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
pub struct OrderLineRequest {
    #[schema(example = 3)]
    pub menu_item_id: Option<i64>,
    #[schema(example = 2)]
    pub quantity: Option<i64>,
}

/// Request body for `POST /orders`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Option<Vec<OrderLineRequest>>,
}

/// Request body for `PUT /orders/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdateRequest {
    #[schema(example = "preparing")]
    pub status: Option<String>,
}

/// Response body for `POST /orders`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPlacedResponse {
    #[schema(value_type = OrderSchema)]
    pub order: Order,
    #[schema(value_type = String, example = "Order placed successfully")]
    pub message: &'static str,
}

impl From<OrderLineRequest> for OrderLineInput {
    fn from(value: OrderLineRequest) -> Self {
        Self {
            menu_item_id: value.menu_item_id,
            quantity: value.quantity,
        }
    }
}

fn no_store_json(orders: Vec<Order>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(orders)
}

/// Place an order priced from the current menu.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderPlacedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    caller: Authenticated,
    client: ClientInfo,
    payload: web::Json<PlaceOrderRequest>,
) -> ApiResult<HttpResponse> {
    let lines = payload
        .into_inner()
        .items
        .unwrap_or_default()
        .into_iter()
        .map(OrderLineInput::from)
        .collect();
    let order = state
        .orders
        .place_order(caller.identity(), lines, &client)
        .await?;
    Ok(HttpResponse::Created().json(OrderPlacedResponse {
        order,
        message: ORDER_PLACED,
    }))
}

/// List orders: every order for admins, otherwise the caller's own. Newest
/// first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Orders with their items", body = [OrderSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let orders = state.orders_query.list_orders(caller.identity()).await?;
    Ok(no_store_json(orders))
}

/// Pending and preparing orders, oldest first. Admin only.
#[utoipa::path(
    get,
    path = "/kitchen/orders",
    responses(
        (status = 200, description = "Kitchen queue", body = [OrderSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "kitchenQueue"
)]
#[get("/kitchen/orders")]
pub async fn kitchen_orders(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let orders = state.orders_query.kitchen_queue(caller.identity()).await?;
    Ok(no_store_json(orders))
}

/// Move an order one step through its workflow, or cancel it. Admin only.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    request_body = StatusUpdateRequest,
    params(("id" = i32, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Updated order", body = OrderSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Order not found", body = ErrorSchema),
        (status = 409, description = "Transition not allowed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[put("/orders/{id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    caller: Authenticated,
    client: ClientInfo,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<Order>> {
    let id = OrderId::new(parse_id(&path.into_inner(), FieldName::new("id"))?);
    let order = state
        .orders
        .update_status(caller.identity(), id, payload.into_inner().status, &client)
        .await?;
    Ok(web::Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, Role};
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    struct Kitchen {
        harness: TestHarness,
        admin: Identity,
        student: Identity,
    }

    struct Reply {
        status: StatusCode,
        cache_control: Option<String>,
        body: Value,
    }

    async fn send(harness: &TestHarness, request: actix_test::TestRequest) -> Reply {
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.state.clone())
                .service(place_order)
                .service(list_orders)
                .service(kitchen_orders)
                .service(update_order_status),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let cache_control = response
            .headers()
            .get("cache-control")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = actix_test::read_body_json(response).await;
        Reply {
            status,
            cache_control,
            body,
        }
    }

    async fn a_kitchen_with_a_priced_menu() -> Kitchen {
        let harness = TestHarness::new();
        harness.seed_menu_item("Idli", "South Indian", 40).await;
        harness.seed_menu_item("Vada", "South Indian", 30).await;
        harness.seed_menu_item("Masala Dosa", "South Indian", 85).await;
        let admin = harness.seed_user("kitchen", Role::Admin).await;
        let student = harness.seed_user("23101A0001", Role::User).await;
        Kitchen {
            harness,
            admin,
            student,
        }
    }

    async fn the_student_orders_two_of_item_three(kitchen: &Kitchen) -> Reply {
        send(
            &kitchen.harness,
            actix_test::TestRequest::post()
                .uri("/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.student)))
                .set_json(json!({ "items": [{ "menu_item_id": 3, "quantity": 2 }] })),
        )
        .await
    }

    fn a_pending_order_totalling_170_is_created(reply: &Reply) {
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body["message"], ORDER_PLACED);
        assert_eq!(reply.body["order"]["status"], "pending");
        assert_eq!(reply.body["order"]["total_amount"], json!(170.0));
        assert_eq!(reply.body["order"]["items"][0]["menu_item"]["name"], "Masala Dosa");
    }

    async fn move_order(kitchen: &Kitchen, caller: &Identity, id: &Value, status: &str) -> Reply {
        send(
            &kitchen.harness,
            actix_test::TestRequest::put()
                .uri(&format!("/orders/{id}/status"))
                .insert_header(("authorization", kitchen.harness.bearer(caller)))
                .set_json(json!({ "status": status })),
        )
        .await
    }

    #[rstest]
    #[actix_web::test]
    async fn placing_an_order_captures_current_prices() {
        let kitchen = a_kitchen_with_a_priced_menu().await;
        let reply = the_student_orders_two_of_item_three(&kitchen).await;
        a_pending_order_totalling_170_is_created(&reply);
    }

    #[rstest]
    #[actix_web::test]
    async fn orders_walk_the_workflow_and_leave_the_queue() {
        let kitchen = a_kitchen_with_a_priced_menu().await;
        let placed = the_student_orders_two_of_item_three(&kitchen).await;
        let id = placed.body["order"]["id"].clone();

        let queue = send(
            &kitchen.harness,
            actix_test::TestRequest::get()
                .uri("/kitchen/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.admin))),
        )
        .await;
        assert_eq!(queue.cache_control.as_deref(), Some("no-store"));
        assert_eq!(queue.body[0]["id"], id);

        for status in ["preparing", "ready", "completed"] {
            let reply = move_order(&kitchen, &kitchen.admin, &id, status).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.body["status"], status);
        }

        let queue = send(
            &kitchen.harness,
            actix_test::TestRequest::get()
                .uri("/kitchen/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.admin))),
        )
        .await;
        assert_eq!(queue.body, json!([]));
    }

    #[rstest]
    #[case("ready", StatusCode::CONFLICT)]
    #[case("pending", StatusCode::CONFLICT)]
    #[case("shipped", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn disallowed_statuses_leave_the_order_pending(
        #[case] status: &str,
        #[case] expected: StatusCode,
    ) {
        let kitchen = a_kitchen_with_a_priced_menu().await;
        let placed = the_student_orders_two_of_item_three(&kitchen).await;
        let id = placed.body["order"]["id"].clone();

        let reply = move_order(&kitchen, &kitchen.admin, &id, status).await;
        assert_eq!(reply.status, expected);

        let history = send(
            &kitchen.harness,
            actix_test::TestRequest::get()
                .uri("/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.student))),
        )
        .await;
        assert_eq!(history.body[0]["status"], "pending");
    }

    #[rstest]
    #[actix_web::test]
    async fn students_cannot_change_statuses_or_see_the_queue() {
        let kitchen = a_kitchen_with_a_priced_menu().await;
        let placed = the_student_orders_two_of_item_three(&kitchen).await;
        let id = placed.body["order"]["id"].clone();

        let reply = move_order(&kitchen, &kitchen.student, &id, "preparing").await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);

        let queue = send(
            &kitchen.harness,
            actix_test::TestRequest::get()
                .uri("/kitchen/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.student))),
        )
        .await;
        assert_eq!(queue.status, StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case(json!({}), "order items are required")]
    #[case(json!({ "items": [] }), "order items are required")]
    #[case(json!({ "items": [{ "menu_item_id": 99, "quantity": 1 }] }), "menu item 99 not found or unavailable")]
    #[case(json!({ "items": [{ "menu_item_id": 3, "quantity": 2_000_000 }] }), "order total too large")]
    #[actix_web::test]
    async fn invalid_orders_are_rejected(#[case] body: Value, #[case] message: &str) {
        let kitchen = a_kitchen_with_a_priced_menu().await;

        let reply = send(
            &kitchen.harness,
            actix_test::TestRequest::post()
                .uri("/orders")
                .insert_header(("authorization", kitchen.harness.bearer(&kitchen.student)))
                .set_json(body),
        )
        .await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["message"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_orders_are_not_found() {
        let kitchen = a_kitchen_with_a_priced_menu().await;

        let reply = move_order(&kitchen, &kitchen.admin, &json!(77), "preparing").await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["message"], "order not found");
    }
}
