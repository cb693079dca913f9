//! Admin dashboard handlers.
//!
//! ```text
//! GET /admin/analytics
//! ```

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::{AnalyticsSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Order counts, revenue, and the last week of sales. Admin only.
#[utoipa::path(
    get,
    path = "/admin/analytics",
    responses(
        (status = 200, description = "Dashboard figures", body = AnalyticsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "analytics"
)]
#[get("/admin/analytics")]
pub async fn analytics(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let figures = state.orders_query.analytics(caller.identity()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(figures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::orders::place_order;
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn analytics_summarise_placed_orders() {
        let harness = TestHarness::new();
        harness.seed_menu_item("Masala Dosa", "South Indian", 85).await;
        harness.seed_menu_item("Tea", "Drinks", 10).await;
        let admin = harness.seed_user("kitchen", Role::Admin).await;
        let student = harness.seed_user("23101A0001", Role::User).await;
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.state.clone())
                .service(place_order)
                .service(analytics),
        )
        .await;

        let order = actix_test::TestRequest::post()
            .uri("/orders")
            .insert_header(("authorization", harness.bearer(&student)))
            .set_json(json!({ "items": [
                { "menu_item_id": 1, "quantity": 2 },
                { "menu_item_id": 2, "quantity": 1 }
            ] }))
            .to_request();
        let placed = actix_test::call_service(&app, order).await;
        assert_eq!(placed.status(), StatusCode::CREATED);

        let request = actix_test::TestRequest::get()
            .uri("/admin/analytics")
            .insert_header(("authorization", harness.bearer(&admin)))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;

        assert_eq!(body["total_orders"], 1);
        assert_eq!(body["orders_by_status"]["pending"], 1);
        assert_eq!(body["orders_by_status"]["cancelled"], 0);
        assert_eq!(body["revenue"], json!(180.0));
        assert_eq!(body["daily_sales"].as_array().map(Vec::len), Some(7));
        assert_eq!(body["daily_sales"][6]["orders"], 1);
        assert_eq!(body["category_sales"][0]["category"], "South Indian");
    }

    #[rstest]
    #[actix_web::test]
    async fn students_cannot_read_analytics() {
        let harness = TestHarness::new();
        let student = harness.seed_user("23101A0001", Role::User).await;
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.state.clone())
                .service(analytics),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/admin/analytics")
            .insert_header(("authorization", harness.bearer(&student)))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
