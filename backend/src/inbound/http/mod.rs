//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod cache_control;
pub mod client_info;
pub mod error;
pub mod health;
pub mod identity;
pub mod menu;
pub mod orders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every handler and the JSON body configuration.
///
/// Callers register [`state::HttpState`] and [`health::HealthState`] as app
/// data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use canteen::inbound::http::configure_routes;
/// use canteen::inbound::http::health::HealthState;
///
/// let app = App::new()
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure_routes);
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .service(health::index)
        .service(health::live)
        .service(health::ready)
        .service(menu::list_menu_items)
        .service(menu::add_menu_item)
        .service(menu::update_menu_item)
        .service(users::list_users)
        .service(auth::login)
        .service(auth::signup)
        .service(orders::place_order)
        .service(orders::list_orders)
        .service(orders::kitchen_orders)
        .service(orders::update_order_status)
        .service(admin::analytics);
}
