//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod account_dto;
pub mod auth;
pub mod error;
pub mod health;
pub mod notes;
pub mod orders;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the JSON and path error mapping.
///
/// The caller supplies the scope, the session middleware and [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use notekeeper::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::path_config())
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_account)
        .service(notes::list_notes)
        .service(notes::create_note)
        .service(notes::get_note)
        .service(notes::update_note)
        .service(notes::delete_note)
        .service(orders::list_orders)
        .service(orders::create_order)
        .service(orders::get_order)
        .service(orders::update_order)
        .service(orders::delete_order)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::like_post)
        .service(posts::delete_post)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::statistics);
}
