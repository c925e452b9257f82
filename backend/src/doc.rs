//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes
//! - **Schemas**: request and response bodies, and wrappers
//!   ([`ErrorSchema`], [`NoteSchema`], [`OrderSchema`], [`PostSchema`]) that describe domain
//!   types without coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::account_dto::{
    AccountList, AccountResponse, CreateAccountRequest, RegisterRequest, UpdateAccountRequest,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::notes::{CreateNoteRequest, NoteList, UpdateNoteRequest};
use crate::inbound::http::orders::{
    CreateOrderRequest, OrderLineRequest, OrderList, UpdateOrderRequest,
};
use crate::inbound::http::posts::{CreatePostRequest, PostList};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, NoteSchema, OrderLineSchema, OrderSchema, OrderStatusSchema,
    PostSchema,
};
use crate::inbound::http::users::StatsResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notekeeper API",
        description = "Accounts, notes, orders and posts behind session-cookie authentication.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_account,
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::notes::create_note,
        crate::inbound::http::notes::get_note,
        crate::inbound::http::notes::update_note,
        crate::inbound::http::notes::delete_note,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::like_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::statistics,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        NoteSchema,
        OrderSchema,
        OrderLineSchema,
        OrderStatusSchema,
        PostSchema,
        AccountResponse,
        AccountList,
        RegisterRequest,
        CreateAccountRequest,
        UpdateAccountRequest,
        LoginRequest,
        CreateNoteRequest,
        UpdateNoteRequest,
        NoteList,
        CreateOrderRequest,
        OrderLineRequest,
        UpdateOrderRequest,
        OrderList,
        CreatePostRequest,
        PostList,
        StatsResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current session"),
        (name = "notes", description = "Notes owned by the signed-in account"),
        (name = "orders", description = "Orders owned by the signed-in account"),
        (name = "posts", description = "Blog posts written by the signed-in account"),
        (name = "users", description = "Administrator account management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
