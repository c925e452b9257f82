//! Administrator account management.
//!
//! ```text
//! GET    /api/v1/users
//! POST   /api/v1/users       {"username":"bob","email":"bob@x.com","password":"secret1","role":"ADMIN"}
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}  {"role":"USER"}
//! DELETE /api/v1/users/{id}
//! GET    /api/v1/stats
//! ```
//!
//! Every route requires an administrator session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AccountId, AccountUpdate, Role, Statistics};
use crate::inbound::http::ApiResult;
use crate::inbound::http::account_dto::{
    AccountList, AccountResponse, CreateAccountRequest, UpdateAccountRequest, parse_role,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Store totals returned by `GET /api/v1/stats`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub total_notes: u64,
    pub total_orders: u64,
    pub total_posts: u64,
}

impl From<Statistics> for StatsResponse {
    fn from(value: Statistics) -> Self {
        Self {
            total_users: value.total_accounts,
            total_notes: value.total_notes,
            total_orders: value.total_orders,
            total_posts: value.total_posts,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All accounts", body = AccountList),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator role required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountList>> {
    let caller = session.require_caller(&state.accounts).await?;
    let accounts = state.accounts.list_accounts(&caller).await?;
    Ok(web::Json(AccountList::from_accounts(&accounts)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator role required", body = ErrorSchema),
        (status = 409, description = "Username or email taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    let CreateAccountRequest {
        username,
        email,
        password,
        role,
    } = payload.into_inner();
    let role = role.as_deref().map(parse_role).transpose()?.unwrap_or(Role::Standard);
    let account = state
        .accounts
        .create_account(&caller, &username, &email, &password, role)
        .await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(&account)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<AccountResponse>> {
    let caller = session.require_caller(&state.accounts).await?;
    let account = state
        .accounts
        .get_account(&caller, &AccountId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateAccountRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let caller = session.require_caller(&state.accounts).await?;
    let id = AccountId::from_uuid(path.into_inner());
    // The role string is parsed here, so settle existence first.
    state.accounts.get_account(&caller, &id).await?;
    let update = AccountUpdate::try_from(payload.into_inner())?;
    let account = state.accounts.update_account(&caller, &id, update).await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account and its records deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator, or deleting self", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    state
        .accounts
        .delete_account(&caller, &AccountId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Store totals", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator role required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "statistics"
)]
#[get("/stats")]
pub async fn statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StatsResponse>> {
    let caller = session.require_caller(&state.accounts).await?;
    let stats = state.accounts.statistics(&caller).await?;
    Ok(web::Json(stats.into()))
}

#[cfg(test)]
mod tests;
