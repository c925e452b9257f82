//! Orders API handlers.
//!
//! ```text
//! GET    /api/v1/orders
//! POST   /api/v1/orders       {"contactEmail":"a@b.co","deliveryAddress":"1 Main St",
//!                              "lines":[{"itemName":"Margherita","unitPriceMinor":15000,"quantity":2}]}
//! GET    /api/v1/orders/{id}
//! PUT    /api/v1/orders/{id}  {"status":"confirmed"}
//! DELETE /api/v1/orders/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AccessError, Error, Order, OrderDraft, OrderId, OrderLineDraft, OrderPatch, OrderStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, OrderSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One line of `POST /api/v1/orders`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    #[serde(default)]
    pub item_name: String,
    /// Price per unit in minor currency units.
    #[serde(default)]
    pub unit_price_minor: u32,
    #[serde(default)]
    pub quantity: u32,
}

/// Body for `POST /api/v1/orders`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(value: CreateOrderRequest) -> Self {
        Self {
            contact_email: value.contact_email,
            delivery_address: value.delivery_address,
            lines: value
                .lines
                .into_iter()
                .map(|line| OrderLineDraft {
                    item_name: line.item_name,
                    unit_price_minor: line.unit_price_minor,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Body for `PUT /api/v1/orders/{id}`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub contact_email: Option<String>,
    pub delivery_address: Option<String>,
    /// `pending`, `confirmed`, `delivered` or `cancelled`.
    pub status: Option<String>,
}

impl TryFrom<UpdateOrderRequest> for OrderPatch {
    type Error = Error;

    fn try_from(value: UpdateOrderRequest) -> Result<Self, Self::Error> {
        let status = value
            .status
            .as_deref()
            .map(OrderStatus::from_str)
            .transpose()
            .map_err(AccessError::from)?;
        Ok(Self {
            contact_email: value.contact_email,
            delivery_address: value.delivery_address,
            status,
        })
    }
}

/// Listing body for `GET /api/v1/orders`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub count: usize,
    #[schema(value_type = Vec<OrderSchema>)]
    pub orders: Vec<Order>,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Visible orders, newest first", body = OrderList),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrderList>> {
    let caller = session.require_caller(&state.accounts).await?;
    let orders = state.orders.list_visible(&caller).await?;
    Ok(web::Json(OrderList {
        count: orders.len(),
        orders,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    let draft = OrderDraft::from(payload.into_inner());
    let order = state.orders.create(&caller, &draft).await?;
    Ok(HttpResponse::Created().json(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Order>> {
    let caller = session.require_caller(&state.accounts).await?;
    let order = state
        .orders
        .get(&caller, &OrderId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(order))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateOrderRequest>,
) -> ApiResult<web::Json<Order>> {
    let caller = session.require_caller(&state.accounts).await?;
    let id = OrderId::from_uuid(path.into_inner());
    // Existence and ownership are settled before the body is interpreted.
    state.orders.get(&caller, &id).await?;
    let patch = OrderPatch::try_from(payload.into_inner())?;
    let order = state.orders.update(&caller, &id, &patch).await?;
    Ok(web::Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    state
        .orders
        .delete(&caller, &OrderId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
