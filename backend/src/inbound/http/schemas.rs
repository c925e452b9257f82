//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the serialised shape of their domain counterparts and
//! are registered under the domain type names.

use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The username or email is already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// The store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title: title must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "title", "code": "validation_failed"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Note`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Note)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NoteSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Account that owns the note.
    owner_id: String,
    #[schema(example = "Shopping list")]
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// OpenAPI schema for [`crate::domain::OrderStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::OrderStatus)]
pub enum OrderStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "confirmed")]
    Confirmed,
    #[schema(rename = "delivered")]
    Delivered,
    #[schema(rename = "cancelled")]
    Cancelled,
}

/// OpenAPI schema for [`crate::domain::OrderLine`].
#[derive(ToSchema)]
#[schema(as = crate::domain::OrderLine)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct OrderLineSchema {
    #[schema(example = "Margherita")]
    item_name: String,
    /// Price per unit in minor currency units.
    #[schema(example = 15000)]
    unit_price_minor: u32,
    #[schema(example = 2)]
    quantity: u32,
}

/// OpenAPI schema for [`crate::domain::Order`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Order)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct OrderSchema {
    id: String,
    owner_id: String,
    contact_email: String,
    delivery_address: String,
    lines: Vec<OrderLineSchema>,
    status: OrderStatusSchema,
    /// Sum of line subtotals in minor currency units.
    total_minor: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// OpenAPI schema for [`crate::domain::Post`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Post)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostSchema {
    id: String,
    /// Account that wrote the post.
    author_id: String,
    #[schema(example = "Launch day")]
    title: String,
    content: String,
    /// Lowercase and distinct.
    tags: Vec<String>,
    likes: u64,
    created_at: DateTime<Utc>,
}
