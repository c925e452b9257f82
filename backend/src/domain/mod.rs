//! Domain primitives, policy and use-case services.
//!
//! Purpose: keep the access-control core independent of HTTP and storage.
//! Services hold only `Arc` handles to ports; adapters live under
//! `inbound` and `outbound`.
//!
//! Public surface:
//! - [`AccessError`]: typed failure taxonomy returned by the core.
//! - [`Error`] / [`ErrorCode`]: API error payload built from [`AccessError`].
//! - [`Account`], [`Note`], [`Order`], [`Post`]: validated records.
//! - [`access_policy`]: ownership and role rules.
//! - [`AccountRegistry`], [`NoteRegistry`], [`OrderRegistry`], [`PostRegistry`]:
//!   record stores.
//! - [`Authenticator`]: credential checks with timing equalisation.
//! - [`AccountService`], [`NoteService`], [`OrderService`], [`PostService`]:
//!   guarded use-cases.

pub mod access_policy;
pub mod account;
pub mod account_registry;
pub mod account_service;
pub mod auth;
pub mod authenticator;
pub mod demo_data;
pub mod error;
pub mod note;
pub mod note_registry;
pub mod note_service;
pub mod order;
pub mod order_registry;
pub mod order_service;
pub mod password;
pub mod post;
pub mod post_registry;
pub mod post_service;
pub mod ports;
pub mod trace_id;

pub use self::access_policy::{
    Caller, Operation, authorize, can_access, ensure_not_self, require_admin,
};
pub use self::account::{
    Account, AccountId, AccountPatch, AccountValidationError, Email, Role, Username,
};
pub use self::account_registry::AccountRegistry;
pub use self::account_service::{AccountService, AccountUpdate, Statistics};
pub use self::auth::{LoginCredentials, LoginIdentifier, LoginValidationError};
pub use self::authenticator::Authenticator;
pub use self::error::{AccessError, Error, ErrorCode, ErrorValidationError};
pub use self::note::{Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
pub use self::note_registry::NoteRegistry;
pub use self::note_service::NoteService;
pub use self::order::{
    Order, OrderDraft, OrderId, OrderLine, OrderLineDraft, OrderPatch, OrderStatus,
    OrderValidationError,
};
pub use self::order_registry::OrderRegistry;
pub use self::order_service::OrderService;
pub use self::password::{
    Password, PasswordHash, PasswordHashError, PasswordHasher, PasswordValidationError,
};
pub use self::post::{Post, PostContents, PostDraft, PostId, PostValidationError};
pub use self::post_registry::PostRegistry;
pub use self::post_service::PostService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use notekeeper::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
