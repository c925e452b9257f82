//! Domain-level error types.
//!
//! [`AccessError`] is the typed taxonomy returned by the access-control core.
//! [`Error`] is the transport-agnostic payload that inbound adapters turn into
//! HTTP responses; `From<AccessError> for Error` is the single place where a
//! failure kind is mapped to a stable [`ErrorCode`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TraceId;

/// Failure kinds produced by registries, the authenticator and the policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Caller-correctable input error.
    #[error("{field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },
    /// Another account already uses the username.
    #[error("username is already taken")]
    DuplicateUsername,
    /// Another account already uses the email address.
    #[error("email is already registered")]
    DuplicateEmail,
    /// Unknown account or wrong secret; deliberately indistinguishable.
    #[error("invalid credentials")]
    AuthenticationFailed,
    /// The caller lacks rights for the operation.
    #[error("access denied")]
    AuthorizationDenied,
    /// An administrator tried to delete their own account.
    #[error("administrators cannot delete their own account")]
    SelfDeletionForbidden,
    /// The addressed record does not exist.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    /// The backing store could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// Unexpected failure inside the core.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AccessError {
    /// Build a [`AccessError::ValidationFailed`] for `field`.
    pub fn validation(field: &'static str, reason: impl ToString) -> Self {
        Self::ValidationFailed {
            field,
            reason: reason.to_string(),
        }
    }

    /// Build a [`AccessError::NotFound`] for `resource`.
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Build an [`AccessError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Build an [`AccessError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// A dependency is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// API error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use notekeeper::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
    EmptyTraceId,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
            Self::EmptyTraceId => write!(f, "trace id must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if the message is blank.
    ///
    /// Captures the current [`TraceId`] when one is in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was in scope or attached.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier, panicking if it is blank.
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        match self.try_with_trace_id(id) {
            Ok(value) => value,
            Err(err) => panic!("trace ids must satisfy validation: {err}"),
        }
    }

    /// Fallible variant of [`Error::with_trace_id`].
    pub fn try_with_trace_id(
        mut self,
        id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        self.trace_id = Some(id);
        Ok(self)
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use notekeeper::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<AccessError> for Error {
    fn from(value: AccessError) -> Self {
        let message = value.to_string();
        match value {
            AccessError::ValidationFailed { field, reason } => Self::invalid_request(message)
                .with_details(json!({ "field": field, "code": "validation_failed", "reason": reason })),
            AccessError::DuplicateUsername => {
                Self::conflict(message).with_details(json!({ "field": "username", "code": "duplicate_username" }))
            }
            AccessError::DuplicateEmail => {
                Self::conflict(message).with_details(json!({ "field": "email", "code": "duplicate_email" }))
            }
            AccessError::AuthenticationFailed => Self::unauthorized(message),
            AccessError::AuthorizationDenied => {
                Self::forbidden(message).with_details(json!({ "code": "authorization_denied" }))
            }
            AccessError::SelfDeletionForbidden => {
                Self::forbidden(message).with_details(json!({ "code": "self_deletion_forbidden" }))
            }
            AccessError::NotFound { .. } => Self::not_found(message),
            AccessError::Unavailable { .. } => Self::service_unavailable(message),
            AccessError::Internal { .. } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests;
