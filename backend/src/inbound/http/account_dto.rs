//! Account request and response bodies shared by the auth and users handlers.
//!
//! Responses are built from [`Account`] field by field so the stored password
//! hash can never reach a client.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccessError, Account, AccountUpdate, Error, Role};

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// `USER` or `ADMIN`.
    #[schema(example = "USER")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            username: account.username().to_string(),
            email: account.email().to_string(),
            role: account.role().as_str().to_owned(),
            created_at: account.created_at(),
        }
    }
}

/// Listing body for `GET /api/v1/users`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountList {
    pub count: usize,
    pub users: Vec<AccountResponse>,
}

impl AccountList {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let users: Vec<AccountResponse> = accounts.iter().map(AccountResponse::from).collect();
        Self {
            count: users.len(),
            users,
        }
    }
}

/// Self-service registration body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Administrator-created account body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `USER`.
    pub role: Option<String>,
}

/// Partial account update for `PUT /api/v1/users/{id}`.
#[derive(Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Parse a role string, reporting failures against the `role` field.
pub(crate) fn parse_role(raw: &str) -> Result<Role, Error> {
    Role::from_str(raw).map_err(|err| Error::from(AccessError::from(err)))
}

impl TryFrom<UpdateAccountRequest> for AccountUpdate {
    type Error = Error;

    fn try_from(value: UpdateAccountRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: value.email,
            role: value.role.as_deref().map(parse_role).transpose()?,
            password: value.password,
        })
    }
}
