//! Port for order persistence.

use async_trait::async_trait;

use crate::domain::{AccessError, AccountId, Order, OrderId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// The owning account no longer exists.
        OwnerMissing => "order owner no longer exists",
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
    }
}

impl From<OrderRepositoryError> for AccessError {
    fn from(value: OrderRepositoryError) -> Self {
        match value {
            OrderRepositoryError::OwnerMissing => AccessError::not_found("account"),
            OrderRepositoryError::Connection { message } => AccessError::unavailable(message),
            OrderRepositoryError::Query { message } => AccessError::internal(message),
        }
    }
}

/// Port for storing orders. Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order whose owner still exists, in one step with that check.
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Fetch an order by identifier.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Every stored order.
    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Records owned by `owner_id`.
    async fn list_by_owner(&self, owner_id: &AccountId)
    -> Result<Vec<Order>, OrderRepositoryError>;

    /// Replace a stored order. Returns `false` when it no longer exists.
    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError>;

    /// Returns `false` when the order was already gone.
    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError>;

    /// Number of stored records.
    async fn count_all(&self) -> Result<u64, OrderRepositoryError>;

    /// Number of records owned by `owner_id`.
    async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, OrderRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OrderRepositoryError::owner_missing(), AccessError::not_found("account"))]
    #[case(OrderRepositoryError::connection("refused"), AccessError::unavailable("refused"))]
    #[case(OrderRepositoryError::query("syntax"), AccessError::internal("syntax"))]
    fn maps_to_access_errors(#[case] error: OrderRepositoryError, #[case] expected: AccessError) {
        assert_eq!(AccessError::from(error), expected);
    }
}
