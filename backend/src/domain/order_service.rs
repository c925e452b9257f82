//! Order use-cases guarded by ownership; same shape as notes.

use tracing::warn;

use super::access_policy::{Operation, authorize};
use super::{AccessError, Caller, Order, OrderDraft, OrderId, OrderPatch, OrderRegistry};

/// Order use-cases for one authenticated caller at a time.
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRegistry,
}

impl OrderService {
    /// Wrap the order registry.
    pub fn new(orders: OrderRegistry) -> Self {
        Self { orders }
    }

    /// Administrators see every order; everyone else sees their own.
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<Order>, AccessError> {
        if caller.is_admin() {
            self.orders.list_all().await
        } else {
            self.orders.list_by_owner(&caller.id()).await
        }
    }

    /// Read one order.
    pub async fn get(&self, caller: &Caller, id: &OrderId) -> Result<Order, AccessError> {
        self.guarded(caller, id, Operation::Read).await
    }

    /// Place an order owned by the caller.
    pub async fn create(&self, caller: &Caller, draft: &OrderDraft) -> Result<Order, AccessError> {
        authorize(caller, caller.id(), Operation::Create)?;
        self.orders.create(caller.id(), draft).await
    }

    /// Apply `patch`, including status changes, to an order the caller may change.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, AccessError> {
        let order = self.guarded(caller, id, Operation::Update).await?;
        self.orders.update(&order, patch).await
    }

    /// Cancel by removal.
    pub async fn delete(&self, caller: &Caller, id: &OrderId) -> Result<(), AccessError> {
        let order = self.guarded(caller, id, Operation::Delete).await?;
        self.orders.delete(&order).await
    }

    async fn guarded(
        &self,
        caller: &Caller,
        id: &OrderId,
        operation: Operation,
    ) -> Result<Order, AccessError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AccessError::not_found("order"))?;
        if let Err(err) = authorize(caller, order.owner_id(), operation) {
            warn!(account_id = %caller.id(), order_id = %id, ?operation, "order access denied");
            return Err(err);
        }
        Ok(order)
    }
}
