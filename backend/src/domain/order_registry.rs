//! Order registry: owner-tagged order records over the store.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::ports::OrderRepository;
use super::{AccessError, AccountId, Order, OrderDraft, OrderId, OrderPatch};

/// Registry of orders backed by an [`OrderRepository`].
#[derive(Clone)]
pub struct OrderRegistry {
    repository: Arc<dyn OrderRepository>,
    clock: Arc<dyn Clock>,
}

impl OrderRegistry {
    /// Build a registry over `repository`, stamping records with `clock`.
    pub fn new(repository: Arc<dyn OrderRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Validate `draft` and place it as a pending order owned by `owner_id`.
    pub async fn create(&self, owner_id: AccountId, draft: &OrderDraft) -> Result<Order, AccessError> {
        let contents = draft.validate()?;
        let order = Order::new(OrderId::random(), owner_id, contents, self.clock.utc());
        self.repository.insert(&order).await?;
        debug!(
            order_id = %order.id(),
            owner_id = %owner_id,
            total_minor = order.total_minor(),
            "order placed"
        );
        Ok(order)
    }

    /// Fetch an order by identifier.
    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, AccessError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// All orders, newest first.
    pub async fn list_all(&self) -> Result<Vec<Order>, AccessError> {
        Ok(self.repository.list_all().await?)
    }

    /// Orders placed by `owner_id`, newest first.
    pub async fn list_by_owner(&self, owner_id: &AccountId) -> Result<Vec<Order>, AccessError> {
        Ok(self.repository.list_by_owner(owner_id).await?)
    }

    /// Re-validate supplied fields and bump `updated_at`; empty patches are no-ops.
    pub async fn update(&self, order: &Order, patch: &OrderPatch) -> Result<Order, AccessError> {
        if patch.is_empty() {
            return Ok(order.clone());
        }
        let validated = patch.validate()?;
        let mut updated = order.clone();
        updated.revise(validated, self.clock.utc());
        if !self.repository.update(&updated).await? {
            return Err(AccessError::not_found("order"));
        }
        debug!(order_id = %updated.id(), status = ?updated.status(), "order updated");
        Ok(updated)
    }

    /// Remove an order; `NotFound` when it was already gone.
    pub async fn delete(&self, order: &Order) -> Result<(), AccessError> {
        if !self.repository.delete(&order.id()).await? {
            return Err(AccessError::not_found("order"));
        }
        debug!(order_id = %order.id(), "order deleted");
        Ok(())
    }

    /// Number of stored orders.
    pub async fn count_all(&self) -> Result<u64, AccessError> {
        Ok(self.repository.count_all().await?)
    }

    /// Number of orders placed by `owner_id`.
    pub async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, AccessError> {
        Ok(self.repository.count_by_owner(owner_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderLineDraft, OrderStatus};
    use crate::outbound::persistence::InMemoryStore;
    use crate::domain::Role;
    use crate::test_support::{MutableClock, fixture_timestamp, stored_account};
    use rstest::{fixture, rstest};

    struct Setup {
        store: Arc<InMemoryStore>,
        registry: OrderRegistry,
        clock: Arc<MutableClock>,
    }

    impl Setup {
        async fn owner(&self, username: &str) -> AccountId {
            stored_account(&self.store, username, Role::Standard).await
        }
    }

    #[fixture]
    fn setup() -> Setup {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        Setup {
            registry: OrderRegistry::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    fn draft(address: &str) -> OrderDraft {
        OrderDraft {
            contact_email: "buyer@x.com".into(),
            delivery_address: address.into(),
            lines: vec![OrderLineDraft {
                item_name: "Hawaiian".into(),
                unit_price_minor: 20_000,
                quantity: 2,
            }],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_computes_totals_and_starts_pending(setup: Setup) {
        let owner = setup.owner("owner").await;
        let order = setup
            .registry
            .create(owner, &draft("1 Main St"))
            .await
            .expect("create");
        assert_eq!(order.owner_id(), owner);
        assert_eq!(order.total_minor(), 40_000);
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_invalid_orders(setup: Setup) {
        let err = setup
            .registry
            .create(AccountId::random(), &draft("   "))
            .await
            .expect_err("blank address");
        assert!(matches!(
            err,
            AccessError::ValidationFailed { field: "deliveryAddress", .. }
        ));
        assert_eq!(setup.registry.count_all().await, Ok(0));
    }

    #[rstest]
    #[tokio::test]
    async fn listings_are_newest_first_and_scoped(setup: Setup) {
        let alice = setup.owner("alice").await;
        let bob = setup.owner("bob").await;
        for (owner, address) in [(alice, "first"), (bob, "second"), (alice, "third")] {
            setup
                .registry
                .create(owner, &draft(address))
                .await
                .expect("create");
            setup.clock.advance_seconds(1);
        }
        let addresses = |orders: Vec<Order>| -> Vec<String> {
            orders.iter().map(|o| o.delivery_address().to_owned()).collect()
        };
        assert_eq!(
            addresses(setup.registry.list_all().await.expect("list")),
            ["third", "second", "first"]
        );
        assert_eq!(
            addresses(setup.registry.list_by_owner(&alice).await.expect("list")),
            ["third", "first"]
        );
        assert_eq!(setup.registry.count_by_owner(&bob).await, Ok(1));
    }

    #[rstest]
    #[tokio::test]
    async fn status_update_bumps_updated_at(setup: Setup) {
        let order = setup
            .registry
            .create(setup.owner("owner").await, &draft("1 Main St"))
            .await
            .expect("create");
        setup.clock.advance_seconds(90);
        let patch = OrderPatch {
            status: Some(OrderStatus::Delivered),
            ..OrderPatch::default()
        };
        let updated = setup.registry.update(&order, &patch).await.expect("update");
        assert_eq!(updated.status(), OrderStatus::Delivered);
        assert_eq!(updated.delivery_address(), "1 Main St");
        assert!(updated.updated_at() > order.created_at());

        let same = setup
            .registry
            .update(&updated, &OrderPatch::default())
            .await
            .expect("no-op");
        assert_eq!(same, updated);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_the_order(setup: Setup) {
        let order = setup
            .registry
            .create(setup.owner("owner").await, &draft("1 Main St"))
            .await
            .expect("create");
        setup.registry.delete(&order).await.expect("delete");
        assert_eq!(setup.registry.find_by_id(&order.id()).await, Ok(None));
    }
}
