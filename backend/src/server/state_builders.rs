//! Builders wiring the in-memory store, registries and services into HTTP state.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use notekeeper::domain::demo_data::{self, SeedSummary};
use notekeeper::domain::{
    AccessError, AccountRegistry, AccountService, Authenticator, NoteRegistry, NoteService,
    OrderRegistry, OrderService, PasswordHasher, PostRegistry, PostService,
};
use notekeeper::inbound::http::state::HttpState;
use notekeeper::outbound::persistence::InMemoryStore;

/// Services shared by every worker, plus the handles start-up code needs.
#[derive(Clone)]
pub struct AppServices {
    pub http: HttpState,
    pub notes: NoteRegistry,
}

/// Build every service over one shared store.
///
/// The authenticator's dummy hash is computed here, once, before the server
/// accepts requests.
///
/// # Errors
/// Propagates [`AccessError::Internal`] when the hasher cannot produce the
/// dummy hash.
pub fn build_app_services(
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
) -> Result<AppServices, AccessError> {
    let store = Arc::new(InMemoryStore::new());
    let accounts = AccountRegistry::new(store.clone(), clock.clone());
    let notes = NoteRegistry::new(store.clone(), clock.clone());
    let orders = OrderRegistry::new(store.clone(), clock.clone());
    let posts = PostRegistry::new(store, clock);
    let login = Authenticator::new(accounts.clone(), hasher.clone())?;

    let http = HttpState::new(
        Arc::new(login),
        AccountService::new(accounts, notes.clone(), orders.clone(), posts.clone(), hasher),
        NoteService::new(notes.clone()),
        OrderService::new(orders),
        PostService::new(posts),
    );
    Ok(AppServices { http, notes })
}

/// Seed the demo accounts when enabled.
pub async fn seed_demo_data_on_startup(
    enabled: bool,
    services: &AppServices,
) -> Result<Option<SeedSummary>, AccessError> {
    if !enabled {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }
    let summary = demo_data::seed(&services.http.accounts, &services.notes).await?;
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use notekeeper::domain::ports::LoginService;
    use notekeeper::domain::{LoginCredentials, Role};
    use notekeeper::outbound::hashing::Argon2PasswordHasher;
    use rstest::{fixture, rstest};

    #[fixture]
    fn services() -> AppServices {
        let hasher =
            Argon2PasswordHasher::with_cost(Some(8), Some(1), Some(1)).expect("cheap cost");
        build_app_services(Arc::new(hasher), Arc::new(DefaultClock)).expect("wiring")
    }

    #[rstest]
    #[tokio::test]
    async fn login_port_sees_accounts_created_by_the_service(services: AppServices) {
        services
            .http
            .accounts
            .provision("carol", "carol@example.com", "secret1", Role::Standard)
            .await
            .expect("provision");

        let credentials =
            LoginCredentials::try_from_parts("carol@example.com", "secret1").expect("credentials");
        let account = services
            .http
            .login
            .login(&credentials)
            .await
            .expect("login");
        assert_eq!(account.username().as_ref(), "carol");
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_is_skipped_unless_enabled(services: AppServices) {
        assert_eq!(seed_demo_data_on_startup(false, &services).await, Ok(None));

        let summary = seed_demo_data_on_startup(true, &services)
            .await
            .expect("seed")
            .expect("summary");
        assert_eq!(summary.accounts_created, 2);

        let again = seed_demo_data_on_startup(true, &services)
            .await
            .expect("seed again")
            .expect("summary");
        assert_eq!(again.accounts_created, 0);
        assert_eq!(again.accounts_skipped, 2);
    }
}
