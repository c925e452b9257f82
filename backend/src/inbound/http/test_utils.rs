//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::domain::{Account, Authenticator, Role};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::test_support::{Harness, cheap_hasher};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// HTTP state wired to the harness store with a real authenticator.
pub fn harness_state(harness: &Harness) -> HttpState {
    HttpState::new(
        Arc::new(
            Authenticator::new(harness.accounts.registry().clone(), cheap_hasher())
                .expect("dummy hash"),
        ),
        harness.accounts.clone(),
        harness.notes.clone(),
        harness.orders.clone(),
        harness.posts.clone(),
    )
}

/// Full `/api/v1` surface over `state`, with a test session middleware.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure_api),
        )
}

/// Create an account directly through the service.
pub async fn provision(harness: &Harness, username: &str, role: Role) -> Account {
    harness
        .accounts
        .provision(username, &format!("{username}@example.com"), "password1", role)
        .await
        .expect("provision account")
}

/// Log in as `username` (password `password1`) and return the session cookie.
pub async fn sign_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": "password1" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "login as {username} failed: {}",
        response.status()
    );
    session_cookie(&response)
}
