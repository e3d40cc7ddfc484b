// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request};
use ridelink::config::Config;
use ridelink::db::DataStore;
use ridelink::models::{NewUser, User, UserRole};
use ridelink::routes::create_router;
use ridelink::AppState;
use std::sync::Arc;

/// Create a test app with a detached (in-memory) store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = DataStore::detached();
    let state = Arc::new(AppState { config, store });
    (create_router(state.clone()), state)
}

/// Create a session JWT the way the login route does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, role: UserRole, signing_key: &[u8]) -> String {
    ridelink::middleware::auth::create_jwt(user_id, role, signing_key)
        .expect("JWT creation should succeed")
}

/// Seed a user directly in the store and return the record plus a
/// matching session token.
#[allow(dead_code)]
pub fn seed_user(state: &AppState, role: UserRole, email: &str) -> (User, String) {
    let user = state
        .store
        .create_user(NewUser {
            user_type: role,
            name: format!("Test {role}"),
            email: email.to_string(),
            password: "hunter2".to_string(),
            mobile: "555-0100".to_string(),
        })
        .expect("seed user should not collide");
    let token = create_test_jwt(&user.id, role, &state.config.jwt_signing_key);
    (user, token)
}

/// Build a JSON request, optionally with a Bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
