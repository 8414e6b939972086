//! Shared helpers for full-stack endpoint tests.
//!
//! Tests run against the real router and an in-memory SQLite database, with
//! real tokens issued through the sign-in endpoint.

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{build_router, stores::create_app_state};

/// The password used for test accounts. Long enough to satisfy the password
/// strength check at registration.
pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// Create a test server backed by a fresh in-memory database.
pub fn test_server() -> TestServer {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = create_app_state(connection, "42").expect("Could not initialize database.");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Register a user with [TEST_PASSWORD] as their password.
pub async fn register_user(server: &TestServer, email: &str) {
    server
        .post("/users")
        .content_type("application/json")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

/// Register `email` and sign them in, returning their bearer token.
pub async fn sign_up(server: &TestServer, email: &str) -> String {
    register_user(server, email).await;

    let response = server
        .post("/sign_in")
        .content_type("application/json")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status_ok();

    response.json::<String>()
}
