//! Application router configuration.

use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::timeout::TimeoutLayer;

use crate::{
    AppState,
    auth::sign_in,
    category::{create_category, delete_category, get_categories, update_category},
    endpoints,
    stores::{CategoryStore, TransactionStore, UserStore},
    transaction::{
        create_transaction, delete_transaction, get_transactions, update_transaction,
    },
    user::create_user,
};

/// How long a request may run before it is cut off with a timeout response.
/// This bounds the time spent waiting on the storage layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Return a router with all the app's routes.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::USERS, post(create_user::<C, T, U>))
        .route(endpoints::SIGN_IN, post(sign_in::<C, T, U>));

    // These routes require a bearer token, enforced by the `Claims`
    // extractor in each handler.
    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories::<C, T, U>).post(create_category::<C, T, U>),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category::<C, T, U>).delete(delete_category::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions::<C, T, U>).post(create_transaction::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction::<C, T, U>).delete(delete_transaction::<C, T, U>),
        );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

/// A liveness probe.
async fn get_health() -> Response {
    Json(json!({"ok": true})).into_response()
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Not found"})),
    )
        .into_response()
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::testing::test_server;

    #[tokio::test]
    async fn health_check_reports_ok() {
        let server = test_server();

        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>().get("ok").unwrap(),
            &Value::Bool(true)
        );
    }

    #[tokio::test]
    async fn unknown_routes_get_a_json_404() {
        let server = test_server();

        let response = server.get("/definitely/not/a/route").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>()["message"],
            "Not found"
        );
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = test_server();

        server
            .get("/coffee")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }
}
