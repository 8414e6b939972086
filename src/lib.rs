//! Expenseur is a personal expense tracking service.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions, organizing them into per-user categories, and listing them
//! with filtering, sorting and pagination. All data is persisted to SQLite
//! and every route is scoped to the authenticated user via bearer tokens.

#![warn(missing_docs)]

use std::net::SocketAddr;
use std::time::Duration;

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod auth;
mod category;
pub mod db;
pub mod endpoints;
mod error;
pub mod models;
mod routes;
pub mod stores;
mod transaction;
mod user;

#[cfg(test)]
mod testing;

pub use app_state::AppState;
pub use error::Error;
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
