//! SQLite backed implementations of the store traits.
//!
//! All stores share a single [rusqlite::Connection] behind an
//! `Arc<Mutex<_>>`, which serializes storage access between concurrent
//! requests.

mod category;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;
