//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{
    auth::JwtKeys,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The state of the REST server.
///
/// The stores are injected at construction time rather than read from a
/// process-wide handle, so each handler only ever sees the resources it was
/// built with.
#[derive(Debug, Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    jwt_keys: JwtKeys,
    category_store: C,
    transaction_store: T,
    user_store: U,
}

impl<C, T, U> AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `jwt_secret` is the secret used to sign and verify the JSON web
    /// tokens that authenticate requests.
    pub fn new(jwt_secret: &str, category_store: C, transaction_store: T, user_store: U) -> Self {
        Self {
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            category_store,
            transaction_store,
            user_store,
        }
    }

    /// The store for managing the user's [categories](crate::models::Category).
    pub fn category_store(&self) -> &C {
        &self.category_store
    }

    /// The store for managing the user's [transactions](crate::models::Transaction).
    pub fn transaction_store(&self) -> &T {
        &self.transaction_store
    }

    /// The store for managing [users](crate::models::User).
    pub fn user_store(&self) -> &U {
        &self.user_store
    }

    /// The keys used for signing and verifying JSON web tokens.
    pub fn jwt_keys(&self) -> &JwtKeys {
        &self.jwt_keys
    }
}

// This impl lets the `Claims` extractor get the JWT keys from the app state.
impl<C, T, U> FromRef<AppState<C, T, U>> for JwtKeys
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        state.jwt_keys.clone()
    }
}
