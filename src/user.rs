//! The API route for registering a new user.

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    models::{PasswordHash, User},
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    /// The email to register with, used to sign in.
    pub email: EmailAddress,
    /// The password to register with.
    pub password: String,
}

/// A route handler for registering a new user.
///
/// The password is checked for strength and stored as a salted bcrypt hash.
/// The response never contains the password hash.
///
/// # Errors
///
/// Returns a 400 response if the password is too weak, a 409 response if the
/// email is already registered, or a 500 response on an unexpected error.
pub async fn create_user<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<User>), Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let password_hash = PasswordHash::from_raw_password(&data.password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store().create(data.email, password_hash)?;

    Ok((StatusCode::CREATED, Json(user)))
}
