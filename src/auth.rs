//! Token based authentication: signing in, and the [Claims] extractor that
//! guards every category and transaction route.

use std::fmt::Debug;

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState,
    models::UserID,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// How long a token stays valid after it is issued.
const TOKEN_DURATION: Duration = Duration::hours(24);

/// The keys used for signing and verifying JSON web tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the signing and verification keys from a shared secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

impl Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// The ID of the user the token was issued to.
    pub sub: i64,
}

impl Claims {
    /// The ID of the authenticated user.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let jwt_keys = JwtKeys::from_ref(state);

        let token_data = decode_jwt(bearer.token(), &jwt_keys.decoding_key)?;

        Ok(token_data.claims)
    }
}

/// The credentials a user signs in with.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: email_address::EmailAddress,
    /// Password entered during sign-in.
    pub password: String,
}

/// The errors that may occur while authenticating a request.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The email or password did not match a registered user.
    WrongCredentials,
    /// The token could not be created.
    TokenCreation,
    /// The bearer token was missing, malformed or expired.
    InvalidToken,
    /// An unexpected error occurred while verifying the credentials.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "Wrong credentials"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Handler for sign-in requests.
///
/// On success the response body is the signed token as a JSON string.
///
/// # Errors
///
/// Returns a 401 response when the email does not belong to a registered
/// user or the password does not match. The two cases are deliberately
/// indistinguishable to the client.
pub async fn sign_in<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<String>, AuthError>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state
        .user_store()
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            crate::Error::NotFound => AuthError::WrongCredentials,
            error => {
                tracing::error!("Error looking up user: {error}");
                AuthError::InternalError
            }
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {error}");
            AuthError::InternalError
        })?;

    if !password_is_correct {
        return Err(AuthError::WrongCredentials);
    }

    let token = encode_jwt(user.id(), &state.jwt_keys().encoding_key)?;

    Ok(Json(token))
}

fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        sub: user_id.as_i64(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Error creating token: {error}");
        AuthError::TokenCreation
    })
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}
