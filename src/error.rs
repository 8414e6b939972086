//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A string other than "income" or "expense" was used as a category type.
    #[error("invalid category type")]
    InvalidCategoryType,

    /// The category name is already in use by another category of the same
    /// user. Category names are only unique per user, different users may
    /// reuse the same name.
    #[error("the category name is already in use")]
    DuplicateCategoryName,

    /// There was no category owned by the requesting user with the given ID.
    ///
    /// This error is also returned when the category exists but belongs to
    /// another user, so that clients cannot probe for other users' data.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// A transaction was created or updated without an amount, date or type.
    #[error("a required transaction field is missing")]
    MissingTransactionFields,

    /// A string other than "income" or "expense" was used as a transaction
    /// type.
    #[error("invalid transaction type")]
    InvalidTransactionType,

    /// A zero or negative amount was used to create or update a transaction.
    #[error("transaction amounts must be greater than zero")]
    NonPositiveAmount,

    /// The category ID on a transaction does not refer to a category owned by
    /// the requesting user.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// There was no transaction owned by the requesting user with the given
    /// ID.
    ///
    /// This error is also returned when the transaction exists but belongs to
    /// another user, so that clients cannot probe for other users' data.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// A value outside of "date", "amount" and "created_at" was used as the
    /// sort column for listing transactions.
    #[error("invalid sort_by parameter")]
    InvalidSortBy,

    /// A value other than "asc" or "desc" was used as the sort order for
    /// listing transactions.
    #[error("invalid sort_order parameter")]
    InvalidSortOrder,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// it must not be sent to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to create a user is already registered.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows. The
    /// stores translate it into the resource specific not-found variants
    /// where the resource is known.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                "Category name is required".to_owned(),
            ),
            Error::InvalidCategoryType => (
                StatusCode::BAD_REQUEST,
                "Category type must be income or expense".to_owned(),
            ),
            Error::DuplicateCategoryName => (
                StatusCode::CONFLICT,
                "Category name already exists".to_owned(),
            ),
            Error::CategoryNotFound => (StatusCode::NOT_FOUND, "Category not found".to_owned()),
            Error::MissingTransactionFields => (
                StatusCode::BAD_REQUEST,
                "Amount, date, and type are required".to_owned(),
            ),
            Error::InvalidTransactionType => (
                StatusCode::BAD_REQUEST,
                "Type must be income or expense".to_owned(),
            ),
            Error::NonPositiveAmount => (
                StatusCode::BAD_REQUEST,
                "Amount must be greater than 0".to_owned(),
            ),
            Error::InvalidCategory => (StatusCode::BAD_REQUEST, "Invalid category".to_owned()),
            Error::TransactionNotFound => {
                (StatusCode::NOT_FOUND, "Transaction not found".to_owned())
            }
            Error::InvalidSortBy => (
                StatusCode::BAD_REQUEST,
                "Invalid sort_by parameter".to_owned(),
            ),
            Error::InvalidSortOrder => (
                StatusCode::BAD_REQUEST,
                "Invalid sort_order parameter".to_owned(),
            ),
            Error::TooWeak(feedback) => (
                StatusCode::BAD_REQUEST,
                format!("Password is too weak: {feedback}"),
            ),
            Error::DuplicateEmail => (StatusCode::CONFLICT, "Email already in use".to_owned()),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_owned())
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status_code, body).into_response()
    }
}
