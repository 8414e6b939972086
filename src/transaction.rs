//! The API routes for creating, listing, updating and deleting transactions.
//!
//! The listing route is the most involved: it translates the request's
//! filter, sort and pagination parameters into a [TransactionQuery] and
//! wraps the resulting page in a pagination envelope.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Date;

use crate::{
    AppState, Error,
    auth::Claims,
    models::{DatabaseID, NewTransaction, Transaction},
    stores::{
        CategoryStore, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, TransactionQuery, TransactionStore,
        UserStore,
    },
};

/// The request body for creating or updating a transaction.
///
/// All fields are optional at the serde level so that missing fields produce
/// the API's own validation errors instead of a generic deserialization
/// failure. Unknown fields, including attempts to set `user_id`, are
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionData {
    /// The amount of money spent or earned, must be greater than zero.
    pub amount: Option<f64>,
    /// A free-text description of the transaction.
    pub description: Option<String>,
    /// The calendar date the transaction happened on.
    pub date: Option<Date>,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The ID of the category to file the transaction under.
    pub category_id: Option<DatabaseID>,
}

impl TransactionData {
    /// Validate the request body.
    ///
    /// # Errors
    /// Returns an [Error::MissingTransactionFields] if the amount, date or
    /// type is absent, an [Error::InvalidTransactionType] if the type is not
    /// "income" or "expense", or an [Error::NonPositiveAmount] if the amount
    /// is zero or negative.
    fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let amount = self.amount.ok_or(Error::MissingTransactionFields)?;
        let date = self.date.ok_or(Error::MissingTransactionFields)?;
        let transaction_type = self
            .transaction_type
            .ok_or(Error::MissingTransactionFields)?
            .parse()?;

        NewTransaction::new(
            amount,
            self.description.unwrap_or_default(),
            date,
            transaction_type,
            self.category_id,
        )
    }
}

/// The query parameters accepted by the transaction listing route.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    /// Substring to search for in the description or category name.
    pub q: Option<String>,
    /// Only return transactions of this type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only return transactions filed under this category.
    pub category_id: Option<DatabaseID>,
    /// Only return transactions dated on or after this date.
    pub start_date: Option<Date>,
    /// Only return transactions dated on or before this date.
    pub end_date: Option<Date>,
    /// The column to sort by: "date", "amount" or "created_at".
    pub sort_by: Option<String>,
    /// The order to sort in: "asc" or "desc".
    pub sort_order: Option<String>,
    /// The 1-based page number.
    pub page: Option<i64>,
    /// The number of transactions per page.
    pub limit: Option<u64>,
}

impl TransactionListParams {
    /// Validate the parameters and build the query to run against the store.
    ///
    /// The sort parameters are strictly validated and reject the request
    /// before any storage access. The type filter is looser: a value outside
    /// the enumeration is silently dropped rather than rejected, so such a
    /// request returns the unfiltered listing. Page numbers below one are
    /// clamped to the first page and the page size is capped at
    /// [MAX_PAGE_SIZE].
    ///
    /// # Errors
    /// Returns an [Error::InvalidSortBy] or [Error::InvalidSortOrder] if the
    /// corresponding parameter is present but not in its enumeration.
    fn into_query(self) -> Result<TransactionQuery, Error> {
        let sort_by = match self.sort_by.as_deref() {
            None => Default::default(),
            Some(raw) => raw.parse()?,
        };

        let sort_order = match self.sort_order.as_deref() {
            None => Default::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(TransactionQuery {
            search: self.q.filter(|term| !term.is_empty()),
            transaction_type: self
                .transaction_type
                .and_then(|raw| raw.parse().ok()),
            category_id: self.category_id,
            start_date: self.start_date,
            end_date: self.end_date,
            sort_by,
            sort_order,
            page: self.page.unwrap_or(1).max(1) as u64,
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        })
    }
}

/// The pagination metadata returned alongside a page of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The 1-based page number that was returned.
    pub page: u64,
    /// The page size that was applied.
    pub limit: u64,
    /// The count of all rows matching the filters, ignoring pagination.
    pub total: u64,
    /// The number of pages needed to show `total` rows.
    pub pages: u64,
}

/// The response body of the transaction listing route.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
    /// The pagination envelope.
    pub pagination: Pagination,
}

/// A route handler for listing the authenticated user's transactions with
/// filtering, sorting and pagination.
///
/// # Errors
///
/// Returns a 400 response if `sort_by` or `sort_order` is invalid. No
/// storage access happens in that case.
pub async fn get_transactions<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<TransactionListResponse>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let query = params.into_query()?;

    let page = state.transaction_store().query(claims.user_id(), &query)?;

    Ok(Json(TransactionListResponse {
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total: page.total,
            pages: page.total.div_ceil(query.limit),
        },
        transactions: page.transactions,
    }))
}

/// A route handler for creating a new transaction.
///
/// The created row is returned with the joined category name.
///
/// # Errors
///
/// Returns a 400 response if a required field is missing or invalid, or if
/// `category_id` does not refer to one of the caller's categories.
pub async fn create_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let new_transaction = data.into_new_transaction()?;

    state
        .transaction_store()
        .create(claims.user_id(), new_transaction)
        .map(|transaction| (StatusCode::CREATED, Json(transaction)))
}

/// A route handler for updating an existing transaction.
///
/// The updated row is returned with the joined category name.
///
/// # Errors
///
/// Returns a 400 response if a required field is missing or invalid, or a
/// 404 response if the transaction does not exist or belongs to another
/// user.
pub async fn update_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let new_transaction = data.into_new_transaction()?;

    state
        .transaction_store()
        .update(transaction_id, claims.user_id(), new_transaction)
        .map(Json)
}

/// A route handler for deleting a transaction. The deletion is hard.
///
/// # Errors
///
/// Returns a 404 response if the transaction does not exist or belongs to
/// another user.
pub async fn delete_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .transaction_store()
        .delete(transaction_id, claims.user_id())?;

    Ok(Json(json!({
        "message": "Transaction deleted successfully",
    })))
}
