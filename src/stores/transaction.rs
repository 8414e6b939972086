//! Defines the transaction store trait and the types that describe how
//! transactions should be filtered, sorted and paged.

use std::str::FromStr;

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, UserID},
};

/// The page size used when a listing request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// The largest page size a listing request may ask for.
///
/// Requests asking for more are clamped rather than rejected so that an
/// oversized `limit` cannot produce an unbounded result set.
pub const MAX_PAGE_SIZE: u64 = 200;

/// Handles the creation, retrieval and mutation of transactions.
///
/// Every operation is scoped to the owning user: a row that exists but
/// belongs to another user behaves exactly like a row that does not exist.
pub trait TransactionStore {
    /// Create a new transaction owned by `user_id` and return it with the
    /// joined category name.
    ///
    /// # Errors
    /// Returns an [Error::InvalidCategory] if `data.category_id` does not
    /// refer to a category owned by `user_id`.
    fn create(&self, user_id: UserID, data: NewTransaction) -> Result<Transaction, Error>;

    /// Replace the fields of the transaction `transaction_id` and return the
    /// updated row with the joined category name.
    ///
    /// # Errors
    /// Returns an [Error::TransactionNotFound] if `transaction_id` does not
    /// refer to a transaction owned by `user_id`, or an
    /// [Error::InvalidCategory] if `data.category_id` does not refer to a
    /// category owned by `user_id`.
    fn update(
        &self,
        transaction_id: DatabaseID,
        user_id: UserID,
        data: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction `transaction_id`. The deletion is hard, there
    /// is no tombstone to recover from.
    ///
    /// # Errors
    /// Returns an [Error::TransactionNotFound] if `transaction_id` does not
    /// refer to a transaction owned by `user_id`.
    fn delete(&self, transaction_id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Retrieve the page of transactions described by `query` along with the
    /// total number of matching rows.
    fn query(&self, user_id: UserID, query: &TransactionQuery) -> Result<TransactionPage, Error>;
}

/// The column to sort listed transactions by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Sort by the transaction's calendar date.
    #[default]
    Date,
    /// Sort by the transaction's amount.
    Amount,
    /// Sort by when the transaction row was created.
    CreatedAt,
}

impl SortBy {
    /// The column expression to use in an ORDER BY clause.
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::Date => "t.date",
            SortBy::Amount => "t.amount",
            SortBy::CreatedAt => "t.created_at",
        }
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortBy::Date),
            "amount" => Ok(SortBy::Amount),
            "created_at" => Ok(SortBy::CreatedAt),
            _ => Err(Error::InvalidSortBy),
        }
    }
}

/// The order to sort listed transactions in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    Descending,
}

impl SortOrder {
    /// The keyword to use in an ORDER BY clause.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(Error::InvalidSortOrder),
        }
    }
}

/// Defines how transactions should be fetched from [TransactionStore::query].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Case-insensitive substring to match against the transaction
    /// description or the joined category name.
    pub search: Option<String>,
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions filed under this category.
    pub category_id: Option<DatabaseID>,
    /// Only include transactions dated on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions dated on or before this date.
    pub end_date: Option<Date>,
    /// The column to sort by.
    pub sort_by: SortBy,
    /// The order to sort in.
    pub sort_order: SortOrder,
    /// The 1-based page number.
    pub page: u64,
    /// The number of transactions per page.
    pub limit: u64,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            search: None,
            transaction_type: None,
            category_id: None,
            start_date: None,
            end_date: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TransactionQuery {
    /// The number of rows to skip for the requested page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }
}

/// A page of transactions along with the total number of rows matching the
/// query's filters, ignoring pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
    /// The count of all matching rows.
    pub total: u64,
}
