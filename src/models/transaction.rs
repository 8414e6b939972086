//! This file defines the `Transaction` type, the core type of the expense
//! tracking part of the application, along with the `TransactionType`
//! enumeration shared with categories.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, models::{DatabaseID, UserID}};

/// Whether money was earned (income) or spent (expense).
///
/// Both transactions and categories carry this marker, the two-element
/// enumeration is shared between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money flowing in, e.g. wages.
    Income,
    /// Money flowing out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase string form used in the database and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The `category_name` field is denormalized from the joined category row so
/// that API responses can show the category without a second lookup. It is
/// `None` when the transaction is uncategorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The amount of money spent or earned, always greater than zero. The
    /// direction of the cash flow is given by `type`, not by the sign.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The calendar date the transaction happened on.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction is filed under, if any.
    pub category_id: Option<DatabaseID>,
    /// The name of the category the transaction is filed under, if any.
    pub category_name: Option<String>,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// When the transaction row was created.
    pub created_at: OffsetDateTime,
    /// When the transaction row was last modified.
    pub updated_at: OffsetDateTime,
}

/// The validated data for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned, greater than zero.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The calendar date the transaction happened on.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
    /// The ID of the category to file the transaction under, if any.
    pub category_id: Option<DatabaseID>,
}

impl NewTransaction {
    /// Create and validate the data for a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(
        amount: f64,
        description: String,
        date: Date,
        transaction_type: TransactionType,
        category_id: Option<DatabaseID>,
    ) -> Result<Self, Error> {
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        Ok(Self {
            amount,
            description,
            date,
            transaction_type,
            category_id,
        })
    }
}
