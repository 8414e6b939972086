//! Implements a SQLite backed transaction store, including the filtered,
//! sorted and paged listing query.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransaction, Transaction, UserID},
    stores::{TransactionPage, TransactionQuery, TransactionStore},
};

/// The SELECT column list shared by every query that returns transaction
/// rows. The category name is joined in so responses can include it without
/// a second lookup.
const TRANSACTION_COLUMNS: &str = "t.id, t.amount, t.description, t.date, t.type, t.category_id, \
     c.name, t.user_id, t.created_at, t.updated_at";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the
/// [User](crate::models::User) and [Category](crate::models::Category)
/// models, these models must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn get_row(connection: &Connection, id: DatabaseID) -> Result<Transaction, Error> {
        connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" t
                 LEFT JOIN category c ON t.category_id = c.id
                 WHERE t.id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Check that `category_id` refers to a category owned by `user_id`.
    ///
    /// The same check guards both create and update so that a transaction can
    /// never be filed under another user's category, which the foreign key
    /// constraint alone would allow.
    fn check_category_owned(
        connection: &Connection,
        category_id: DatabaseID,
        user_id: UserID,
    ) -> Result<(), Error> {
        connection
            .prepare("SELECT id FROM category WHERE id = :id AND user_id = :user_id")?
            .query_row(
                &[(":id", &category_id), (":user_id", &user_id.as_i64())],
                |row| row.get::<_, DatabaseID>(0),
            )
            .map(|_| ())
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::InvalidCategory,
                error => error.into(),
            })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database and return it with the
    /// joined category name.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::InvalidCategory] if `data.category_id` does not
    /// refer to a category owned by `user_id`, or an [Error::SqlError] if
    /// there is some other SQL error.
    fn create(&self, user_id: UserID, data: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        if let Some(category_id) = data.category_id {
            Self::check_category_owned(&connection, category_id, user_id)?;
        }

        let now = OffsetDateTime::now_utc();
        connection.execute(
            "INSERT INTO \"transaction\"
             (user_id, amount, description, date, type, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                user_id.as_i64(),
                data.amount,
                &data.description,
                data.date,
                data.transaction_type,
                data.category_id,
                now,
                now,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Self::get_row(&connection, id)
    }

    /// Replace the fields of a transaction and return the updated row with
    /// the joined category name.
    ///
    /// The mutation is conditional on both the transaction ID and the owning
    /// user so that a row belonging to another user can never be modified.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::TransactionNotFound] if `transaction_id` does not
    /// refer to a transaction owned by `user_id`, an
    /// [Error::InvalidCategory] if `data.category_id` does not refer to a
    /// category owned by `user_id`, or an [Error::SqlError] if there is some
    /// other SQL error.
    fn update(
        &self,
        transaction_id: DatabaseID,
        user_id: UserID,
        data: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        if let Some(category_id) = data.category_id {
            Self::check_category_owned(&connection, category_id, user_id)?;
        }

        let rows_affected = connection.execute(
            "UPDATE \"transaction\"
             SET amount = ?1, description = ?2, date = ?3, type = ?4, category_id = ?5,
                 updated_at = ?6
             WHERE id = ?7 AND user_id = ?8",
            (
                data.amount,
                &data.description,
                data.date,
                data.transaction_type,
                data.category_id,
                OffsetDateTime::now_utc(),
                transaction_id,
                user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::TransactionNotFound);
        }

        Self::get_row(&connection, transaction_id)
    }

    /// Delete a transaction. The deletion is hard.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::TransactionNotFound] if `transaction_id` does not
    /// refer to a transaction owned by `user_id`, or an [Error::SqlError] if
    /// there is some other SQL error.
    fn delete(&self, transaction_id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (transaction_id, user_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::TransactionNotFound);
        }

        Ok(())
    }

    /// Retrieve the page of transactions described by `query` along with the
    /// count of all matching rows.
    ///
    /// The data query and the count query are built side by side so that
    /// they always apply the same predicates in the same order. The one
    /// deliberate exception is the text search: the data query matches the
    /// description or the joined category name, while the count query
    /// matches the description only, so a term that only hits a category
    /// name returns rows whose count is not reflected in `total`.
    ///
    /// Sorting always appends the row ID as a tiebreak, which makes the
    /// ordering a stable total order and keeps OFFSET pagination consistent
    /// when sort keys collide.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error. A failure in
    /// either query fails the whole request, partial results are never
    /// returned.
    fn query(&self, user_id: UserID, query: &TransactionQuery) -> Result<TransactionPage, Error> {
        let mut where_clauses = vec!["t.user_id = ?".to_string()];
        let mut params = vec![Value::Integer(user_id.as_i64())];
        let mut count_clauses = vec!["user_id = ?".to_string()];
        let mut count_params = vec![Value::Integer(user_id.as_i64())];

        if let Some(term) = &query.search {
            let pattern = format!("%{term}%");
            where_clauses.push("(t.description LIKE ? OR c.name LIKE ?)".to_string());
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern.clone()));
            count_clauses.push("description LIKE ?".to_string());
            count_params.push(Value::Text(pattern));
        }

        if let Some(transaction_type) = query.transaction_type {
            where_clauses.push("t.type = ?".to_string());
            params.push(Value::Text(transaction_type.to_string()));
            count_clauses.push("type = ?".to_string());
            count_params.push(Value::Text(transaction_type.to_string()));
        }

        if let Some(category_id) = query.category_id {
            where_clauses.push("t.category_id = ?".to_string());
            params.push(Value::Integer(category_id));
            count_clauses.push("category_id = ?".to_string());
            count_params.push(Value::Integer(category_id));
        }

        if let Some(start_date) = query.start_date {
            where_clauses.push("t.date >= ?".to_string());
            params.push(Value::Text(start_date.to_string()));
            count_clauses.push("date >= ?".to_string());
            count_params.push(Value::Text(start_date.to_string()));
        }

        if let Some(end_date) = query.end_date {
            where_clauses.push("t.date <= ?".to_string());
            params.push(Value::Text(end_date.to_string()));
            count_clauses.push("date <= ?".to_string());
            count_params.push(Value::Text(end_date.to_string()));
        }

        let data_query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" t
             LEFT JOIN category c ON t.category_id = c.id
             WHERE {}
             ORDER BY {} {order}, t.id {order}
             LIMIT {} OFFSET {}",
            where_clauses.join(" AND "),
            query.sort_by.column(),
            query.limit,
            query.offset(),
            order = query.sort_order.as_sql(),
        );

        let count_query = format!(
            "SELECT COUNT(*) FROM \"transaction\" WHERE {}",
            count_clauses.join(" AND "),
        );

        let connection = self.connection.lock().unwrap();

        let transactions = connection
            .prepare(&data_query)?
            .query_map(params_from_iter(params), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = connection
            .prepare(&count_query)?
            .query_row(params_from_iter(count_params), |row| row.get(0))?;

        Ok(TransactionPage {
            transactions,
            total: total as u64,
        })
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                category_id INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            amount: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            date: row.get(offset + 3)?,
            transaction_type: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
            category_name: row.get(offset + 6)?,
            user_id: UserID::new(row.get(offset + 7)?),
            created_at: row.get(offset + 8)?,
            updated_at: row.get(offset + 9)?,
        })
    }
}

#[cfg(test)]
mod transaction_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        db::initialize,
        models::{
            Category, CategoryName, DatabaseID, NewCategory, NewTransaction, PasswordHash,
            Transaction, TransactionType, UserID,
        },
        stores::{
            CategoryStore, SortBy, SortOrder, TransactionQuery, TransactionStore, UserStore,
            sqlite::{SQLiteCategoryStore, SQLiteUserStore},
        },
    };

    use super::SQLiteTransactionStore;

    struct Fixture {
        store: SQLiteTransactionStore,
        user_store: SQLiteUserStore,
        user_id: UserID,
        category: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let user_store = SQLiteUserStore::new(connection.clone());
        let user = user_store
            .create(
                EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let category_store = SQLiteCategoryStore::new(connection.clone());
        let category = category_store
            .create(
                user.id(),
                NewCategory {
                    name: CategoryName::new_unchecked("Groceries"),
                    description: String::new(),
                    category_type: TransactionType::Expense,
                },
            )
            .unwrap();

        Fixture {
            store: SQLiteTransactionStore::new(connection),
            user_store,
            user_id: user.id(),
            category,
        }
    }

    fn new_transaction(
        amount: f64,
        date: Date,
        transaction_type: TransactionType,
        category_id: Option<DatabaseID>,
    ) -> NewTransaction {
        NewTransaction::new(amount, String::new(), date, transaction_type, category_id).unwrap()
    }

    fn insert(fixture: &Fixture, amount: f64, date: Date) -> Transaction {
        fixture
            .store
            .create(
                fixture.user_id,
                new_transaction(amount, date, TransactionType::Expense, None),
            )
            .unwrap()
    }

    #[test]
    fn create_transaction_joins_the_category_name() {
        let fixture = get_fixture();

        let transaction = fixture
            .store
            .create(
                fixture.user_id,
                NewTransaction::new(
                    50.0,
                    "weekly shop".to_owned(),
                    date!(2025 - 03 - 01),
                    TransactionType::Expense,
                    Some(fixture.category.id),
                )
                .unwrap(),
            )
            .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, 50.0);
        assert_eq!(transaction.description, "weekly shop");
        assert_eq!(transaction.date, date!(2025 - 03 - 01));
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.category_id, Some(fixture.category.id));
        assert_eq!(transaction.category_name, Some("Groceries".to_owned()));
        assert_eq!(transaction.user_id, fixture.user_id);
    }

    #[test]
    fn create_transaction_without_category_has_null_category_name() {
        let fixture = get_fixture();

        let transaction = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        assert_eq!(transaction.category_id, None);
        assert_eq!(transaction.category_name, None);
    }

    #[test]
    fn create_transaction_fails_on_nonexistent_category() {
        let fixture = get_fixture();

        let result = fixture.store.create(
            fixture.user_id,
            new_transaction(
                10.0,
                date!(2025 - 03 - 01),
                TransactionType::Expense,
                Some(fixture.category.id + 123),
            ),
        );

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[test]
    fn create_transaction_fails_on_another_users_category() {
        let fixture = get_fixture();
        let other_user = fixture
            .user_store
            .create(
                EmailAddress::from_str("bar@baz.qux").unwrap(),
                PasswordHash::new_unchecked("hunter3"),
            )
            .unwrap();

        let result = fixture.store.create(
            other_user.id(),
            new_transaction(
                10.0,
                date!(2025 - 03 - 01),
                TransactionType::Expense,
                Some(fixture.category.id),
            ),
        );

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[test]
    fn update_transaction_replaces_fields() {
        let fixture = get_fixture();
        let transaction = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        let updated = fixture
            .store
            .update(
                transaction.id,
                fixture.user_id,
                NewTransaction::new(
                    25.5,
                    "corrected".to_owned(),
                    date!(2025 - 03 - 02),
                    TransactionType::Income,
                    Some(fixture.category.id),
                )
                .unwrap(),
            )
            .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.amount, 25.5);
        assert_eq!(updated.description, "corrected");
        assert_eq!(updated.date, date!(2025 - 03 - 02));
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.category_name, Some("Groceries".to_owned()));
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_transaction_fails_on_missing_row() {
        let fixture = get_fixture();

        let result = fixture.store.update(
            1337,
            fixture.user_id,
            new_transaction(10.0, date!(2025 - 03 - 01), TransactionType::Expense, None),
        );

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn update_transaction_fails_for_wrong_user() {
        let fixture = get_fixture();
        let transaction = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        let result = fixture.store.update(
            transaction.id,
            UserID::new(fixture.user_id.as_i64() + 999),
            new_transaction(99.0, date!(2025 - 03 - 01), TransactionType::Expense, None),
        );

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_transaction_removes_the_row() {
        let fixture = get_fixture();
        let transaction = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        fixture.store.delete(transaction.id, fixture.user_id).unwrap();

        let page = fixture
            .store
            .query(fixture.user_id, &Default::default())
            .unwrap();
        assert_eq!(page.transactions, vec![]);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn delete_transaction_fails_for_wrong_user() {
        let fixture = get_fixture();
        let transaction = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        let result = fixture
            .store
            .delete(transaction.id, UserID::new(fixture.user_id.as_i64() + 999));

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn query_only_returns_the_users_own_transactions() {
        let fixture = get_fixture();
        let other_user = fixture
            .user_store
            .create(
                EmailAddress::from_str("bar@baz.qux").unwrap(),
                PasswordHash::new_unchecked("hunter3"),
            )
            .unwrap();
        fixture
            .store
            .create(
                other_user.id(),
                new_transaction(1.0, date!(2025 - 01 - 01), TransactionType::Expense, None),
            )
            .unwrap();
        let mine = insert(&fixture, 10.0, date!(2025 - 03 - 01));

        let page = fixture
            .store
            .query(fixture.user_id, &Default::default())
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].id, mine.id);
        assert!(
            page.transactions
                .iter()
                .all(|transaction| transaction.user_id == fixture.user_id)
        );
    }

    #[test]
    fn query_filters_by_type() {
        let fixture = get_fixture();
        fixture
            .store
            .create(
                fixture.user_id,
                new_transaction(100.0, date!(2025 - 03 - 01), TransactionType::Income, None),
            )
            .unwrap();
        insert(&fixture, 10.0, date!(2025 - 03 - 02));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    transaction_type: Some(TransactionType::Income),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(
            page.transactions[0].transaction_type,
            TransactionType::Income
        );
    }

    #[test]
    fn query_filters_by_category() {
        let fixture = get_fixture();
        let filed = fixture
            .store
            .create(
                fixture.user_id,
                new_transaction(
                    10.0,
                    date!(2025 - 03 - 01),
                    TransactionType::Expense,
                    Some(fixture.category.id),
                ),
            )
            .unwrap();
        insert(&fixture, 20.0, date!(2025 - 03 - 02));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    category_id: Some(fixture.category.id),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].id, filed.id);
    }

    #[test]
    fn query_date_bounds_are_inclusive() {
        let fixture = get_fixture();
        insert(&fixture, 1.0, date!(2025 - 02 - 28));
        let on_start = insert(&fixture, 2.0, date!(2025 - 03 - 01));
        let in_between = insert(&fixture, 3.0, date!(2025 - 03 - 15));
        let on_end = insert(&fixture, 4.0, date!(2025 - 03 - 31));
        insert(&fixture, 5.0, date!(2025 - 04 - 01));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    start_date: Some(date!(2025 - 03 - 01)),
                    end_date: Some(date!(2025 - 03 - 31)),
                    sort_order: SortOrder::Ascending,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(
            page.transactions.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![on_start.id, in_between.id, on_end.id]
        );
    }

    #[test]
    fn query_search_matches_description_case_insensitively() {
        let fixture = get_fixture();
        fixture
            .store
            .create(
                fixture.user_id,
                NewTransaction::new(
                    4.5,
                    "Morning Coffee".to_owned(),
                    date!(2025 - 03 - 01),
                    TransactionType::Expense,
                    None,
                )
                .unwrap(),
            )
            .unwrap();
        insert(&fixture, 10.0, date!(2025 - 03 - 02));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    search: Some("coffee".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].description, "Morning Coffee");
    }

    #[test]
    fn query_search_matches_category_name_but_total_counts_descriptions_only() {
        let fixture = get_fixture();
        // Matches via the category name only.
        fixture
            .store
            .create(
                fixture.user_id,
                NewTransaction::new(
                    12.0,
                    "weekly shop".to_owned(),
                    date!(2025 - 03 - 01),
                    TransactionType::Expense,
                    Some(fixture.category.id),
                )
                .unwrap(),
            )
            .unwrap();
        // Matches via the description.
        fixture
            .store
            .create(
                fixture.user_id,
                NewTransaction::new(
                    3.0,
                    "groceries top-up".to_owned(),
                    date!(2025 - 03 - 02),
                    TransactionType::Expense,
                    None,
                )
                .unwrap(),
            )
            .unwrap();

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    search: Some("groceries".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        // The rows come from the description-or-category-name match, the
        // total from the description-only count, so they diverge here.
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn query_sorts_by_amount_ascending() {
        let fixture = get_fixture();
        insert(&fixture, 30.0, date!(2025 - 03 - 01));
        insert(&fixture, 10.0, date!(2025 - 03 - 02));
        insert(&fixture, 20.0, date!(2025 - 03 - 03));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    sort_by: SortBy::Amount,
                    sort_order: SortOrder::Ascending,
                    ..Default::default()
                },
            )
            .unwrap();

        let amounts: Vec<f64> = page.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn query_sorts_by_date_descending_by_default() {
        let fixture = get_fixture();
        let oldest = insert(&fixture, 1.0, date!(2025 - 01 - 01));
        let newest = insert(&fixture, 2.0, date!(2025 - 03 - 01));
        let middle = insert(&fixture, 3.0, date!(2025 - 02 - 01));

        let page = fixture
            .store
            .query(fixture.user_id, &Default::default())
            .unwrap();

        assert_eq!(
            page.transactions.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![newest.id, middle.id, oldest.id]
        );
    }

    #[test]
    fn query_concatenated_pages_reproduce_the_full_result_set() {
        let fixture = get_fixture();
        for day in 1..=5 {
            insert(&fixture, day as f64, date!(2025 - 03 - 01) + time::Duration::days(day));
        }

        let limit = 2;
        let full = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    limit: 200,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(full.total, 5);

        let pages = full.total.div_ceil(limit);
        assert_eq!(pages, 3);

        let mut collected = Vec::new();
        for page_number in 1..=pages {
            let page = fixture
                .store
                .query(
                    fixture.user_id,
                    &TransactionQuery {
                        page: page_number,
                        limit,
                        ..Default::default()
                    },
                )
                .unwrap();

            assert_eq!(page.total, 5);
            collected.extend(page.transactions);
        }

        assert_eq!(collected, full.transactions);
    }

    #[test]
    fn query_pagination_is_stable_when_sort_keys_collide() {
        let fixture = get_fixture();
        // All rows share the same date so the sort key alone cannot order
        // them.
        for amount in 1..=6 {
            insert(&fixture, amount as f64, date!(2025 - 03 - 01));
        }

        let mut seen = Vec::new();
        for page_number in 1..=3 {
            let page = fixture
                .store
                .query(
                    fixture.user_id,
                    &TransactionQuery {
                        page: page_number,
                        limit: 2,
                        ..Default::default()
                    },
                )
                .unwrap();
            seen.extend(page.transactions.iter().map(|t| t.id));
        }

        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6, "each row must appear exactly once");
    }

    #[test]
    fn query_clamps_page_zero_to_the_first_page() {
        let fixture = get_fixture();
        insert(&fixture, 1.0, date!(2025 - 03 - 01));

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    page: 0,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.transactions.len(), 1);
    }

    #[test]
    fn query_limits_the_page_size() {
        let fixture = get_fixture();
        for day in 1..=4 {
            insert(&fixture, day as f64, date!(2025 - 03 - 01) + time::Duration::days(day));
        }

        let page = fixture
            .store
            .query(
                fixture.user_id,
                &TransactionQuery {
                    limit: 3,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(page.transactions.len(), 3);
        assert_eq!(page.total, 4);
    }
}
