//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, NewCategory, UserID},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn get_row(connection: &Connection, id: DatabaseID) -> Result<Category, Error> {
        connection
            .prepare(
                "SELECT id, user_id, name, description, type, created_at, updated_at
                 FROM category WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateCategoryName] if `user_id` already has a
    /// category named `data.name`, or an [Error::SqlError] if there is some
    /// other SQL error.
    fn create(&self, user_id: UserID, data: NewCategory) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO category (user_id, name, description, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                user_id.as_i64(),
                data.name.as_ref(),
                &data.description,
                data.category_type,
                now,
                now,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Self::get_row(&connection, id)
    }

    /// Replace the name, description and type of a category.
    ///
    /// The mutation is conditional on both the category ID and the owning
    /// user so that a row belonging to another user can never be modified,
    /// even if it was created between the ownership check and the update.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::CategoryNotFound] if `category_id` does not refer
    /// to a category owned by `user_id`, an [Error::DuplicateCategoryName]
    /// if the new name is taken, or an [Error::SqlError] if there is some
    /// other SQL error.
    fn update(
        &self,
        category_id: DatabaseID,
        user_id: UserID,
        data: NewCategory,
    ) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        let rows_affected = connection.execute(
            "UPDATE category SET name = ?1, description = ?2, type = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                data.name.as_ref(),
                &data.description,
                data.category_type,
                OffsetDateTime::now_utc(),
                category_id,
                user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::CategoryNotFound);
        }

        Self::get_row(&connection, category_id)
    }

    /// Delete a category.
    ///
    /// Transactions referencing the category keep their other fields and get
    /// their category reference nulled out by the foreign key's
    /// `ON DELETE SET NULL` action.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::CategoryNotFound] if `category_id` does not refer
    /// to a category owned by `user_id`, or an [Error::SqlError] if there is
    /// some other SQL error.
    fn delete(&self, category_id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::CategoryNotFound);
        }

        Ok(())
    }

    /// Retrieve all categories owned by `user_id`, most recently created
    /// first.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, description, type, created_at, updated_at
                 FROM category WHERE user_id = :user_id
                 ORDER BY created_at DESC, id DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, name)
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Category {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            name: CategoryName::new_unchecked(&row.get::<_, String>(offset + 2)?),
            description: row.get(offset + 3)?,
            category_type: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
            updated_at: row.get(offset + 6)?,
        })
    }
}
