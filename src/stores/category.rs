//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, DatabaseID, NewCategory, UserID},
};

/// Creates and retrieves the categories used to classify transactions.
///
/// Every operation is scoped to the owning user: a row that exists but
/// belongs to another user behaves exactly like a row that does not exist.
pub trait CategoryStore {
    /// Create a new category owned by `user_id` and add it to the store.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateCategoryName] if the user already has a
    /// category with the same name.
    fn create(&self, user_id: UserID, data: NewCategory) -> Result<Category, Error>;

    /// Replace the name, description and type of the category `category_id`.
    ///
    /// # Errors
    /// Returns an [Error::CategoryNotFound] if `category_id` does not refer
    /// to a category owned by `user_id`, or an
    /// [Error::DuplicateCategoryName] if the new name is already taken.
    fn update(
        &self,
        category_id: DatabaseID,
        user_id: UserID,
        data: NewCategory,
    ) -> Result<Category, Error>;

    /// Delete the category `category_id`.
    ///
    /// Transactions referencing the category are kept and their category
    /// reference is nulled out by the storage layer.
    ///
    /// # Errors
    /// Returns an [Error::CategoryNotFound] if `category_id` does not refer
    /// to a category owned by `user_id`.
    fn delete(&self, category_id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Get all categories owned by `user_id`, most recently created first.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error>;
}
