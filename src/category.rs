//! The API routes for creating, listing, updating and deleting categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{Category, CategoryName, DatabaseID, NewCategory, TransactionType},
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The request body for creating or updating a category.
///
/// All fields are optional at the serde level so that missing fields produce
/// the API's own validation errors instead of a generic deserialization
/// failure. Unknown fields, including attempts to set `user_id`, are
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryData {
    /// The name of the category.
    pub name: Option<String>,
    /// An optional free-text description.
    pub description: Option<String>,
    /// "income" or "expense", defaults to "expense" when absent.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

impl CategoryData {
    /// Validate the request body.
    ///
    /// # Errors
    /// Returns an [Error::EmptyCategoryName] if the name is missing or
    /// empty, or an [Error::InvalidCategoryType] if the type is present but
    /// not "income" or "expense".
    fn into_new_category(self) -> Result<NewCategory, Error> {
        let name = CategoryName::new(self.name.as_deref().unwrap_or_default())?;

        let category_type = match self.category_type.as_deref() {
            None => TransactionType::Expense,
            Some(raw) => raw.parse().map_err(|_| Error::InvalidCategoryType)?,
        };

        Ok(NewCategory {
            name,
            description: self.description.unwrap_or_default(),
            category_type,
        })
    }
}

/// A route handler for listing all of the authenticated user's categories,
/// most recently created first.
pub async fn get_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store()
        .get_by_user(claims.user_id())
        .map(Json)
}

/// A route handler for creating a new category.
///
/// # Errors
///
/// Returns a 400 response on an invalid name or type, or a 409 response if
/// the user already has a category with the same name.
pub async fn create_category<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let new_category = data.into_new_category()?;

    state
        .category_store()
        .create(claims.user_id(), new_category)
        .map(|category| (StatusCode::CREATED, Json(category)))
}

/// A route handler for updating an existing category.
///
/// # Errors
///
/// Returns a 400 response on an invalid name or type, a 404 response if the
/// category does not exist or belongs to another user, or a 409 response if
/// the new name is already taken.
pub async fn update_category<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(category_id): Path<DatabaseID>,
    Json(data): Json<CategoryData>,
) -> Result<Json<Category>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let new_category = data.into_new_category()?;

    state
        .category_store()
        .update(category_id, claims.user_id(), new_category)
        .map(Json)
}

/// A route handler for deleting a category.
///
/// Transactions filed under the category are kept, their category reference
/// is nulled out by the storage layer.
///
/// # Errors
///
/// Returns a 404 response if the category does not exist or belongs to
/// another user.
pub async fn delete_category<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Value>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store()
        .delete(category_id, claims.user_id())?;

    Ok(Json(json!({
        "message": "Category deleted successfully",
    })))
}
