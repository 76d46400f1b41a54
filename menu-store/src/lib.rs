mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod models;
mod postgres;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;

pub use error::{Entity, StoreError};
pub use models::categories::{Category, CategoryId, CategoryWithFoods, CreateCategoryPayload};
pub use models::foods::{CreateFoodPayload, Food, FoodId, UpdateFoodPayload};
pub use postgres::PgMenuStore;

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

/// Transactional access to the menu. Every mutating call either commits as a whole or leaves
/// the store exactly as it found it.
pub trait MenuStore: Clone + Send + Sync + 'static {
    /// Fails with [`StoreError::Conflict`] when a category with the exact same name exists.
    fn create_category(
        &self,
        payload: CreateCategoryPayload<'_>,
    ) -> impl Future<Output = StoreResult<Category>> + Send;

    /// All categories by ascending id, each with its foods by ascending id.
    fn list_categories(&self) -> impl Future<Output = StoreResult<Vec<CategoryWithFoods>>> + Send;

    fn rename_category(
        &self,
        id: CategoryId,
        name: &str,
    ) -> impl Future<Output = StoreResult<CategoryWithFoods>> + Send;

    /// Removes the category's foods and then the category itself in one unit of work.
    /// Returns how many foods went with it.
    fn delete_category(&self, id: CategoryId) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Fails with [`StoreError::NotFound`] for [`Entity::Category`] when the target category
    /// doesn't exist, and with [`StoreError::Conflict`] when the food name is taken.
    fn create_food(
        &self,
        payload: CreateFoodPayload<'_>,
    ) -> impl Future<Output = StoreResult<Food>> + Send;

    fn update_food(
        &self,
        id: FoodId,
        payload: UpdateFoodPayload<'_>,
    ) -> impl Future<Output = StoreResult<Food>> + Send;

    fn delete_food(&self, id: FoodId) -> impl Future<Output = StoreResult<()>> + Send;
}

pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}
