use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::error::{Entity, StoreError};
use crate::models::categories::{Category, CategoryId, CategoryWithFoods, CreateCategoryPayload};
use crate::models::foods::{CreateFoodPayload, Food, FoodId, UpdateFoodPayload};
use crate::{MenuStore, StoreResult};

#[derive(Debug, Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Commits the transaction when the work succeeded and rolls it back otherwise. The original
/// error is always the one returned, even if the rollback itself fails.
async fn finish<T>(tx: Transaction<'_, Postgres>, result: StoreResult<T>) -> StoreResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if e.is_internal() {
                tracing::error!(error = ?e, "Rolling back transaction");
            } else {
                tracing::debug!(error = %e, "Rolling back transaction");
            }

            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = ?rollback_err, "Failed to roll back transaction");
            }

            Err(e)
        }
    }
}

/// Unique violations become conflicts on `name`. Foreign key violations can only come from
/// a category removed between our existence check and the insert.
fn map_write_error(
    err: sqlx::Error,
    entity: Entity,
    name: &str,
    category_id: Option<CategoryId>,
) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::conflict(entity, name);
        }

        if let Some(category_id) = category_id.filter(|_| db_err.is_foreign_key_violation()) {
            return StoreError::not_found(Entity::Category, category_id);
        }
    }

    StoreError::Database(err)
}

async fn insert_category(
    conn: &mut PgConnection,
    payload: &CreateCategoryPayload<'_>,
) -> StoreResult<Category> {
    if Category::name_taken(conn, payload.name, None).await? {
        return Err(StoreError::conflict(Entity::Category, payload.name));
    }

    Category::create(conn, payload)
        .await
        .map_err(|e| map_write_error(e, Entity::Category, payload.name, None))
}

async fn rename_category(
    conn: &mut PgConnection,
    id: CategoryId,
    name: &str,
) -> StoreResult<CategoryWithFoods> {
    Category::lock_for_update(conn, id)
        .await?
        .ok_or_else(|| StoreError::not_found(Entity::Category, id))?;

    if Category::name_taken(conn, name, Some(id)).await? {
        return Err(StoreError::conflict(Entity::Category, name));
    }

    let category = Category::rename(conn, id, name)
        .await
        .map_err(|e| map_write_error(e, Entity::Category, name, None))?;
    let foods = Food::list_for_category(conn, id).await?;

    Ok(CategoryWithFoods { category, foods })
}

async fn cascade_delete(conn: &mut PgConnection, id: CategoryId) -> StoreResult<u64> {
    Category::lock_for_update(conn, id)
        .await?
        .ok_or_else(|| StoreError::not_found(Entity::Category, id))?;

    // Children first. The foreign key cascades too, but the rule must not depend on it.
    let removed_foods = Food::delete_for_category(conn, id).await?;

    if Category::delete(conn, id).await? == 0 {
        return Err(StoreError::not_found(Entity::Category, id));
    }

    Ok(removed_foods)
}

async fn insert_food(conn: &mut PgConnection, payload: &CreateFoodPayload<'_>) -> StoreResult<Food> {
    Category::lock_for_share(conn, payload.category_id)
        .await?
        .ok_or_else(|| StoreError::not_found(Entity::Category, payload.category_id))?;

    Food::create(conn, payload)
        .await
        .map_err(|e| map_write_error(e, Entity::Food, payload.name, Some(payload.category_id)))
}

async fn update_food(
    conn: &mut PgConnection,
    id: FoodId,
    payload: &UpdateFoodPayload<'_>,
) -> StoreResult<Food> {
    let food = if payload.is_empty() {
        Food::find_by_id(conn, id).await?
    } else {
        Food::update(conn, id, payload)
            .await
            .map_err(|e| map_write_error(e, Entity::Food, payload.name.unwrap_or_default(), None))?
    };

    food.ok_or_else(|| StoreError::not_found(Entity::Food, id))
}

impl MenuStore for PgMenuStore {
    #[tracing::instrument(skip(self))]
    async fn create_category(&self, payload: CreateCategoryPayload<'_>) -> StoreResult<Category> {
        let mut tx = self.pool.begin().await?;
        let result = insert_category(&mut tx, &payload).await;
        let category = finish(tx, result).await?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> StoreResult<Vec<CategoryWithFoods>> {
        let mut conn = self.pool.acquire().await?;
        let categories = Category::list_with_foods(&mut conn).await?;
        Ok(categories)
    }

    #[tracing::instrument(skip(self))]
    async fn rename_category(&self, id: CategoryId, name: &str) -> StoreResult<CategoryWithFoods> {
        let mut tx = self.pool.begin().await?;
        let result = rename_category(&mut tx, id, name).await;
        let renamed = finish(tx, result).await?;

        tracing::info!(category_id = %id, "Category renamed");
        Ok(renamed)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let result = cascade_delete(&mut tx, id).await;
        let removed_foods = finish(tx, result).await?;

        tracing::info!(category_id = %id, %removed_foods, "Category deleted");
        Ok(removed_foods)
    }

    #[tracing::instrument(skip(self))]
    async fn create_food(&self, payload: CreateFoodPayload<'_>) -> StoreResult<Food> {
        let mut tx = self.pool.begin().await?;
        let result = insert_food(&mut tx, &payload).await;
        let food = finish(tx, result).await?;

        tracing::info!(food_id = %food.id, category_id = %food.category_id, "Food created");
        Ok(food)
    }

    #[tracing::instrument(skip(self))]
    async fn update_food(&self, id: FoodId, payload: UpdateFoodPayload<'_>) -> StoreResult<Food> {
        let mut tx = self.pool.begin().await?;
        let result = update_food(&mut tx, id, &payload).await;
        let food = finish(tx, result).await?;

        tracing::info!(food_id = %id, "Food updated");
        Ok(food)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_food(&self, id: FoodId) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;

        if Food::delete(&mut conn, id).await? == 0 {
            return Err(StoreError::not_found(Entity::Food, id));
        }

        tracing::info!(food_id = %id, "Food deleted");
        Ok(())
    }
}
