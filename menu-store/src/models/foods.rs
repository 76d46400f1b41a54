use chrono::{DateTime, Utc};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;

use super::categories::CategoryId;

#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct FoodId(i64);

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub cost: f64,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreateFoodPayload<'data> {
    pub category_id: CategoryId,
    pub name: &'data str,
    pub cost: f64,
}

impl<'data> CreateFoodPayload<'data> {
    pub fn new(category_id: CategoryId, name: &'data str, cost: f64) -> Self {
        Self {
            category_id,
            name,
            cost,
        }
    }
}

/// Partial update. `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateFoodPayload<'data> {
    pub name: Option<&'data str>,
    pub cost: Option<f64>,
}

impl<'data> UpdateFoodPayload<'data> {
    pub fn new(name: Option<&'data str>, cost: Option<f64>) -> Self {
        Self { name, cost }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cost.is_none()
    }
}

impl Food {
    pub async fn create(
        executor: &mut PgConnection,
        create_food_payload: &CreateFoodPayload<'_>,
    ) -> sqlx::Result<Food> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods (name, cost, category_id)
            VALUES ($1, $2, $3)
            RETURNING *;
            "#,
        )
        .bind(create_food_payload.name)
        .bind(create_food_payload.cost)
        .bind(create_food_payload.category_id)
        .fetch_one(executor)
        .await?;

        Ok(food)
    }

    pub async fn find_by_id(executor: &mut PgConnection, id: FoodId) -> sqlx::Result<Option<Food>> {
        sqlx::query_as::<_, Food>("SELECT * FROM foods WHERE id = $1;")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_for_category(
        executor: &mut PgConnection,
        category_id: CategoryId,
    ) -> sqlx::Result<Vec<Food>> {
        sqlx::query_as::<_, Food>("SELECT * FROM foods WHERE category_id = $1 ORDER BY id;")
            .bind(category_id)
            .fetch_all(executor)
            .await
    }

    pub async fn update(
        executor: &mut PgConnection,
        id: FoodId,
        update_food_payload: &UpdateFoodPayload<'_>,
    ) -> sqlx::Result<Option<Food>> {
        sqlx::query_as::<_, Food>(
            r#"
            UPDATE foods
            SET
                name = COALESCE($2, name),
                cost = COALESCE($3, cost),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *;
            "#,
        )
        .bind(id)
        .bind(update_food_payload.name)
        .bind(update_food_payload.cost)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete(executor: &mut PgConnection, id: FoodId) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1;")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_for_category(
        executor: &mut PgConnection,
        category_id: CategoryId,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM foods WHERE category_id = $1;")
            .bind(category_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
