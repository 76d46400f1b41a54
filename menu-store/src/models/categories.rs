use chrono::{DateTime, Utc};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::{PgConnection, Row};

use super::foods::{Food, FoodId};

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
pub struct CategoryId(i64);

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category together with every food it owns, ordered by food id.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithFoods {
    pub category: Category,
    pub foods: Vec<Food>,
}

impl From<Category> for CategoryWithFoods {
    fn from(category: Category) -> Self {
        Self {
            category,
            foods: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct CreateCategoryPayload<'data> {
    pub name: &'data str,
}

impl<'data> CreateCategoryPayload<'data> {
    pub fn new(name: &'data str) -> Self {
        Self { name }
    }
}

impl Category {
    pub async fn create(
        executor: &mut PgConnection,
        create_category_payload: &CreateCategoryPayload<'_>,
    ) -> sqlx::Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING *;
            "#,
        )
        .bind(create_category_payload.name)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    /// Locks the row for the rest of the transaction so the category can't be removed or
    /// renamed underneath the caller.
    pub async fn lock_for_update(
        executor: &mut PgConnection,
        id: CategoryId,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 FOR UPDATE;")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Like [`Category::lock_for_update`], but only blocks deletes and renames. Concurrent
    /// food inserts into the same category still proceed.
    pub async fn lock_for_share(
        executor: &mut PgConnection,
        id: CategoryId,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 FOR SHARE;")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn name_taken(
        executor: &mut PgConnection,
        name: &str,
        except: Option<CategoryId>,
    ) -> sqlx::Result<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            );
            "#,
        )
        .bind(name)
        .bind(except)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    pub async fn rename(
        executor: &mut PgConnection,
        id: CategoryId,
        name: &str,
    ) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *;
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(executor: &mut PgConnection, id: CategoryId) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1;")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Loads every category with its foods in a single statement, so the listing is one
    /// consistent snapshot.
    pub async fn list_with_foods(
        executor: &mut PgConnection,
    ) -> sqlx::Result<Vec<CategoryWithFoods>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id AS category_id,
                c.name AS category_name,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at,
                f.id AS food_id,
                f.name AS food_name,
                f.cost AS food_cost,
                f.created_at AS food_created_at,
                f.updated_at AS food_updated_at
            FROM
                categories c
                LEFT JOIN foods f ON f.category_id = c.id
            ORDER BY
                c.id, f.id;
            "#,
        )
        .fetch_all(executor)
        .await?;

        let mut listing: Vec<CategoryWithFoods> = Vec::new();

        for row in rows {
            let category_id: CategoryId = row.try_get("category_id")?;

            if listing.last().map(|entry| entry.category.id) != Some(category_id) {
                listing.push(CategoryWithFoods::from(Category {
                    id: category_id,
                    name: row.try_get("category_name")?,
                    created_at: row.try_get("category_created_at")?,
                    updated_at: row.try_get("category_updated_at")?,
                }));
            }

            let Some(food_id) = row.try_get::<Option<FoodId>, _>("food_id")? else {
                continue;
            };

            let food = Food {
                id: food_id,
                name: row.try_get("food_name")?,
                cost: row.try_get("food_cost")?,
                category_id,
                created_at: row.try_get("food_created_at")?,
                updated_at: row.try_get("food_updated_at")?,
            };

            if let Some(entry) = listing.last_mut() {
                entry.foods.push(food);
            }
        }

        Ok(listing)
    }
}
