//! In-memory [`MenuStore`] for tests.
//!
//! Every operation runs against a staged copy of the tables, and the copy only replaces the
//! live tables when the whole operation succeeded. That gives the same all-or-nothing
//! behaviour as a database transaction.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::{Entity, StoreError};
use crate::models::categories::{Category, CategoryId, CategoryWithFoods, CreateCategoryPayload};
use crate::models::foods::{CreateFoodPayload, Food, FoodId, UpdateFoodPayload};
use crate::{MenuStore, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryMenuStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    fail_category_deletes: bool,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    foods: BTreeMap<FoodId, Food>,
    last_category_id: i64,
    last_food_id: i64,
}

impl Tables {
    fn category_name_taken(&self, name: &str, except: Option<CategoryId>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn food_name_taken(&self, name: &str, except: Option<FoodId>) -> bool {
        self.foods
            .values()
            .any(|f| f.name == name && Some(f.id) != except)
    }

    fn foods_of(&self, category_id: CategoryId) -> Vec<Food> {
        self.foods
            .values()
            .filter(|f| f.category_id == category_id)
            .cloned()
            .collect()
    }
}

impl MemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later category delete fail after its foods were removed but before the
    /// category row is, like a connection dropping halfway through the transaction.
    pub fn fail_category_deletes(&self) {
        match self.inner.lock() {
            Ok(mut inner) => inner.fail_category_deletes = true,
            Err(poisoned) => poisoned.into_inner().fail_category_deletes = true,
        }
    }

    /// Number of food rows, including any that a listing could no longer reach.
    pub fn food_count(&self) -> usize {
        match self.inner.lock() {
            Ok(inner) => inner.tables.foods.len(),
            Err(poisoned) => poisoned.into_inner().tables.foods.len(),
        }
    }

    fn unit_of_work<T>(
        &self,
        work: impl FnOnce(&mut Tables, bool) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".to_string()))?;

        let mut staged = inner.tables.clone();
        let value = work(&mut staged, inner.fail_category_deletes)?;
        inner.tables = staged;

        Ok(value)
    }
}

impl MenuStore for MemoryMenuStore {
    async fn create_category(&self, payload: CreateCategoryPayload<'_>) -> StoreResult<Category> {
        self.unit_of_work(|tables, _| {
            if tables.category_name_taken(payload.name, None) {
                return Err(StoreError::conflict(Entity::Category, payload.name));
            }

            tables.last_category_id += 1;
            let now = Utc::now();
            let category = Category {
                id: CategoryId::from(tables.last_category_id),
                name: payload.name.to_string(),
                created_at: now,
                updated_at: now,
            };

            tables.categories.insert(category.id, category.clone());
            Ok(category)
        })
    }

    async fn list_categories(&self) -> StoreResult<Vec<CategoryWithFoods>> {
        self.unit_of_work(|tables, _| {
            let listing = tables
                .categories
                .values()
                .map(|category| CategoryWithFoods {
                    category: category.clone(),
                    foods: tables.foods_of(category.id),
                })
                .collect();

            Ok(listing)
        })
    }

    async fn rename_category(&self, id: CategoryId, name: &str) -> StoreResult<CategoryWithFoods> {
        self.unit_of_work(|tables, _| {
            if !tables.categories.contains_key(&id) {
                return Err(StoreError::not_found(Entity::Category, id));
            }

            if tables.category_name_taken(name, Some(id)) {
                return Err(StoreError::conflict(Entity::Category, name));
            }

            let foods = tables.foods_of(id);
            let category = tables
                .categories
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found(Entity::Category, id))?;
            category.name = name.to_string();
            category.updated_at = Utc::now();

            Ok(CategoryWithFoods {
                category: category.clone(),
                foods,
            })
        })
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<u64> {
        self.unit_of_work(|tables, fail_category_deletes| {
            if !tables.categories.contains_key(&id) {
                return Err(StoreError::not_found(Entity::Category, id));
            }

            let before = tables.foods.len();
            tables.foods.retain(|_, food| food.category_id != id);
            let removed_foods = (before - tables.foods.len()) as u64;

            if fail_category_deletes {
                return Err(StoreError::Storage(format!(
                    "lost connection while deleting category {id}"
                )));
            }

            tables.categories.remove(&id);
            Ok(removed_foods)
        })
    }

    async fn create_food(&self, payload: CreateFoodPayload<'_>) -> StoreResult<Food> {
        self.unit_of_work(|tables, _| {
            if !tables.categories.contains_key(&payload.category_id) {
                return Err(StoreError::not_found(Entity::Category, payload.category_id));
            }

            if tables.food_name_taken(payload.name, None) {
                return Err(StoreError::conflict(Entity::Food, payload.name));
            }

            tables.last_food_id += 1;
            let now = Utc::now();
            let food = Food {
                id: FoodId::from(tables.last_food_id),
                name: payload.name.to_string(),
                cost: payload.cost,
                category_id: payload.category_id,
                created_at: now,
                updated_at: now,
            };

            tables.foods.insert(food.id, food.clone());
            Ok(food)
        })
    }

    async fn update_food(&self, id: FoodId, payload: UpdateFoodPayload<'_>) -> StoreResult<Food> {
        self.unit_of_work(|tables, _| {
            if !tables.foods.contains_key(&id) {
                return Err(StoreError::not_found(Entity::Food, id));
            }

            if let Some(name) = payload.name {
                if tables.food_name_taken(name, Some(id)) {
                    return Err(StoreError::conflict(Entity::Food, name));
                }
            }

            let food = tables
                .foods
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found(Entity::Food, id))?;

            if payload.is_empty() {
                return Ok(food.clone());
            }

            if let Some(name) = payload.name {
                food.name = name.to_string();
            }
            if let Some(cost) = payload.cost {
                food.cost = cost;
            }
            food.updated_at = Utc::now();

            Ok(food.clone())
        })
    }

    async fn delete_food(&self, id: FoodId) -> StoreResult<()> {
        self.unit_of_work(|tables, _| {
            tables
                .foods
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found(Entity::Food, id))
        })
    }
}
