use menu_store::{CategoryId, Food, FoodId};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 1, message = "food name must not be empty"))]
    pub name: String,
    pub cost: f64,
}

/// Partial update; absent fields are left as stored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FoodUpdate {
    #[validate(length(min = 1, message = "food name must not be empty"))]
    pub name: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct FoodRead {
    pub id: FoodId,
    pub name: String,
    pub cost: f64,
    pub category_id: CategoryId,
}

impl From<Food> for FoodRead {
    fn from(food: Food) -> Self {
        Self {
            id: food.id,
            name: food.name,
            cost: food.cost,
            category_id: food.category_id,
        }
    }
}
