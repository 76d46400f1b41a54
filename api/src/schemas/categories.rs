use menu_store::{Category, CategoryId, CategoryWithFoods};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::foods::FoodRead;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, message = "category name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, message = "category name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct CategoryRead {
    pub id: CategoryId,
    pub name: String,
    pub foods: Vec<FoodRead>,
}

impl From<Category> for CategoryRead {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            foods: Vec::new(),
        }
    }
}

impl From<CategoryWithFoods> for CategoryRead {
    fn from(CategoryWithFoods { category, foods }: CategoryWithFoods) -> Self {
        Self {
            id: category.id,
            name: category.name,
            foods: foods.into_iter().map(FoodRead::from).collect(),
        }
    }
}
