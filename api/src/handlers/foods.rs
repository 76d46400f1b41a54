use menu_store::{
    CategoryId, CreateFoodPayload, Entity, FoodId, MenuStore, StoreError, UpdateFoodPayload,
};

use crate::error::AppError;
use crate::schemas::foods::{FoodCreate, FoodRead, FoodUpdate};

/// A missing category is the client's fault here, so it is a 400 and not a 404.
#[tracing::instrument(skip(store))]
pub async fn add_food<S: MenuStore>(
    store: &S,
    category_id: CategoryId,
    payload: FoodCreate,
) -> Result<FoodRead, AppError> {
    let food = store
        .create_food(CreateFoodPayload::new(
            category_id,
            &payload.name,
            payload.cost,
        ))
        .await
        .map_err(|err| match err {
            StoreError::NotFound {
                entity: Entity::Category,
                ..
            } => AppError::BadRequest(err.to_string()),
            err => err.into(),
        })?;

    Ok(food.into())
}

#[tracing::instrument(skip(store))]
pub async fn update_food<S: MenuStore>(
    store: &S,
    food_id: FoodId,
    payload: FoodUpdate,
) -> Result<FoodRead, AppError> {
    let food = store
        .update_food(
            food_id,
            UpdateFoodPayload::new(payload.name.as_deref(), payload.cost),
        )
        .await?;
    Ok(food.into())
}

#[tracing::instrument(skip(store))]
pub async fn delete_food<S: MenuStore>(store: &S, food_id: FoodId) -> Result<(), AppError> {
    store.delete_food(food_id).await?;
    Ok(())
}
