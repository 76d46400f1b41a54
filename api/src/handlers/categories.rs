use menu_store::{CategoryId, CreateCategoryPayload, MenuStore};

use crate::error::AppError;
use crate::schemas::categories::{CategoryCreate, CategoryRead, CategoryUpdate};

#[tracing::instrument(skip(store))]
pub async fn add_category<S: MenuStore>(
    store: &S,
    payload: CategoryCreate,
) -> Result<CategoryRead, AppError> {
    let category = store
        .create_category(CreateCategoryPayload::new(&payload.name))
        .await?;
    Ok(category.into())
}

#[tracing::instrument(skip_all)]
pub async fn show_categories<S: MenuStore>(store: &S) -> Result<Vec<CategoryRead>, AppError> {
    let categories = store.list_categories().await?;
    Ok(categories.into_iter().map(CategoryRead::from).collect())
}

#[tracing::instrument(skip(store))]
pub async fn rename_category<S: MenuStore>(
    store: &S,
    category_id: CategoryId,
    payload: CategoryUpdate,
) -> Result<CategoryRead, AppError> {
    let category = store.rename_category(category_id, &payload.name).await?;
    Ok(category.into())
}

#[tracing::instrument(skip(store))]
pub async fn delete_category<S: MenuStore>(
    store: &S,
    category_id: CategoryId,
) -> Result<(), AppError> {
    let removed_foods = store.delete_category(category_id).await?;
    tracing::debug!(%removed_foods, "Cascade removed foods");
    Ok(())
}
