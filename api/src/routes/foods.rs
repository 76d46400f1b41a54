use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::put;
use axum::{Json, Router};
use menu_store::{FoodId, MenuStore};

use crate::AppState;
use crate::error::AppError;
use crate::extractors::{ValidId, ValidatedJson};
use crate::handlers;
use crate::schemas::foods::{FoodRead, FoodUpdate};

pub fn food_routes<S: MenuStore>() -> Router<AppState<S>> {
    Router::new().route(
        "/{food_id}",
        put(update_food::<S>).delete(delete_food::<S>),
    )
}

async fn update_food<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidId(food_id): ValidId<FoodId>,
    ValidatedJson(payload): ValidatedJson<FoodUpdate>,
) -> Result<Json<FoodRead>, AppError> {
    let food = handlers::foods::update_food(&state.store, food_id, payload).await?;
    Ok(Json(food))
}

async fn delete_food<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidId(food_id): ValidId<FoodId>,
) -> Result<StatusCode, AppError> {
    handlers::foods::delete_food(&state.store, food_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
