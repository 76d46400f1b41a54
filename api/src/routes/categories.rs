use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use menu_store::{CategoryId, MenuStore};

use crate::AppState;
use crate::error::AppError;
use crate::extractors::{ValidId, ValidatedJson};
use crate::handlers;
use crate::schemas::categories::{CategoryCreate, CategoryRead, CategoryUpdate};
use crate::schemas::foods::{FoodCreate, FoodRead};

pub fn category_routes<S: MenuStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/add", post(add_category::<S>))
        .route("/show", get(show_categories::<S>))
        .route(
            "/{category_id}",
            put(rename_category::<S>).delete(delete_category::<S>),
        )
        .route("/{category_id}/foods", post(add_food::<S>))
}

async fn add_category<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidatedJson(payload): ValidatedJson<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryRead>), AppError> {
    let category = handlers::categories::add_category(&state.store, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn show_categories<S: MenuStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<CategoryRead>>, AppError> {
    let categories = handlers::categories::show_categories(&state.store).await?;
    Ok(Json(categories))
}

async fn rename_category<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidId(category_id): ValidId<CategoryId>,
    ValidatedJson(payload): ValidatedJson<CategoryUpdate>,
) -> Result<Json<CategoryRead>, AppError> {
    let category =
        handlers::categories::rename_category(&state.store, category_id, payload).await?;
    Ok(Json(category))
}

async fn delete_category<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidId(category_id): ValidId<CategoryId>,
) -> Result<StatusCode, AppError> {
    handlers::categories::delete_category(&state.store, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_food<S: MenuStore>(
    State(state): State<AppState<S>>,
    ValidId(category_id): ValidId<CategoryId>,
    ValidatedJson(payload): ValidatedJson<FoodCreate>,
) -> Result<(StatusCode, Json<FoodRead>), AppError> {
    let food = handlers::foods::add_food(&state.store, category_id, payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorBody;
    use crate::routes::test_support::{json, send, test_app};

    async fn create_category(app: &Router, name: &str) -> CategoryRead {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/categories/add",
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json(&body)
    }

    async fn list(app: &Router) -> Vec<CategoryRead> {
        let (status, body) = send(app, Method::GET, "/api/categories/show", None).await;
        assert_eq!(status, StatusCode::OK);
        json(&body)
    }

    #[tokio::test]
    async fn created_category_is_listed_without_foods() {
        let (app, _) = test_app();

        let created = create_category(&app, "Drinks").await;
        assert_eq!(created.name, "Drinks");
        assert!(created.foods.is_empty());

        assert_eq!(list(&app).await, vec![created]);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (app, _) = test_app();
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_category_is_a_conflict() {
        let (app, _) = test_app();
        create_category(&app, "Drinks").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/categories/add",
            Some(json!({ "name": "Drinks" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json::<ErrorBody>(&body).status, 409);

        let drinks = list(&app)
            .await
            .into_iter()
            .filter(|c| c.name == "Drinks")
            .count();
        assert_eq!(drinks, 1);
    }

    #[tokio::test]
    async fn blank_or_missing_name_is_rejected() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/categories/add",
            Some(json!({ "name": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(&body).message,
            "category name must not be empty"
        );

        let (status, _) = send(&app, Method::POST, "/api/categories/add", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn food_shows_up_under_its_category() {
        let (app, _) = test_app();
        let drinks = create_category(&app, "Drinks").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/categories/{}/foods", drinks.id),
            Some(json!({ "name": "Cola", "cost": 1.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let cola: FoodRead = json(&body);
        assert_eq!(cola.name, "Cola");
        assert_eq!(cola.cost, 1.5);
        assert_eq!(cola.category_id, drinks.id);

        let listing = list(&app).await;
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "Drinks");
        assert_eq!(listing[0].foods, vec![cola]);
    }

    #[tokio::test]
    async fn food_under_missing_category_is_a_bad_request() {
        let (app, store) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/categories/41/foods",
            Some(json!({ "name": "Cola", "cost": 1.5 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(&body).message,
            "category with id 41 not found"
        );
        assert_eq!(store.food_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_food_name_is_a_conflict() {
        let (app, store) = test_app();
        let drinks = create_category(&app, "Drinks").await;
        let uri = format!("/api/categories/{}/foods", drinks.id);

        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "name": "Cola", "cost": 1.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "name": "Cola", "cost": 2.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json::<ErrorBody>(&body).message,
            "food `Cola` already exists"
        );
        assert_eq!(store.food_count(), 1);
    }

    #[tokio::test]
    async fn food_with_non_numeric_cost_is_rejected() {
        let (app, store) = test_app();
        let drinks = create_category(&app, "Drinks").await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/categories/{}/foods", drinks.id),
            Some(json!({ "name": "Cola", "cost": "cheap" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.food_count(), 0);
    }

    #[tokio::test]
    async fn deleting_category_takes_its_foods_along() {
        let (app, store) = test_app();
        let snacks = create_category(&app, "Snacks").await;
        let drinks = create_category(&app, "Drinks").await;

        for (category, name) in [(&snacks, "Chips"), (&snacks, "Nuts"), (&drinks, "Cola")] {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/api/categories/{}/foods", category.id),
                Some(json!({ "name": name, "cost": 2.0 })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/categories/{}", snacks.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let listing = list(&app).await;
        assert!(listing.iter().all(|c| c.name != "Snacks"));
        assert!(listing
            .iter()
            .flat_map(|c| &c.foods)
            .all(|f| f.name != "Chips" && f.name != "Nuts"));
        assert_eq!(store.food_count(), 1);
    }

    #[tokio::test]
    async fn deleting_missing_category_is_not_found() {
        let (app, _) = test_app();
        let drinks = create_category(&app, "Drinks").await;

        let (status, _) = send(&app, Method::DELETE, "/api/categories/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(list(&app).await, vec![drinks]);
    }

    #[tokio::test]
    async fn malformed_or_non_positive_ids_are_rejected() {
        let (app, _) = test_app();
        create_category(&app, "Drinks").await;

        for uri in ["/api/categories/abc", "/api/categories/0", "/api/categories/-3"] {
            let (status, body) = send(&app, Method::DELETE, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                json::<ErrorBody>(&body).message,
                "id must be a positive integer"
            );
        }

        assert_eq!(list(&app).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_is_opaque_and_rolled_back() {
        let (app, store) = test_app();
        let snacks = create_category(&app, "Snacks").await;
        send(
            &app,
            Method::POST,
            &format!("/api/categories/{}/foods", snacks.id),
            Some(json!({ "name": "Chips", "cost": 2.0 })),
        )
        .await;
        let before = list(&app).await;

        store.fail_category_deletes();
        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/categories/{}", snacks.id),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorBody = json(&body);
        assert_eq!(error.message, "Something went wrong");
        assert!(!error.message.contains("lost connection"));

        assert_eq!(list(&app).await, before);
        assert_eq!(store.food_count(), 1);
    }

    #[tokio::test]
    async fn rename_returns_category_with_foods() {
        let (app, _) = test_app();
        let snacks = create_category(&app, "Snacks").await;
        create_category(&app, "Drinks").await;
        send(
            &app,
            Method::POST,
            &format!("/api/categories/{}/foods", snacks.id),
            Some(json!({ "name": "Chips", "cost": 2.0 })),
        )
        .await;

        let uri = format!("/api/categories/{}", snacks.id);
        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Drinks" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Sides" }))).await;
        assert_eq!(status, StatusCode::OK);

        let renamed: CategoryRead = json(&body);
        assert_eq!(renamed.id, snacks.id);
        assert_eq!(renamed.name, "Sides");
        assert_eq!(renamed.foods.len(), 1);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/categories/999",
            Some(json!({ "name": "Ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
