use axum::Router;
use axum::routing::get;
use menu_store::MenuStore;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod categories;
pub mod foods;
pub mod health;

/// Every route lives under `/api`.
pub fn app<S: MenuStore>(state: AppState<S>) -> Router {
    let api_routes = Router::<AppState<S>>::new()
        .route("/health", get(health::health))
        .nest("/categories", categories::category_routes())
        .nest("/foods", foods::food_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use menu_store::memory::MemoryMenuStore;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use crate::AppState;

    pub fn test_app() -> (Router, MemoryMenuStore) {
        let store = MemoryMenuStore::new();
        let app = super::app(AppState {
            store: store.clone(),
        });
        (app, store)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }
}
