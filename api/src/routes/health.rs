use axum::Json;

use crate::schemas::HealthRead;

pub async fn health() -> Json<HealthRead> {
    Json(HealthRead::ok())
}
