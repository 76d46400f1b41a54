use derive_more::Display;
use thiserror::Error;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    #[display("category")]
    Category,
    #[display("food")]
    Food,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} `{name}` already exists")]
    Conflict { entity: Entity, name: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure of a backend that does not speak sqlx, such as the in-memory store.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn conflict(entity: Entity, name: impl Into<String>) -> Self {
        StoreError::Conflict {
            entity,
            name: name.into(),
        }
    }

    pub fn not_found(entity: Entity, id: impl Into<i64>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Errors the client can't act on. These are reported as opaque internal failures.
    pub fn is_internal(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Storage(_))
    }
}
