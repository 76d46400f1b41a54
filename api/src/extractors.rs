use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body that has been deserialized and passed its `validator` rules. Every rejection
/// becomes an [`AppError::Validation`] so clients see the same error shape as everywhere else.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Positive integer id taken from the single path parameter of the route.
#[derive(Debug)]
pub struct ValidId<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidId<T>
where
    T: From<i64>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || AppError::Validation("id must be a positive integer".to_string());

        let Path(id): Path<i64> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        if id < 1 {
            return Err(invalid());
        }

        Ok(ValidId(T::from(id)))
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    messages.sort();
    messages.join(", ")
}
