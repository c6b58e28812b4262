//! Validated JSON extractor
//!
//! Extracts and validates JSON request bodies using the validator crate.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Validated JSON extractor
///
/// Deserializes a JSON body and runs its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| match e {
                JsonRejection::JsonDataError(e) => ApiError::bad_request(e.body_text()),
                JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Malformed JSON body"),
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::bad_request("Expected Content-Type: application/json")
                }
                _ => ApiError::bad_request("Invalid JSON body"),
            })?;

        // Every failing field is reported, not just the first
        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
