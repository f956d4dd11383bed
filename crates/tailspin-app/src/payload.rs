use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

pub const NOT_AN_OBJECT: &str = "Request body must be a JSON object";
pub const MISSING_FIELDS: &str = "Missing required fields";

/// Request body that must be a JSON object.
///
/// Anything else, including unparsable JSON, is rejected with a 400. Keys are
/// kept as sent, so callers can check presence before typed parsing.
#[derive(Debug, Clone)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| {
                debug!("Rejected request body: {e}");
                ApiError::InvalidRequest(NOT_AN_OBJECT.to_string())
            })?;

        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(ApiError::InvalidRequest(NOT_AN_OBJECT.to_string())),
        }
    }
}

impl JsonObject {
    /// All `fields` must be present as keys, a `null` value counts as present
    pub fn require(self, fields: &[&str]) -> ApiResult<Self> {
        if fields.iter().all(|f| self.0.contains_key(*f)) {
            Ok(self)
        } else {
            Err(ApiError::InvalidRequest(MISSING_FIELDS.to_string()))
        }
    }

    pub fn into_payload<T: DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid request body: {e}")))
    }
}
