//! Extractor for `{ "action": ..., ...fields }` request bodies.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use common::AppError;

/// An internally tagged request enum and the action names it accepts.
pub trait ActionRequest: DeserializeOwned {
    const ACTIONS: &'static [&'static str];
}

/// Parses an action request; an unknown or missing action is rejected with
/// `"Invalid action"` before any field is looked at.
pub struct ActionJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ActionJson<T>
where
    S: Send + Sync,
    T: ActionRequest,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let known = body
            .get("action")
            .and_then(Value::as_str)
            .is_some_and(|action| T::ACTIONS.contains(&action));
        if !known {
            return Err(AppError::validation("Invalid action"));
        }

        let request = serde_json::from_value(body)
            .map_err(|e| AppError::validation(format!("Invalid request: {}", e)))?;

        Ok(ActionJson(request))
    }
}
