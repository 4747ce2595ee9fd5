//! Action response envelope.
//!
//! Every function endpoint answers `{ "success": bool, "error"?: string, ...payload }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Successful action response; the payload's fields sit beside `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

/// Empty payload for actions that only report success
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Empty {}

impl<T> ActionResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

impl ActionResponse<Empty> {
    pub fn done() -> Self {
        Self::ok(Empty {})
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
