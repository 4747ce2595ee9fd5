//! Identity middleware.
//!
//! The client names its session's account id in a header; the account, and
//! with it the role, is always reloaded from the store so nothing the
//! client holds is trusted for authorization.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Account;

use crate::state::AppState;

/// Header carrying the signed-in account id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Server-loaded account making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Account);

/// Resolve the caller and insert [`CurrentUser`] into request extensions.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let id = extract_user_id(&request)?;

    let account = state.services.auth.current_account(id).await?;
    tracing::debug!(user_id = %account.id, role = %account.role, "Request identity verified");

    request.extensions_mut().insert(CurrentUser(account));

    Ok(next.run(request).await)
}

fn extract_user_id(request: &Request<Body>) -> AppResult<Uuid> {
    request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(AppError::Unauthorized)
}
