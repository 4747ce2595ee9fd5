//! Own profile update.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::{ActionResponse, AppResult};
use domain::AccountResponse;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "fullName")]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePayload {
    pub user: AccountResponse,
}

/// Change the caller's display name; a blank name clears it.
#[utoipa::path(
    put,
    path = "/functions/profile",
    tag = "Profile",
    security(("user_id" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfilePayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unknown caller")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Response> {
    let user = state
        .services
        .admin
        .update_profile(&actor, request.full_name)
        .await?;

    Ok(ActionResponse::ok(ProfilePayload { user }).into_response())
}
