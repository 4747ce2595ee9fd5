//! Staff management and owner lookup.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use auth_service_lib::service::NewStaff;
use common::{ActionResponse, AppError, AppResult};
use domain::StaffMember;

use crate::extractors::{ActionJson, ActionRequest, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Staff management request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StaffAction {
    CreateStaff {
        #[serde(alias = "ownerId")]
        owner_id: Uuid,
        email: String,
        password: String,
        #[serde(alias = "staffName")]
        staff_name: String,
    },
    DeleteStaff {
        /// Delegation link id
        #[serde(alias = "staffId")]
        staff_id: Uuid,
    },
    GetStaff {
        #[serde(alias = "ownerId")]
        owner_id: Uuid,
    },
}

impl ActionRequest for StaffAction {
    const ACTIONS: &'static [&'static str] = &["create_staff", "delete_staff", "get_staff"];
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffCreated {
    pub staff: StaffMember,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffList {
    pub staff: Vec<StaffMember>,
}

/// Staff management function: `create_staff`, `delete_staff`, `get_staff`
#[utoipa::path(
    post,
    path = "/functions/staff_management",
    tag = "Staff",
    security(("user_id" = [])),
    request_body = StaffAction,
    responses(
        (status = 200, description = "Action succeeded"),
        (status = 400, description = "Invalid action or request"),
        (status = 403, description = "Caller does not own this directory"),
        (status = 404, description = "Staff link not found"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Operation partially failed")
    )
)]
pub async fn staff_function(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ActionJson(action): ActionJson<StaffAction>,
) -> AppResult<Response> {
    let staff = &state.services.staff;

    let response = match action {
        StaffAction::CreateStaff {
            owner_id,
            email,
            password,
            staff_name,
        } => {
            let link = staff
                .create(
                    &actor,
                    NewStaff {
                        owner_id,
                        email: email.clone(),
                        password,
                        staff_name,
                    },
                )
                .await?;
            let member = StaffMember::from_link(link, Some(email.trim().to_string()));
            ActionResponse::ok(StaffCreated { staff: member }).into_response()
        }
        StaffAction::DeleteStaff { staff_id } => {
            staff.delete(&actor, staff_id).await?;
            ActionResponse::done().into_response()
        }
        StaffAction::GetStaff { owner_id } => {
            let members = staff.list(&actor, owner_id).await?;
            ActionResponse::ok(StaffList { staff: members }).into_response()
        }
    };

    Ok(response)
}

/// Owner lookup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StaffOwnerRequest {
    #[serde(alias = "staffUserId")]
    pub staff_user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffOwner {
    pub owner_id: Uuid,
}

/// Owner a staff account acts for.
///
/// Answered for the staff member itself, its owner, or an admin.
#[utoipa::path(
    post,
    path = "/functions/get_staff_owner",
    tag = "Staff",
    security(("user_id" = [])),
    request_body = StaffOwnerRequest,
    responses(
        (status = 200, description = "Owner resolved", body = StaffOwner),
        (status = 403, description = "Caller may not see this link"),
        (status = 422, description = "No owner is linked")
    )
)]
pub async fn get_staff_owner(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<StaffOwnerRequest>,
) -> AppResult<Response> {
    let may_ask = actor.id == request.staff_user_id || actor.is_admin() || actor.is_owner();
    if !may_ask {
        return Err(AppError::Forbidden);
    }

    // Owners asking about someone else learn nothing beyond "not yours"
    let owner_asking = actor.is_owner() && actor.id != request.staff_user_id;

    let owner_id = match state
        .services
        .resolver
        .resolve_owner(request.staff_user_id)
        .await
    {
        Ok(owner_id) => owner_id,
        Err(e) if owner_asking && e.is_client_error() => return Err(AppError::Forbidden),
        Err(e) => return Err(e),
    };

    if owner_asking && owner_id != actor.id {
        return Err(AppError::Forbidden);
    }

    Ok(ActionResponse::ok(StaffOwner { owner_id }).into_response())
}
