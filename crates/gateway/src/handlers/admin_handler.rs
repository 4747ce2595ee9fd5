//! Admin user management.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use common::{ActionResponse, AppResult};
use domain::{AccountResponse, UserRole};
use user_service_lib::service::CreateAccount;

use crate::extractors::{ActionJson, ActionRequest};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Admin function request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    GetUsers,
    CreateUser {
        email: String,
        password: String,
        #[serde(default, alias = "fullName")]
        full_name: Option<String>,
        /// Defaults to `owner`
        #[serde(default)]
        role: Option<UserRole>,
    },
    UpdateUserRole {
        #[serde(alias = "userId")]
        user_id: Uuid,
        role: UserRole,
    },
    DeleteUser {
        #[serde(alias = "userId")]
        user_id: Uuid,
    },
}

impl ActionRequest for AdminAction {
    const ACTIONS: &'static [&'static str] =
        &["get_users", "create_user", "update_user_role", "delete_user"];
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersPayload {
    pub users: Vec<AccountResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: AccountResponse,
}

/// Admin function: `get_users`, `create_user`, `update_user_role`, `delete_user`
#[utoipa::path(
    post,
    path = "/functions/admin",
    tag = "Admin",
    security(("user_id" = [])),
    request_body = AdminAction,
    responses(
        (status = 200, description = "Action succeeded"),
        (status = 400, description = "Invalid action or request"),
        (status = 401, description = "Unknown caller"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn admin_function(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ActionJson(action): ActionJson<AdminAction>,
) -> AppResult<Response> {
    let admin = &state.services.admin;

    let response = match action {
        AdminAction::GetUsers => {
            let users = admin.get_users(&actor).await?;
            ActionResponse::ok(UsersPayload { users }).into_response()
        }
        AdminAction::CreateUser {
            email,
            password,
            full_name,
            role,
        } => {
            let user = admin
                .create_user(
                    &actor,
                    CreateAccount {
                        email,
                        password,
                        full_name,
                        role,
                    },
                )
                .await?;
            ActionResponse::ok(UserPayload { user }).into_response()
        }
        AdminAction::UpdateUserRole { user_id, role } => {
            let user = admin.update_user_role(&actor, user_id, role).await?;
            ActionResponse::ok(UserPayload { user }).into_response()
        }
        AdminAction::DeleteUser { user_id } => {
            admin.delete_user(&actor, user_id).await?;
            ActionResponse::done().into_response()
        }
    };

    Ok(response)
}
