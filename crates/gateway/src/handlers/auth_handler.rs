//! Sign-up, sign-in and sign-out.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use auth_service_lib::service::SignUp;
use common::{ActionResponse, AppResult};
use domain::AccountResponse;

use crate::extractors::{ActionJson, ActionRequest};
use crate::state::AppState;

/// Auth function request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuthAction {
    Signup {
        #[schema(example = "alice@x.com")]
        email: String,
        password: String,
        #[serde(default, alias = "fullName")]
        #[schema(example = "Alice")]
        full_name: Option<String>,
    },
    Signin {
        email: String,
        password: String,
    },
    /// No server-side session exists; the id is only logged
    Signout {
        #[serde(default)]
        user_id: Option<Uuid>,
    },
}

impl ActionRequest for AuthAction {
    const ACTIONS: &'static [&'static str] = &["signup", "signin", "signout"];
}

/// Account returned to become the client's session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionPayload {
    pub user: AccountResponse,
    pub message: String,
}

/// Auth function: `signup`, `signin`, `signout`
#[utoipa::path(
    post,
    path = "/functions/auth",
    tag = "Authentication",
    request_body = AuthAction,
    responses(
        (status = 200, description = "Action succeeded", body = SessionPayload),
        (status = 400, description = "Invalid action or missing fields"),
        (status = 401, description = "Invalid email or password"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn auth_function(
    State(state): State<AppState>,
    ActionJson(action): ActionJson<AuthAction>,
) -> AppResult<Response> {
    let auth = &state.services.auth;

    let response = match action {
        AuthAction::Signup {
            email,
            password,
            full_name,
        } => {
            let user = auth
                .sign_up(SignUp {
                    email,
                    password,
                    full_name,
                })
                .await?;
            ActionResponse::ok(SessionPayload {
                user,
                message: "Account created successfully".to_string(),
            })
            .into_response()
        }
        AuthAction::Signin { email, password } => {
            let user = auth.sign_in(&email, &password).await?;
            ActionResponse::ok(SessionPayload {
                user,
                message: "Signed in successfully".to_string(),
            })
            .into_response()
        }
        AuthAction::Signout { user_id } => {
            if let Some(id) = user_id {
                auth.sign_out(id).await?;
            }
            ActionResponse::done().into_response()
        }
    };

    Ok(response)
}
