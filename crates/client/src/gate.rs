//! Role Authorization Gate.
//!
//! Decides what happens to a view request given the current session. The
//! gate only looks at roles; ownership checks happen in the services.

use domain::UserRole;

/// Where signed-out users are sent
pub const SIGN_IN_PATH: &str = "/auth";

/// Where signed-in users without access to a view are sent
pub const LANDING_PATH: &str = "/";

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not
    Public,
    /// Any signed-in role
    Authenticated,
    /// Signed-in accounts with one of these roles
    Roles(&'static [UserRole]),
}

/// An entry of the app's view table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub path: &'static str,
    pub access: Access,
}

const VIEWS: &[View] = &[
    View { path: LANDING_PATH, access: Access::Authenticated },
    View { path: "/transactions", access: Access::Authenticated },
    View { path: "/expenses", access: Access::Authenticated },
    View { path: "/reports", access: Access::Authenticated },
    View { path: "/add", access: Access::Authenticated },
    View { path: "/profile", access: Access::Authenticated },
    View { path: "/subscription", access: Access::Authenticated },
    View { path: "/staff", access: Access::Roles(&[UserRole::Owner]) },
    View { path: "/admin", access: Access::Roles(&[UserRole::Admin]) },
    View { path: SIGN_IN_PATH, access: Access::Public },
];

/// The app's view table
pub fn routes() -> &'static [View] {
    VIEWS
}

/// A request to open `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub path: String,
    pub access: Access,
}

impl ViewRequest {
    /// Request a view from the table; unlisted paths need a signed-in user.
    pub fn route(path: &str) -> Self {
        let access = routes()
            .iter()
            .find(|view| view.path == path)
            .map_or(Access::Authenticated, |view| view.access);
        Self {
            path: path.to_string(),
            access,
        }
    }

    pub fn new(path: impl Into<String>, access: Access) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }
}

/// Gate state, driven by the Session Holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Session is still being rehydrated
    Loading,
    Unauthenticated,
    Authorized(UserRole),
}

/// Outcome of a view request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show a neutral waiting indicator
    Wait,
    /// Go to sign-in, coming back to `return_to` afterwards
    RedirectToSignIn { return_to: String },
    RedirectToLanding,
    Render,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    state: GateState,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Loading,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Session present or gone.
    pub fn session_changed(&mut self, role: Option<UserRole>) {
        self.state = match role {
            Some(role) => GateState::Authorized(role),
            None => GateState::Unauthenticated,
        };
    }

    /// Pure in the gate's state and the request.
    pub fn decide(&self, request: &ViewRequest) -> GateDecision {
        if request.access == Access::Public {
            return GateDecision::Render;
        }

        match self.state {
            GateState::Loading => GateDecision::Wait,
            GateState::Unauthenticated => GateDecision::RedirectToSignIn {
                return_to: request.path.clone(),
            },
            GateState::Authorized(role) => match request.access {
                Access::Roles(allowed) if !allowed.contains(&role) => {
                    GateDecision::RedirectToLanding
                }
                _ => GateDecision::Render,
            },
        }
    }
}
