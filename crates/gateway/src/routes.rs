//! Route configuration.

use axum::{
    middleware,
    routing::{post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    admin_function, auth_function, get_staff_owner, health_routes, ledger_function,
    staff_function, subscription_function, update_profile,
};
use crate::middleware::identity_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Function endpoints that act on behalf of a signed-in account.
fn identified_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", post(admin_function))
        .route("/staff_management", post(staff_function))
        .route("/get_staff_owner", post(get_staff_owner))
        .route("/ledger", post(ledger_function))
        .route("/subscription", post(subscription_function))
        .route("/profile", put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, identity_middleware))
}

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let functions = Router::new()
        // Sign-up and sign-in happen before any identity exists
        .route("/auth", post(auth_function))
        .merge(identified_routes(state.clone()));

    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/functions", functions)
        .with_state(state)
}
