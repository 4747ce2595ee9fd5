//! HTTP handlers for the function endpoints.

pub mod admin_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod ledger_handler;
pub mod profile_handler;
pub mod staff_handler;
pub mod subscription_handler;

pub use admin_handler::admin_function;
pub use auth_handler::auth_function;
pub use health_handler::health_routes;
pub use ledger_handler::ledger_function;
pub use profile_handler::update_profile;
pub use staff_handler::{get_staff_owner, staff_function};
pub use subscription_handler::subscription_function;
