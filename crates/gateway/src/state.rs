//! Application state for dependency injection.

use auth_service_lib::Services;
use user_service_lib::infra::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Absent when running over an in-memory store
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(services: Services, database: Option<Database>) -> Self {
        Self { services, database }
    }
}
