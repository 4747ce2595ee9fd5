//! Service layer for account administration.

mod admin_service;

pub use admin_service::{AccountAdmin, AdminService, CreateAccount};
