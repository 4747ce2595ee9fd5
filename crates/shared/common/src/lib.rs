//! Common utilities shared across the services, gateway and client.
//!
//! This crate provides:
//! - Unified error handling with the action response envelope
//! - Configuration structures

pub mod config;
pub mod envelope;
pub mod error;

pub use config::*;
pub use envelope::{ActionResponse, Empty};
pub use error::{AppError, AppResult, OptionExt};
