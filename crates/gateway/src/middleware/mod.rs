//! Request middleware.

mod identity;

pub use identity::{identity_middleware, CurrentUser, USER_ID_HEADER};
