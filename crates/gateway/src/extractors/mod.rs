//! Request extractors.

mod action_json;
mod validated_json;

pub use action_json::{ActionJson, ActionRequest};
pub use validated_json::ValidatedJson;
