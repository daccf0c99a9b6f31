//! Data models shared across the SDK.

mod auth;
mod jsonapi;

pub use auth::TokenResponse;
pub use jsonapi::{JsonApiError, JsonApiErrorSource};
