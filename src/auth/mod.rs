//! Authentication configuration and token caching.

mod provider;
mod token;

pub use provider::{AuthConfig, ClientCredentials, HeaderCallback};

pub(crate) use provider::basic_header;
pub(crate) use token::{TokenCache, TokenRequestKey};
