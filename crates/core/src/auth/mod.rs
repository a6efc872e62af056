//! Token acquisition and caching

pub mod authenticator;
pub mod token_cache;

pub use authenticator::Authenticator;
pub use token_cache::TokenCache;
