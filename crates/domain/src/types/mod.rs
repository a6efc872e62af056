//! Domain types and models

pub mod credential;
pub mod http;

pub use credential::Credential;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Record, RequestDescriptor};
