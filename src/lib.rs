//! `watson-http` is the HTTP binding layer shared by IBM Watson service clients.
//!
//! - [`classify`] turns a failed response into an [`HttpError`]
//! - [`ServiceClient`] sends requests and reports non-2xx responses as
//!   [`WatsonError::Http`]

mod client;
mod error;
mod error_response;
mod options;

pub use client::ServiceClient;
pub use error::{HttpError, Metadata, WatsonError};
pub use error_response::classify;
pub use options::ClientOptions;

pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, WatsonError>;
