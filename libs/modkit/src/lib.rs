//! # ModKit
//!
//! Small shared toolkit for the service modules:
//!
//! - RFC 9457 problem responses for axum handlers
//! - static error catalog entries (`ErrDef`) that render into problems
//! - a traced outgoing HTTP client
//! - process shutdown signal handling

pub mod api;
pub mod errors;
pub mod http;
pub mod runtime;

pub use api::problem::{Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON};
pub use errors::ErrDef;
pub use http::client::TracedClient;
