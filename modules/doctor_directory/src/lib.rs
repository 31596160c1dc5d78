// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{client, error, model};

// === ERROR CATALOG ===
pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::DoctorDirectory;

// === INTERNAL MODULES ===
// Exposed for tests and the server binary; other modules should use `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
