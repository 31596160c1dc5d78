pub mod controller;
pub mod error;
pub mod ports;
pub mod query;
pub mod repo;
pub mod service;
pub mod slots;
