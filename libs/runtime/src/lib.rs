//! Process-level plumbing shared by the clinic binaries: layered configuration
//! and logging initialisation.

pub mod config;
pub mod home_dir;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
