use serde::{Deserialize, Serialize};

/// Configuration for the doctor_directory module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoctorDirectoryConfig {
    /// Insert the starter doctor list when the table is empty.
    #[serde(default = "default_seed_on_startup")]
    pub seed_on_startup: bool,
    #[serde(default = "default_fallback_fee")]
    pub fallback_fee: u32,
    #[serde(default = "default_rating")]
    pub default_rating: f64,
    /// Hosted auth service; local account tables are used when unset.
    #[serde(default)]
    pub accounts_base_url: Option<String>,
    #[serde(default)]
    pub accounts_api_key: Option<String>,
}

impl Default for DoctorDirectoryConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: default_seed_on_startup(),
            fallback_fee: default_fallback_fee(),
            default_rating: default_rating(),
            accounts_base_url: None,
            accounts_api_key: None,
        }
    }
}

fn default_seed_on_startup() -> bool {
    true
}

fn default_fallback_fee() -> u32 {
    500
}

fn default_rating() -> f64 {
    4.0
}
