use serde::{Deserialize, Serialize};

/// HTTP host configuration (`modules.api_ingress` in the app config).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Serve `/openapi.json` and `/docs`.
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_docs: false,
            cors_enabled: false,
            request_timeout_secs: default_timeout_secs(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}
