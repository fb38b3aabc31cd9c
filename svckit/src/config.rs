use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ContentError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the content backend, also used to resolve relative media URLs.
    pub base_url: String,
    pub api_prefix: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337".to_string(),
            api_prefix: "/api".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl BackendConfig {
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn api_root(&self) -> String {
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            self.origin().to_string()
        } else {
            format!("{}/{}", self.origin(), prefix)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub notice_capacity: usize,
    pub fetch_all_pages: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            notice_capacity: 100,
            fetch_all_pages: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_file: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: "admin-dash.log".to_string(),
        }
    }
}

/// Loads the YAML file at `path` (if present) layered with `ADMIN_DASH__*`
/// environment variables.
pub fn load_config(path: &str) -> Result<AdminConfig, ContentError> {
    let config = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("ADMIN_DASH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_joins_prefix() {
        let backend = BackendConfig {
            base_url: "http://cms.local:1337/".to_string(),
            api_prefix: "/api/".to_string(),
            request_timeout_ms: 500,
        };
        assert_eq!(backend.origin(), "http://cms.local:1337");
        assert_eq!(backend.api_root(), "http://cms.local:1337/api");
        assert_eq!(backend.request_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("config/does-not-exist").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:1337");
        assert_eq!(config.dashboard.notice_capacity, 100);
        assert!(!config.dashboard.fetch_all_pages);
    }
}
