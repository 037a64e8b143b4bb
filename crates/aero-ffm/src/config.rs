//! Client configuration from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FfmConfig {
    /// Service base URL; `/v1/plan` is appended.
    pub base_url: Option<String>,
    /// Default mode when the caller does not pick one.
    pub use_mock: bool,
    /// Overall request timeout. `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    /// JSON file served instead of the built-in plan in mock mode.
    pub mock_response_path: Option<PathBuf>,
}

impl Default for FfmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            use_mock: true,
            request_timeout: None,
            mock_response_path: None,
        }
    }
}

impl FfmConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("FFM_BASE_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            use_mock: env::var("FFM_USE_MOCK")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(true),
            request_timeout: env::var("FFM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            mock_response_path: env::var("FFM_MOCK_RESPONSE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Offline configuration serving the built-in plan.
    pub fn mock() -> Self {
        Self::default()
    }

    /// Network configuration against `base_url`.
    pub fn network(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            use_mock: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_mock_response(mut self, path: impl Into<PathBuf>) -> Self {
        self.mock_response_path = Some(path.into());
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
