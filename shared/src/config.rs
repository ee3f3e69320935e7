use crate::endpoints::Endpoints;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 2_500;
pub const DEFAULT_TIP_INTERVAL_MS: u32 = 10_000;

/// Inclusive bounds on how many images one batch may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub min: usize,
    pub max: usize,
}

impl ImageLimits {
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self { min: 2, max: 100 }
    }
}

/// Client settings. Everything has a default; the API base can be
/// overridden when the wasm bundle is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Cadence of `GET /status/{jobId}` while a job runs.
    pub poll_interval_ms: u32,
    /// Cadence of the tip rotation on the waiting screen.
    pub tip_interval_ms: u32,
    pub image_limits: ImageLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            tip_interval_ms: DEFAULT_TIP_INTERVAL_MS,
            image_limits: ImageLimits::default(),
        }
    }
}

impl ClientConfig {
    /// Replaces the API base when `base` is present and non-blank.
    pub fn with_api_base_url(mut self, base: Option<&str>) -> Self {
        if let Some(base) = base.map(str::trim).filter(|b| !b.is_empty()) {
            self.api_base_url = base.to_string();
        }
        self
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_backend_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval_ms, 2_500);
        assert_eq!(config.tip_interval_ms, 10_000);
        assert_eq!(config.image_limits, ImageLimits { min: 2, max: 100 });
    }

    #[rstest]
    #[case(None, DEFAULT_API_BASE_URL)]
    #[case(Some(""), DEFAULT_API_BASE_URL)]
    #[case(Some("  "), DEFAULT_API_BASE_URL)]
    #[case(Some("https://api.example.test"), "https://api.example.test")]
    fn api_base_override(#[case] base: Option<&str>, #[case] expected: &str) {
        let config = ClientConfig::default().with_api_base_url(base);
        assert_eq!(config.api_base_url, expected);
    }
}
