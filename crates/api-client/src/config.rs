//! Client configuration.

/// Where the backend lives.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read `PLATINO_API_URL`, falling back to the local dev backend.
    pub fn from_env() -> Self {
        match std::env::var("PLATINO_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_dropped() {
        let config = ApiConfig::new("https://backend.example//");
        assert_eq!(config.url("/api/health/"), "https://backend.example/api/health/");
    }

    #[test]
    fn default_points_at_local_dev() {
        assert_eq!(ApiConfig::default().base_url, "http://localhost:8000");
    }
}
