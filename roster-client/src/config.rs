//! Client configuration with environment overrides.

use std::time::Duration;

/// Tunables for the client. Defaults match the development server the
/// console was written against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the collection server.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Default page size for list views.
    pub page_size: u32,
    /// Settling delay for text filter input.
    pub debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            request_timeout: Duration::from_secs(30),
            page_size: 10,
            debounce: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Build a config from defaults plus environment overrides.
    ///
    /// Recognized variables: `ROSTER_BASE_URL`, `ROSTER_TIMEOUT_SECS`,
    /// `ROSTER_PAGE_SIZE`, `ROSTER_DEBOUNCE_MS`. Unparseable values are
    /// logged and ignored rather than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("ROSTER_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = parsed_var::<u64>("ROSTER_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(size) = parsed_var::<u32>("ROSTER_PAGE_SIZE") {
            if size > 0 {
                config.page_size = size;
            } else {
                log::warn!("[Config] ROSTER_PAGE_SIZE must be positive, keeping default");
            }
        }
        if let Some(ms) = parsed_var::<u64>("ROSTER_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(ms);
        }

        config
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("[Config] Ignoring unparseable {name}={raw}");
            None
        }
    }
}
