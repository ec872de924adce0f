use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration. Read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Directory for the local storage database.
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Build from `MINDFUL_API_BASE_URL`, `MINDFUL_REQUEST_TIMEOUT_SECS` and
    /// `MINDFUL_DATA_DIR`, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup("MINDFUL_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| normalize_base_url(&v))
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match lookup("MINDFUL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!(
                        "Ignoring invalid MINDFUL_REQUEST_TIMEOUT_SECS={:?}, using {}s",
                        raw,
                        DEFAULT_TIMEOUT_SECS
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        let data_dir = lookup("MINDFUL_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            api_base_url,
            request_timeout,
            data_dir,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = normalize_base_url(url);
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("mindful_trade.db")
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_data_dir() -> PathBuf {
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir());
    home.join(".mindful-trade")
}
