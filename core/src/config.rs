use crate::error::ConfigError;
use std::env::VarError;
use std::path::PathBuf;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Settings for the destination service, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Places API key. `None` disables live fetching; only fallback data is served.
    pub places_api_key: Option<String>,
    /// Overrides the places API base URL (tests, proxies).
    pub places_base_url: Option<String>,
    pub http_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// JSON catalog replacing the built-in heuristics.
    pub catalog_path: Option<PathBuf>,
    /// Directory of JSON/JSONL destination records added to the fallback set.
    pub fallback_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            places_api_key: None,
            places_base_url: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            catalog_path: None,
            fallback_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Parse using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        // Blank values count as unset.
        let optional = |var: &str| -> Option<String> {
            lookup(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
            match optional(var) {
                None => Ok(default),
                Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            }
        };

        let http_timeout_secs = parse_u64("TRIPDATA_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if http_timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "TRIPDATA_HTTP_TIMEOUT_SECS".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let cache_ttl_secs = parse_u64("TRIPDATA_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        if cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::InvalidEnvVar {
                var: "TRIPDATA_CACHE_TTL_SECS".into(),
                reason: format!("must not exceed {MAX_CACHE_TTL_SECS} seconds"),
            });
        }

        Ok(Self {
            places_api_key: optional("GOOGLE_MAPS_API_KEY"),
            places_base_url: optional("TRIPDATA_PLACES_BASE_URL"),
            http_timeout_secs,
            cache_ttl_secs,
            catalog_path: optional("TRIPDATA_CATALOG_PATH").map(PathBuf::from),
            fallback_dir: optional("TRIPDATA_FALLBACK_DIR").map(PathBuf::from),
        })
    }

    pub fn cache_ttl(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX))
    }
}
