use crate::error::{AppError, Result};

pub const NASA_API_URL: &str = "https://api.nasa.gov";
pub const EONET_API_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3";
pub const NASA_IMAGES_API_URL: &str = "https://images-api.nasa.gov";

/// Public rate-limited key accepted by api.nasa.gov when no key is configured.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Upstream request timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Diameter (km) assumed for risk scoring when the catalog has no estimate.
pub const DEFAULT_ESTIMATED_DIAMETER_KM: f64 = 0.1;

/// Distance, size and score thresholds for the NEO hazard heuristic.
pub mod risk_thresholds {
    pub const VERY_CLOSE_KM: f64 = 1_000_000.0;
    pub const CLOSE_KM: f64 = 5_000_000.0;
    pub const LARGE_DIAMETER_KM: f64 = 1.0;
    pub const MEDIUM_DIAMETER_KM: f64 = 0.5;
    /// Minimum score classified as `high`.
    pub const HIGH_MIN: u32 = 50;
    /// Minimum score classified as `medium`.
    pub const MEDIUM_MIN: u32 = 30;
}

/// Points added per satisfied risk factor. Factors are independent, so the
/// total tops out at 100.
pub mod risk_weights {
    pub const VERY_CLOSE: u32 = 30;
    pub const CLOSE: u32 = 20;
    pub const HAZARDOUS: u32 = 25;
    pub const LARGE: u32 = 15;
    pub const MEDIUM: u32 = 10;
}

/// Query defaults mirrored from the NASA endpoints we proxy.
pub mod query_defaults {
    pub const EONET_LIMIT: u32 = 50;
    pub const EONET_DAYS: u32 = 30;
    pub const EONET_STATUS: &str = "open";
    pub const NEO_BROWSE_PAGE: u32 = 0;
    pub const NEO_BROWSE_SIZE: u32 = 20;
    pub const NEO_BROWSE_SORT: &str = "id";
    pub const MARS_PHOTO_PAGE: u32 = 1;
    pub const CHAT_ROVER: &str = "curiosity";
    pub const CHAT_SOL: &str = "1000";
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    /// Deployment label reported by /health (APP_ENV)
    pub environment: String,
    pub nasa_api_key: String,
    pub nasa_api_url: String,
    pub eonet_api_url: String,
    pub images_api_url: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            nasa_api_key: std::env::var("NASA_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            nasa_api_url: std::env::var("NASA_API_URL")
                .unwrap_or_else(|_| NASA_API_URL.to_string()),
            eonet_api_url: std::env::var("EONET_API_URL")
                .unwrap_or_else(|_| EONET_API_URL.to_string()),
            images_api_url: std::env::var("NASA_IMAGES_API_URL")
                .unwrap_or_else(|_| NASA_IMAGES_API_URL.to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
                })?,
        })
    }

    /// Same defaults as `from_env`, with every upstream pointed at `base_url`.
    #[cfg(test)]
    pub fn for_upstream(base_url: &str) -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            environment: "test".to_string(),
            nasa_api_key: DEFAULT_API_KEY.to_string(),
            nasa_api_url: base_url.to_string(),
            eonet_api_url: format!("{base_url}/eonet"),
            images_api_url: format!("{base_url}/images"),
            http_timeout_secs: 5,
        }
    }
}
