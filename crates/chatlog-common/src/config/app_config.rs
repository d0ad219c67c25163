//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file).

use chatlog_core::Snowflake;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    pub ledger: LedgerConfig,
    pub backfill: BackfillConfig,
    pub notify: NotifyConfig,
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform REST API configuration
#[derive(Clone, Deserialize)]
pub struct PlatformConfig {
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PlatformConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Ledger recording behavior
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Value written to the `machine` column
    pub origin_host: String,
    /// Audit entries scanned when attributing a rename
    #[serde(default = "default_audit_lookback")]
    pub audit_lookback: u8,
    /// Skip edit rows whose content fingerprint is already recorded
    #[serde(default = "default_edit_dedup")]
    pub edit_dedup: bool,
}

/// Historical backfill pacing
#[derive(Debug, Clone, Deserialize)]
pub struct BackfillConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u8,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl BackfillConfig {
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Deletion notice destination; notices are off unless both ids are set
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub community_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl NotifyConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.community_id.is_some() && self.channel_id.is_some()
    }
}

/// File storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_attachments_dir")]
    pub attachments_dir: String,
}

// Default value functions
fn default_app_name() -> String {
    "chatlog".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_audit_lookback() -> u8 {
    5
}

fn default_edit_dedup() -> bool {
    true
}

fn default_page_size() -> u8 {
    100
}

fn default_page_delay_ms() -> u64 {
    2000
}

fn default_attachments_dir() -> String {
    "attachments".to_string()
}

/// Hostname of this machine: `HOSTNAME`, then `/etc/hostname`
fn default_origin_host(lookup: &impl Fn(&str) -> Option<String>) -> String {
    lookup("HOSTNAME")
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_snowflake(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Snowflake>, ConfigError> {
    match lookup(name).filter(|s| !s.trim().is_empty()) {
        Some(raw) => Snowflake::parse(raw.trim())
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let notify = NotifyConfig {
            community_id: parse_snowflake(&lookup, "NOTIFY_COMMUNITY_ID")?,
            channel_id: parse_snowflake(&lookup, "NOTIFY_CHANNEL_ID")?,
            utc_offset_minutes: lookup("NOTIFY_UTC_OFFSET_MINUTES")
                .and_then(|s| s.parse().ok())
                .filter(|m: &i32| m.abs() < 24 * 60)
                .unwrap_or(0),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            platform: PlatformConfig {
                token: lookup("PLATFORM_TOKEN").ok_or(ConfigError::MissingVar("PLATFORM_TOKEN"))?,
                api_base: lookup("PLATFORM_API_BASE")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base),
                request_timeout_secs: lookup("PLATFORM_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_request_timeout),
            },
            ledger: LedgerConfig {
                origin_host: lookup("ORIGIN_HOST")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| default_origin_host(&lookup)),
                audit_lookback: lookup("AUDIT_LOOKBACK")
                    .and_then(|s| s.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or_else(default_audit_lookback),
                edit_dedup: lookup("EDIT_DEDUP")
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or_else(default_edit_dedup),
            },
            backfill: BackfillConfig {
                page_size: lookup("BACKFILL_PAGE_SIZE")
                    .and_then(|s| s.parse::<u8>().ok())
                    .map(|n| n.clamp(1, 100))
                    .unwrap_or_else(default_page_size),
                page_delay_ms: lookup("BACKFILL_PAGE_DELAY_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_page_delay_ms),
            },
            notify,
            storage: StorageConfig {
                attachments_dir: lookup("ATTACHMENTS_DIR")
                    .unwrap_or_else(default_attachments_dir),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
