//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BackfillConfig, ConfigError, DatabaseConfig, Environment,
    LedgerConfig, NotifyConfig, PlatformConfig, StorageConfig,
};
