//! Tracing and logging setup
//!
//! Logs always go to stderr: `chatlog ingest` reads frames on stdin, and
//! stdout stays free for whatever pipes the binary together.

use tracing::Level;

use crate::config::Environment;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Crates that log every query or request at `info` and drown the ledger's
/// own events
const NOISY_DEPENDENCIES: &[&str] = &["sqlx", "hyper", "hyper_util", "reqwest", "rustls"];

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the ledger's own crates
    pub level: Level,
    /// Emit one JSON object per event
    pub json: bool,
    /// Log span open/close (service calls, repository calls)
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
    /// Cap noisy dependencies at `warn`
    pub quiet_dependencies: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
            quiet_dependencies: true,
        }
    }
}

impl TracingConfig {
    /// Pick a preset for the deployment environment
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        if env.is_production() {
            Self::production()
        } else if env.is_development() {
            Self::development()
        } else {
            Self::default()
        }
    }

    /// Debug logging with span events, for following a single event through
    /// reconciliation
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            ..Self::default()
        }
    }

    /// JSON logging for log shippers
    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            file_line: false,
            ..Self::default()
        }
    }

    /// `EnvFilter` directives used when `RUST_LOG` is not set
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        if !self.quiet_dependencies {
            return level;
        }
        NOISY_DEPENDENCIES
            .iter()
            .fold(level, |directives, target| format!("{directives},{target}=warn"))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured directives when set.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.file_line)
        .with_line_number(config.file_line)
        .with_span_events(span_events);

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };
    result.map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
