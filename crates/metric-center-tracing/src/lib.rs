//! Shared tracing configuration for the metric-center workspace.
//!
//! The CLI, integration tests and benchmarks all install their `tracing`
//! subscriber through this crate so that filters, formats and the
//! performance-span switches behave the same everywhere.
//!
//! Logs are always written to stderr. Stdout is reserved for the report.

pub mod performance;

#[macro_use]
pub mod macros;

use std::env;
use std::io;

pub use tracing::{debug, error, info, trace, warn};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

/// Environment variable selecting the configuration preset.
pub const ENV_PROFILE: &str = "METRIC_CENTER_TRACING_PROFILE";
/// Environment variable overriding the filter directives.
pub const ENV_DIRECTIVES: &str = "METRIC_CENTER_TRACING_DIRECTIVES";
/// Environment variable selecting the output format.
pub const ENV_FORMAT: &str = "METRIC_CENTER_TRACING_FORMAT";
/// Environment variable toggling performance spans.
pub const ENV_PERF_TRACING: &str = "METRIC_CENTER_PERF_TRACING";
/// Environment variable setting the performance-span threshold in microseconds.
pub const ENV_PERF_THRESHOLD_US: &str = "METRIC_CENTER_PERF_THRESHOLD_US";

/// How the process-wide subscriber filters and formats events.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Optional tracing directives (e.g. `metric_center_core=debug,info`).
    /// When absent the crate falls back to `RUST_LOG` and finally to
    /// [`TracingConfig::default_directive`].
    pub directives: Option<String>,
    /// Fallback directive used when neither `directives` nor `RUST_LOG`
    /// resolve to a valid filter.
    pub default_directive: String,
    /// Print the module path of each event.
    pub include_targets: bool,
    /// Colour the output. Ignored for JSON.
    pub ansi: bool,
    /// Span lifecycle events to emit.
    pub span_events: FmtSpan,
    /// Line format.
    pub output: TracingOutput,
    /// When false, performance spans log nothing on drop.
    pub enable_performance_tracing: bool,
    /// Minimum duration in microseconds for a performance span to be logged.
    pub performance_threshold_us: Option<u64>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Configuration for interactive use: compact, coloured, warnings only.
    ///
    /// The CLI prints its answer on stdout, so the local preset keeps stderr
    /// quiet unless the user asks for more through `RUST_LOG`.
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "warn".to_string(),
            include_targets: true,
            ansi: true,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Compact,
            enable_performance_tracing: cfg!(debug_assertions),
            performance_threshold_us: None,
        }
    }

    /// Configuration for CI or log collection (JSON, no ANSI).
    pub fn for_ci() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Json,
            enable_performance_tracing: false,
            performance_threshold_us: None,
        }
    }

    /// Configuration for profiling launches and reductions.
    pub fn for_performance() -> Self {
        Self {
            directives: Some("metric_center_backends=debug,metric_center_core=debug,info".to_string()),
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            span_events: FmtSpan::CLOSE,
            output: TracingOutput::Json,
            enable_performance_tracing: true,
            performance_threshold_us: None,
        }
    }

    /// Preset chosen by `METRIC_CENTER_TRACING_PROFILE`, adjusted by the other
    /// variables.
    ///
    /// # Environment Variables
    ///
    /// - `METRIC_CENTER_TRACING_PROFILE` - `local` (default), `ci` or `performance`
    /// - `METRIC_CENTER_TRACING_DIRECTIVES` - overrides the filter directives
    /// - `METRIC_CENTER_TRACING_FORMAT` - `pretty`, `compact` or `json`
    /// - `METRIC_CENTER_PERF_TRACING` - `true`/`1`/`yes` enables performance spans
    /// - `METRIC_CENTER_PERF_THRESHOLD_US` - minimum span duration to log
    pub fn from_env() -> Self {
        let profile = env_value(ENV_PROFILE).unwrap_or_default().to_ascii_lowercase();
        let mut config = match profile.as_str() {
            "ci" => Self::for_ci(),
            "performance" => Self::for_performance(),
            _ => Self::for_local(),
        };

        if let Some(directives) = env_value(ENV_DIRECTIVES) {
            config.directives = Some(directives);
        }

        if let Some(output) = env_value(ENV_FORMAT).and_then(|value| TracingOutput::from_env_value(&value)) {
            config.output = output;
            config.ansi &= output != TracingOutput::Json;
        }

        if let Some(flag) = env_value(ENV_PERF_TRACING) {
            config.enable_performance_tracing = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(threshold_us) = env_value(ENV_PERF_THRESHOLD_US).and_then(|value| value.parse::<u64>().ok()) {
            config.performance_threshold_us = Some(threshold_us);
        }

        config
    }

    fn resolve_filter(&self) -> Result<EnvFilter, TracingSetupError> {
        match &self.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|err| TracingSetupError::InvalidFilter(err.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))),
        }
    }
}

/// Trimmed, non-empty value of an environment variable
fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Output format choices for the formatter layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    Compact,
    Pretty,
    Json,
}

impl TracingOutput {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Why the subscriber could not be installed.
#[derive(Debug, thiserror::Error)]
pub enum TracingSetupError {
    /// The directives are not valid `EnvFilter` syntax.
    #[error("invalid tracing directive: {0}")]
    InvalidFilter(String),

    /// Installing the global subscriber failed (usually because one is already set).
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

/// Subscriber for `config`, not yet installed.
pub fn build_subscriber(config: &TracingConfig) -> Result<impl Subscriber + Send + Sync, TracingSetupError> {
    let filter = config.resolve_filter()?;
    Ok(Registry::default().with(formatter_layer(config)).with(filter))
}

fn formatter_layer(config: &TracingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = config.span_events.clone();
    match config.output {
        TracingOutput::Compact => Box::new(
            tracing_fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(config.include_targets)
                .with_ansi(config.ansi)
                .with_span_events(span_events),
        ),
        TracingOutput::Pretty => Box::new(
            tracing_fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(config.include_targets)
                .with_ansi(config.ansi)
                .with_span_events(span_events),
        ),
        TracingOutput::Json => Box::new(
            tracing_fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_target(config.include_targets)
                .with_ansi(false)
                .with_span_events(span_events),
        ),
    }
}

/// Install the subscriber for `config` as the global default.
///
/// Also applies the performance-span switches from `config`.
pub fn init_global_tracing(config: &TracingConfig) -> Result<(), TracingSetupError> {
    performance::configure(config.enable_performance_tracing, config.performance_threshold_us);
    build_subscriber(config)?.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn reset_env() {
        for key in [
            ENV_PROFILE,
            ENV_DIRECTIVES,
            ENV_FORMAT,
            ENV_PERF_TRACING,
            ENV_PERF_THRESHOLD_US,
            "RUST_LOG",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn rejects_invalid_directive() {
        reset_env();
        let config = TracingConfig {
            directives: Some("=::invalid".to_string()),
            ..TracingConfig::default()
        };
        let result = build_subscriber(&config);
        assert!(matches!(result, Err(TracingSetupError::InvalidFilter(_))));
    }

    #[test]
    #[serial]
    fn builds_with_defaults() {
        reset_env();
        assert!(build_subscriber(&TracingConfig::default()).is_ok());
    }

    #[test]
    #[serial]
    fn from_env_respects_profile_and_format() {
        reset_env();
        env::set_var(ENV_PROFILE, "ci");
        env::set_var(ENV_FORMAT, "pretty");
        env::set_var(ENV_DIRECTIVES, "metric_center_core=trace");

        let config = TracingConfig::from_env();
        assert_eq!(config.directives.as_deref(), Some("metric_center_core=trace"));
        assert!(!config.ansi);
        assert_eq!(config.output, TracingOutput::Pretty);
        reset_env();
    }

    #[test]
    #[serial]
    fn from_env_reads_performance_switches() {
        reset_env();
        env::set_var(ENV_PERF_TRACING, "yes");
        env::set_var(ENV_PERF_THRESHOLD_US, "250");

        let config = TracingConfig::from_env();
        assert!(config.enable_performance_tracing);
        assert_eq!(config.performance_threshold_us, Some(250));
        reset_env();
    }

    #[test]
    #[serial]
    fn json_format_disables_ansi() {
        reset_env();
        env::set_var(ENV_FORMAT, "JSON");
        let config = TracingConfig::from_env();
        assert_eq!(config.output, TracingOutput::Json);
        assert!(!config.ansi);
        reset_env();
    }

    #[test]
    fn unknown_format_is_ignored() {
        assert_eq!(TracingOutput::from_env_value("xml"), None);
        assert_eq!(TracingOutput::from_env_value(" Compact "), Some(TracingOutput::Compact));
    }

    #[test]
    fn performance_preset_enables_spans() {
        let config = TracingConfig::for_performance();
        assert!(config.enable_performance_tracing);
        assert_eq!(config.output, TracingOutput::Json);
        assert!(config.directives.is_some());
    }
}
