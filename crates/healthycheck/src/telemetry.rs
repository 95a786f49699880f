use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow `APP_LOG_LEVEL`. Everything else logs at `warn`.
const APP_TARGETS: [&str; 2] = ["healthycheck", "healthycheck_api"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { directives: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { directives, .. } => {
                write!(f, "APP_LOG_LEVEL produced an invalid filter '{directives}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
///
/// A bare level such as `debug` applies to the app crates only, keeping
/// hyper and reqwest at `warn`. A value that already holds directives
/// (`healthycheck::store=trace`) is used as written.
pub fn default_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.is_empty() {
        return default_directives("info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = String::from("warn");
    for target in APP_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Install the global subscriber. `RUST_LOG` wins over `APP_LOG_LEVEL`.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = default_directives(&config.log_level);
            EnvFilter::try_new(&directives)
                .map_err(|source| TelemetryError::EnvFilter { directives, source })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
