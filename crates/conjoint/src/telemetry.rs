use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Dependencies stay at this level unless a full filter is configured.
const DEPENDENCY_LEVEL: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directives}'")]
    EnvFilter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("a global subscriber is already installed: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Expands a bare level such as `debug` into `warn,conjoint=debug` so the
/// calculator's own events follow the configured level while the numeric and
/// parsing dependencies stay quiet. Anything with a target or a list is
/// taken as a complete filter.
fn directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{DEPENDENCY_LEVEL},conjoint={level}")
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
/// Events go to stderr; stdout carries the report.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = directives(&config.log_level);
            EnvFilter::try_new(&directives)
                .map_err(|source| TelemetryError::EnvFilter { directives, source })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
