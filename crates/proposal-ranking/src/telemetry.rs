use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}' for the ranking service")
            }
            TelemetryError::Subscriber(err) => write!(f, "tracing subscriber error: {err}"),
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

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level_when_rust_log_unset() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "proposal_ranking=verbose".to_string(),
        };
        match env_filter(&config) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, config.log_level),
            other => panic!("expected env filter error, got {other:?}"),
        }
    }
}
