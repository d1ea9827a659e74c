use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Upper bound on proposals accepted in a single comparison request.
pub const DEFAULT_MAX_PROPOSALS: usize = 200;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the ranking service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("RANKING_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("RANKING_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("RANKING_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("RANKING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_proposals = match env::var("RANKING_MAX_PROPOSALS") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidProposalLimit { value: raw }),
            },
            Err(_) => DEFAULT_MAX_PROPOSALS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ranking: RankingConfig { max_proposals },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Request-shaping limits for the ranking endpoints.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub max_proposals: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_proposals: DEFAULT_MAX_PROPOSALS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidProposalLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "RANKING_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "RANKING_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidProposalLimit { value } => write!(
                f,
                "RANKING_MAX_PROPOSALS must be a positive integer (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidProposalLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
