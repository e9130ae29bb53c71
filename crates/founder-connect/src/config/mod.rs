use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub listings: ListingConfig,
    pub wizard: WizardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let items_per_page = env::var("APP_ITEMS_PER_PAGE")
            .unwrap_or_else(|_| ListingConfig::DEFAULT_ITEMS_PER_PAGE.to_string())
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidItemsPerPage)?;

        let transition_delay_ms = env::var("APP_TRANSITION_DELAY_MS")
            .unwrap_or_else(|_| WizardConfig::DEFAULT_TRANSITION_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTransitionDelay)?;

        let idle_secs = env::var("APP_WIZARD_IDLE_SECS")
            .unwrap_or_else(|_| WizardConfig::DEFAULT_IDLE_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidWizardIdle)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            listings: ListingConfig { items_per_page },
            wizard: WizardConfig {
                transition_delay_ms,
                idle_secs,
            },
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Page sizing for the jobs and co-founder listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub items_per_page: usize,
}

impl ListingConfig {
    pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            items_per_page: Self::DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Timing of the animated step transitions and of idle run eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardConfig {
    pub transition_delay_ms: u64,
    pub idle_secs: u64,
}

impl WizardConfig {
    pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 300;
    pub const DEFAULT_IDLE_SECS: u64 = 30 * 60;

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// How long an untouched run is kept before it is discarded.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: Self::DEFAULT_TRANSITION_DELAY_MS,
            idle_secs: Self::DEFAULT_IDLE_SECS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidItemsPerPage,
    InvalidTransitionDelay,
    InvalidWizardIdle,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidItemsPerPage => {
                write!(f, "APP_ITEMS_PER_PAGE must be a positive integer")
            }
            ConfigError::InvalidTransitionDelay => {
                write!(f, "APP_TRANSITION_DELAY_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidWizardIdle => {
                write!(f, "APP_WIZARD_IDLE_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidItemsPerPage
            | ConfigError::InvalidTransitionDelay
            | ConfigError::InvalidWizardIdle => None,
        }
    }
}
