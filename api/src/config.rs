use sd_infra::config::NotifierConfig;
use sd_shared::config::{DatabaseConfig, Environment, RateLimitConfig, ServerConfig};

/// Application configuration assembled from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub notifier: NotifierConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            notifier: NotifierConfig::from_env(),
            environment: Environment::from_env(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
