use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use crate::dns_protocol::UpstreamAddr;

const LOCAL_CONFIG_PATH: &str = "ferrous-stub.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-stub/config.toml";

/// Main configuration structure for Ferrous Stub
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolver behaviour (servers, timing, cache)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-stub.toml in current directory
    /// 3. /etc/ferrous-stub/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if !overrides.servers.is_empty() {
            self.resolver.servers = overrides.servers;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.resolver.timeout_ms = timeout_ms;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation("Timeout cannot be 0".to_string()));
        }
        if resolver.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "Cache capacity cannot be 0".to_string(),
            ));
        }
        if resolver.grace_period_ms == 0 {
            return Err(ConfigError::Validation(
                "Grace period cannot be 0".to_string(),
            ));
        }
        if resolver.send_attempts == 0 {
            return Err(ConfigError::Validation(
                "Send attempts cannot be 0".to_string(),
            ));
        }

        for server in &resolver.servers {
            UpstreamAddr::parse(server)
                .map_err(|e| ConfigError::InvalidServer(server.clone(), e.to_string()))?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub servers: Vec<String>,
    pub timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}
