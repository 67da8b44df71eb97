use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use menuwise_recommend::ScoringWeights;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub scoring: ScoringWeights,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuConfig {
    /// IANA name used to decide "today" and the current meal period.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommenderConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// JSON weights for the learned scorer. Rules only when unset.
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_model_init_timeout_ms")]
    pub model_init_timeout_ms: u64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            model_path: None,
            model_init_timeout_ms: default_model_init_timeout_ms(),
        }
    }
}

fn default_result_limit() -> usize {
    8
}

fn default_model_init_timeout_ms() -> u64 {
    2000
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MENUWISE__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:menuwise.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MENUWISE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !menuwise_shared::is_known_timezone(&self.menu.timezone) {
            return Err(format!("Unknown menu timezone: {}", self.menu.timezone));
        }
        if self.recommender.result_limit == 0 {
            return Err("Recommender result_limit must be at least 1".to_string());
        }
        if self.recommender.model_init_timeout_ms == 0 {
            return Err("Recommender model_init_timeout_ms must be greater than 0".to_string());
        }

        self.scoring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            observability: ObservabilityConfig::default(),
            menu: MenuConfig::default(),
            recommender: RecommenderConfig::default(),
            scoring: ScoringWeights::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = valid_config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_timezone() {
        let mut config = valid_config();
        config.menu.timezone = "Mars/Olympus_Mons".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_weak_disliked_penalty() {
        let mut config = valid_config();
        config.scoring.disliked_penalty = 10.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("menuwise.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[menu]
timezone = "Europe/Paris"

[recommender]
result_limit = 5

[scoring]
favored_location = 20.0
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.display().to_string())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.menu.timezone, "Europe/Paris");
        assert_eq!(config.recommender.result_limit, 5);
        assert_eq!(config.recommender.model_path, None);
        assert_eq!(config.scoring.favored_location, 20.0);
        assert_eq!(config.scoring.dietary_match, 35.0);
    }
}
