//! Storage layer configuration

use serde::Deserialize;
use std::path::PathBuf;

/// MongoDB connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub database_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: "mongodb://localhost:27017".to_string(),
            database_name: "virion".to_string(),
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub connection_string: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            connection_string: "redis://localhost:6379".to_string(),
        }
    }
}

/// Complete storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    /// Root of the application data tree. Sample reads, subtraction
    /// indexes and history diff files all live under this path.
    pub data_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            data_path: PathBuf::from("data"),
        }
    }
}

impl StorageConfig {
    /// Loads the configuration from a file.
    pub fn load_from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        let config = settings.try_deserialize::<StorageConfig>();

        match config {
            Ok(cfg) => Ok(cfg),
            Err(_) => Ok(StorageConfig::default()),
        }
    }
}
