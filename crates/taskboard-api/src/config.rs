use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use taskboard_db::DatabaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process settings, read from environment variables (`MONGO_DB_URI`,
/// `API_PORT`, ...). The two Mongo variables are required.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mongo_db_uri: String,
    pub mongo_db_name: String,
    pub api_port: u16,
    pub query_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_port", 3000)?
            .set_default("query_timeout_secs", 30)?
            .set_default("connect_timeout_secs", 10)?
            .set_default("shutdown_grace_secs", 10)?
            .set_default("log_format", "pretty")?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        let mut config = DatabaseConfig::new(&self.mongo_db_uri, &self.mongo_db_name);
        config.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        config.query_timeout = Duration::from_secs(self.query_timeout_secs);
        config
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
