use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CaseIntakeConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl CaseIntakeConfig {
    pub fn load() -> Result<Self, AppError> {
        // Also pulls in .env, so MONGO_* below can come from there
        let common_config = core_config::Config::load()?;

        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Builds the store settings from a key lookup; `MONGO_URI` has no default.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(CaseIntakeConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env(&lookup, "MONGO_URI", None)?,
                database: get_env(&lookup, "MONGO_DATABASE", Some("legal_intake_db"))?,
                collection: get_env(&lookup, "MONGO_COLLECTION", Some("cases"))?,
            },
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|val| !val.trim().is_empty()) {
        Some(val) => Ok(val),
        None => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} environment variable not set",
                key
            ))),
        },
    }
}
