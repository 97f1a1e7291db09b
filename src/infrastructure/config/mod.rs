use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

const DEFAULT_CONFIG_FILE: &str = "casewright.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    #[serde(deserialize_with = "deserialize_flag")]
    pub enable_commit: bool,
    pub commit_message: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub enable_push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enable_commit: false,
            commit_message: "Add uploaded image".to_string(),
            enable_push: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub images_dir: PathBuf,
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
    pub git: GitConfig,
    #[validate(nested)]
    pub provider: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            images_dir: PathBuf::from("images"),
            max_upload_bytes: 10 * 1024 * 1024,
            git: GitConfig::default(),
            provider: LLMConfig::default(),
        }
    }
}

pub struct ConfigService;

impl ConfigService {
    /// Loads `.env`, then layers defaults, the TOML file, `CASEWRIGHT_*`
    /// variables and the legacy variable names.
    pub fn load() -> Result<AppConfig> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("CASEWRIGHT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Extracts the layered configuration and rejects out-of-range values.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(path).extract()?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CASEWRIGHT_").split("__"))
            .merge(legacy_var("PORT", "port"))
            .merge(legacy_var("ENABLE_GIT_COMMIT", "git.enable_commit"))
            .merge(legacy_var("GIT_COMMIT_MESSAGE", "git.commit_message"))
            .merge(legacy_var("ENABLE_GIT_PUSH", "git.enable_push"))
            .merge(legacy_var("AI_ENDPOINT", "provider.endpoint"))
            .merge(legacy_var("AI_API_KEY", "provider.api_key"))
            .merge(legacy_var("AI_TIMEOUT_SECS", "provider.timeout_secs"))
            .merge(legacy_var("AI_FORMAT", "provider.format"))
            .merge(legacy_var("AI_MODEL", "provider.model"))
    }
}

fn legacy_var(name: &'static str, key: &'static str) -> Env {
    Env::raw().only(&[name]).map(move |_| key.into())
}

/// Accepts `true`/`false`, numbers, and the `"1"`/`"0"` strings used by the legacy
/// environment flags.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(value) => Ok(value != 0),
        Flag::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag value: {}", other))),
        },
    }
}
