use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "smartpay.toml";
pub const ENV_PREFIX: &str = "SMARTPAY_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted batch upload body
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    pub model_path: PathBuf,
    /// Reference CSV whose `Occupation` column feeds the occupation choices
    pub dataset_path: PathBuf,
    pub evaluation_dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best_salary_regressor.json"),
            dataset_path: PathBuf::from("DATASET.csv"),
            evaluation_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    /// Rows shown in the batch upload preview
    pub preview_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Render the images that exist instead of failing the whole panel
    pub partial: bool,
    /// Command named in the fallback notice
    pub training_hint: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            partial: false,
            training_hint: "train.py".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info,actix_web=warn`
    pub log_filter: Option<String>,
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub display: DisplayConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    /// Defaults, then `smartpay.toml`, then `SMARTPAY_*` variables
    /// (`__` separates nested keys, e.g. `SMARTPAY_SERVER__PORT`).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.preview_rows == 0 {
            return Err(AppError::ConfigError(
                "display.preview_rows must be > 0".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(AppError::ConfigError(
                "server.max_upload_bytes must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}
