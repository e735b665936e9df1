//! Shared configuration for the product catalog pipeline.

mod app_config;
mod config;

use thiserror::Error;

pub use app_config::{
    AppConfig, ScraperConfig, DEFAULT_API_URL, DEFAULT_BASE_URL, DEFAULT_CITY_ID,
    DEFAULT_USER_AGENT,
};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
