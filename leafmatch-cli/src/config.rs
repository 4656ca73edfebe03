//! JSON configuration for the CLI.

use leafmatch::dataset::{DatasetConfig, DEFAULT_AUXILIARY_COLUMN};
use leafmatch::Threshold;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfigJson {
    pub metadata_path: String,
    pub images_dir: String,
    pub auxiliary_column: String,
}

impl Default for DatasetConfigJson {
    fn default() -> Self {
        Self {
            metadata_path: String::new(),
            images_dir: String::new(),
            auxiliary_column: DEFAULT_AUXILIARY_COLUMN.to_owned(),
        }
    }
}

impl DatasetConfigJson {
    pub fn to_config(&self) -> DatasetConfig {
        DatasetConfig::new(&self.metadata_path, &self.images_dir)
            .with_auxiliary_column(self.auxiliary_column.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotifyConfigJson {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub recipient: String,
    /// Login name; the sender address when absent.
    pub username: Option<String>,
    /// Environment variable holding the SMTP password.
    pub password_env: String,
}

impl Default for NotifyConfigJson {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_owned(),
            smtp_port: 587,
            sender: String::new(),
            recipient: String::new(),
            username: None,
            password_env: "LEAFMATCH_SMTP_PASSWORD".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query_path: String,
    pub dataset: DatasetConfigJson,
    pub match_threshold: f64,
    pub output_path: Option<String>,
    pub notify: NotifyConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_path: String::new(),
            dataset: DatasetConfigJson::default(),
            match_threshold: Threshold::DEFAULT.value(),
            output_path: None,
            notify: NotifyConfigJson::default(),
        }
    }
}

impl Config {
    /// Checks the fields that have no usable default.
    pub fn validate(&self, query_override: Option<&PathBuf>) -> Result<(), String> {
        if self.query_path.is_empty() && query_override.is_none() {
            return Err("query_path must be set in the config or passed with --image".into());
        }
        if self.dataset.metadata_path.is_empty() || self.dataset.images_dir.is_empty() {
            return Err("dataset.metadata_path and dataset.images_dir must be set".into());
        }
        Ok(())
    }
}
