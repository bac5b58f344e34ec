use crate::model::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn default_database_path() -> String {
    "feedback.db".to_string()
}

fn default_quiz_title() -> String {
    "Product Feedback".to_string()
}

fn default_total_pages() -> u32 {
    9
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_quiz_title")]
    pub quiz_title: String,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    /// Question key -> page number it belongs to.
    #[serde(default)]
    pub question_pages: HashMap<String, u32>,
    pub import_path: Option<String>,
    pub report_path: Option<String>,
    pub report_interval_seconds: Option<u64>,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
