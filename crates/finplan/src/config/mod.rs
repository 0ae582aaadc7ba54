use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::assessment::QuestionBank;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub dialogue: DialogueConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let suggestion_batch = read_positive("FINPLAN_SUGGESTION_BATCH", 10)?;
        let suggestion_attempts = read_positive("FINPLAN_SUGGESTION_ATTEMPTS", 3)?;
        let question_toggles = parse_toggles(
            &env::var("FINPLAN_DISABLED_QUESTIONS").unwrap_or_default(),
        )?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let record_dir = env::var("FINPLAN_RECORD_DIR").unwrap_or_else(|_| "user_data".to_string());

        Ok(Self {
            environment,
            dialogue: DialogueConfig {
                suggestion_batch,
                suggestion_attempts,
                question_toggles,
            },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                record_dir: PathBuf::from(record_dir),
            },
        })
    }
}

/// Settings steering the assessment and goal-setting dialogue.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueConfig {
    /// Number of suggestions requested per page.
    pub suggestion_batch: usize,
    /// Upper bound on suggestion re-requests when a batch comes back short.
    pub suggestion_attempts: usize,
    /// Question id to enabled flag. Ids not listed stay enabled.
    pub question_toggles: BTreeMap<String, bool>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            suggestion_batch: 10,
            suggestion_attempts: 3,
            question_toggles: BTreeMap::new(),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where collaborators keep completed session records.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub record_dir: PathBuf,
}

fn read_positive(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidCount { var, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

fn parse_toggles(raw: &str) -> Result<BTreeMap<String, bool>, ConfigError> {
    let known = QuestionBank::known_ids();
    let mut toggles = BTreeMap::new();
    for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !known.contains(&id) {
            return Err(ConfigError::UnknownQuestion(id.to_string()));
        }
        toggles.insert(id.to_string(), false);
    }
    Ok(toggles)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidCount { var: &'static str, value: String },
    UnknownQuestion(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCount { var, value } => {
                write!(f, "{var} must be a positive whole number (found '{value}')")
            }
            ConfigError::UnknownQuestion(id) => {
                write!(f, "FINPLAN_DISABLED_QUESTIONS names unknown question '{id}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
