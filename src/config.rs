use std::path::PathBuf;
use std::time::Duration;

use crate::errors::EatError;
use crate::services::label_resolver::DEFAULT_THRESHOLD;

pub const DEFAULT_NUTRITION_CSV: &str = "data/Indian_Food_Nutrition_Processed.csv";
pub const DEFAULT_PRESET_DIR: &str = "preset_images";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-4-scout:free";
/// Classifier predictions below this confidence are not resolved to dishes.
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.2;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub nutrition_csv: PathBuf,
    pub preset_dir: PathBuf,
    /// Image classification endpoint. Image analysis is disabled when unset.
    pub classifier_url: Option<String>,
    /// Recipe generation is disabled when unset.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub label_threshold: f64,
    pub confidence_floor: f64,
    /// Minimum cosine similarity for a preset match to count. Unset means any
    /// best match is accepted.
    pub preset_min_similarity: Option<f64>,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, EatError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let label_threshold = match non_empty("LABEL_MATCH_THRESHOLD") {
            Some(raw) => parse_unit_interval("LABEL_MATCH_THRESHOLD", &raw)?,
            None => DEFAULT_THRESHOLD,
        };
        let confidence_floor = match non_empty("CLASSIFIER_CONFIDENCE_FLOOR") {
            Some(raw) => parse_unit_interval("CLASSIFIER_CONFIDENCE_FLOOR", &raw)?,
            None => DEFAULT_CONFIDENCE_FLOOR,
        };
        let preset_min_similarity = match non_empty("PRESET_MIN_SIMILARITY") {
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| EatError::Config {
                    key: "PRESET_MIN_SIMILARITY",
                    message: format!("'{}' is not a number", raw),
                })?;
                // cosine similarity lives in [-1, 1]
                if !(-1.0..=1.0).contains(&value) {
                    return Err(EatError::Config {
                        key: "PRESET_MIN_SIMILARITY",
                        message: format!("{} is outside [-1, 1]", value),
                    });
                }
                Some(value)
            }
            None => None,
        };
        let http_timeout = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| EatError::Config {
                    key: "HTTP_TIMEOUT_SECS",
                    message: format!("'{}' is not a whole number of seconds", raw),
                })?;
                Duration::from_secs(secs.max(1))
            }
            None => Duration::from_secs(30),
        };

        Ok(Self {
            nutrition_csv: non_empty("NUTRITION_CSV")
                .unwrap_or_else(|| DEFAULT_NUTRITION_CSV.to_string())
                .into(),
            preset_dir: non_empty("PRESET_IMAGE_DIR")
                .unwrap_or_else(|| DEFAULT_PRESET_DIR.to_string())
                .into(),
            classifier_url: non_empty("CLASSIFIER_URL"),
            openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            openrouter_model: non_empty("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            label_threshold,
            confidence_floor,
            preset_min_similarity,
            http_timeout,
        })
    }
}

fn parse_unit_interval(key: &'static str, raw: &str) -> Result<f64, EatError> {
    let value: f64 = raw.parse().map_err(|_| EatError::Config {
        key,
        message: format!("'{}' is not a number", raw),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(EatError::Config {
            key,
            message: format!("{} is outside [0, 1]", value),
        });
    }
    Ok(value)
}
