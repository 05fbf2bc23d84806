use thiserror::Error;

/// Failures the food services surface to their callers.
///
/// Expected misses (unknown dish, unresolved label) are never errors; they
/// come back as `None`.
#[derive(Debug, Error)]
pub enum EatError {
    #[error("feature vectors differ in length: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("daily calorie target must be a positive number, got {0}")]
    InvalidCalorieTarget(f64),

    #[error("could not parse {what}: {reason}")]
    MalformedPayload { what: &'static str, reason: String },

    #[error("{service} call failed: {message}")]
    Collaborator { service: &'static str, message: String },

    #[error("invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("nutrition CSV is missing column '{0}'")]
    MissingColumn(&'static str),
}

impl EatError {
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            what,
            reason: reason.into(),
        }
    }

    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            service,
            message: message.into(),
        }
    }
}
