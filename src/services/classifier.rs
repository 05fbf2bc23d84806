use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::errors::EatError;
use crate::models::ClassifierPrediction;

/// Number of ranked predictions requested per image.
pub const TOP_K: usize = 10;

/// Pretrained image classifier (ranked labels plus an embedding).
#[async_trait::async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Ranked predictions, highest confidence first.
    async fn classify(&self, image: &[u8]) -> Result<Vec<ClassifierPrediction>>;

    /// Flattened feature vector used for preset comparison.
    async fn extract_features(&self, image: &[u8]) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    image: String,
    top_k: usize,
    include_features: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    predictions: Vec<ClassifierPrediction>,
    #[serde(default)]
    features: Option<Vec<f32>>,
}

/// Classifier served over HTTP: the image goes out base64-encoded, the
/// service answers with `{"predictions": [...], "features": [...]}`.
pub struct HttpImageClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpImageClassifier {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building classifier HTTP client")?;
        Ok(Self { endpoint, client })
    }

    async fn infer(&self, image: &[u8], include_features: bool) -> Result<InferenceResponse> {
        let request = InferenceRequest {
            image: general_purpose::STANDARD.encode(image),
            top_k: TOP_K,
            include_features,
        };

        log::debug!("📤 Classifier request: {} image bytes, features={}", image.len(), include_features);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EatError::collaborator("classifier", e.to_string()))?;

        let status = response.status();
        log::debug!("📥 Classifier response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Classifier error response: {}", error_text);
            return Err(EatError::collaborator("classifier", format!("HTTP {}: {}", status, error_text)).into());
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<InferenceResponse>(&body)
            .map_err(|e| EatError::malformed("classifier response", e.to_string()))?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<ClassifierPrediction>> {
        let response = self.infer(image, false).await?;
        Ok(rank_predictions(response.predictions))
    }

    async fn extract_features(&self, image: &[u8]) -> Result<Vec<f32>> {
        let response = self.infer(image, true).await?;
        match response.features {
            Some(features) if !features.is_empty() => Ok(features),
            _ => Err(EatError::malformed("classifier response", "no feature vector returned").into()),
        }
    }
}

/// Sort by confidence (descending, stable), clamp into [0, 1] and keep the
/// top `TOP_K`.
pub fn rank_predictions(mut predictions: Vec<ClassifierPrediction>) -> Vec<ClassifierPrediction> {
    predictions.retain(|p| p.confidence.is_finite());
    for p in &mut predictions {
        p.confidence = p.confidence.clamp(0.0, 1.0);
    }
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(TOP_K);
    predictions
}
