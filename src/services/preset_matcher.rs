use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::classifier::ImageClassifier;
use super::similarity::cosine_similarity;
use crate::errors::EatError;
use crate::models::{PresetMatch, PresetReference};

/// Curated reference photos reduced to feature vectors, in sorted file order.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    references: Vec<PresetReference>,
}

impl PresetLibrary {
    #[cfg(test)]
    pub fn new(references: Vec<PresetReference>) -> Self {
        Self { references }
    }

    /// Extract features for every `*.jpg` / `*.jpeg` in `dir`. The file stem
    /// becomes the preset name. Unreadable images and vectors whose length
    /// differs from the first preset are skipped with a warning.
    pub async fn load(dir: &Path, classifier: &dyn ImageClassifier) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("preset image directory {} not found", dir.display());
        }

        let paths = list_images(dir)?;
        let mut references: Vec<PresetReference> = Vec::with_capacity(paths.len());

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let features = match tokio::fs::read(&path).await {
                Ok(bytes) => classifier.extract_features(&bytes).await,
                Err(e) => Err(e.into()),
            };

            match features {
                Ok(feature_vector) => {
                    if let Some(first) = references.first() {
                        if first.feature_vector.len() != feature_vector.len() {
                            log::warn!(
                                "⚠️ Preset '{}' has {} features, expected {}; skipping",
                                name,
                                feature_vector.len(),
                                first.feature_vector.len()
                            );
                            continue;
                        }
                    }
                    log::debug!("🖼️ Loaded preset '{}'", name);
                    references.push(PresetReference { name, feature_vector });
                }
                Err(e) => log::warn!("⚠️ Error loading preset image {}: {}", name, e),
            }
        }

        log::info!("✅ Loaded {} preset images from {}", references.len(), dir.display());
        Ok(Self { references })
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Highest cosine similarity across all presets; the first preset wins a
    /// tie. `None` (score 0.0) when the library is empty. No minimum score is
    /// applied here.
    pub fn best_match(&self, features: &[f32]) -> Result<Option<PresetMatch>, EatError> {
        let mut best: Option<PresetMatch> = None;

        for reference in &self.references {
            let score = cosine_similarity(features, &reference.feature_vector)?;
            let better = match &best {
                Some(current) => score > current.score,
                None => true,
            };
            if better {
                best = Some(PresetMatch {
                    name: reference.name.clone(),
                    score,
                });
            }
        }

        Ok(best)
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
            .unwrap_or(false);
        if is_jpeg && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
