use chrono::Utc;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{ClassifierPrediction, FoodReport, Recognition};
use crate::services::classifier::rank_predictions;
use crate::services::health::assess;
use crate::services::label_resolver::normalize;
use crate::services::{ImageClassifier, LabelResolver, NutritionTable, PresetLibrary};

/// Words that mark a classifier label as food even when no dish resolves.
const FOOD_RELATED_WORDS: &[&str] = &[
    "food", "dish", "meal", "cuisine", "cooking", "recipe", "eat", "dining", "indian", "spice", "vegetable", "rice",
    "bread", "sweet", "snack",
];

/// Turns a photo or a typed food name into a nutrition report.
pub struct FoodAnalyzer {
    resolver: Arc<LabelResolver>,
    nutrition: Arc<NutritionTable>,
    presets: Arc<PresetLibrary>,
    classifier: Option<Arc<dyn ImageClassifier>>,
    label_threshold: f64,
    confidence_floor: f64,
    preset_min_similarity: Option<f64>,
}

impl FoodAnalyzer {
    pub fn new(
        resolver: Arc<LabelResolver>,
        nutrition: Arc<NutritionTable>,
        presets: Arc<PresetLibrary>,
        classifier: Option<Arc<dyn ImageClassifier>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            resolver,
            nutrition,
            presets,
            classifier,
            label_threshold: config.label_threshold,
            confidence_floor: config.confidence_floor,
            preset_min_similarity: config.preset_min_similarity,
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Typed search: an exact dish name wins, then the resolved dish key, then
    /// any row containing the typed text.
    pub fn analyze_text(&self, text: &str) -> FoodReport {
        let query = text.trim().to_string();
        let mut notices = Vec::new();

        if query.is_empty() {
            notices.push("Enter a food name to analyze.".to_string());
            return self.report(query, None, notices);
        }

        let nutrition = match self.nutrition.exact(&query) {
            Some(record) => Some(record),
            None => {
                let key = self.resolver.resolve(&query, self.label_threshold);
                log::info!("🔤 Text search '{}' resolved to {:?}", query, key);
                key.as_deref()
                    .and_then(|k| self.nutrition.lookup(k))
                    .or_else(|| self.nutrition.lookup(&query))
            }
        }
        .cloned();

        let mut report = self.report(query, None, notices);
        report.assessment = nutrition.as_ref().map(assess);
        report.nutrition = nutrition;
        report
    }

    /// Photo analysis: preset comparison, then classifier labels, then the
    /// nutrition lookup. Collaborator failures end up in `notices`.
    pub async fn analyze_image(&self, image: &[u8]) -> FoodReport {
        let mut notices = Vec::new();

        let Some(classifier) = self.classifier.as_deref() else {
            notices.push("Image recognition is unavailable: no classifier endpoint configured.".to_string());
            return self.report(String::new(), None, notices);
        };

        let recognition = match self.match_preset(classifier, image, &mut notices).await {
            Some(preset) => Some(preset),
            None => self.classify(classifier, image, &mut notices).await,
        };

        let mut report = self.report(String::new(), recognition, notices);

        if let Some(name) = report.recognition.as_ref().and_then(Recognition::food_name) {
            report.query = name.to_string();
            match self.nutrition.lookup(name) {
                Some(record) => {
                    report.assessment = Some(assess(record));
                    report.nutrition = Some(record.clone());
                }
                None => log::warn!("⚠️ No nutrition information found for {}", name),
            }
        }

        report
    }

    async fn match_preset(
        &self,
        classifier: &dyn ImageClassifier,
        image: &[u8],
        notices: &mut Vec<String>,
    ) -> Option<Recognition> {
        if self.presets.is_empty() {
            return None;
        }

        let features = match classifier.extract_features(image).await {
            Ok(features) => features,
            Err(e) => {
                log::warn!("⚠️ Feature extraction failed, skipping presets: {}", e);
                notices.push(format!("Preset comparison skipped: {}", e));
                return None;
            }
        };

        let best = match self.presets.best_match(&features) {
            Ok(best) => best?,
            Err(e) => {
                log::warn!("⚠️ Preset comparison failed: {}", e);
                notices.push(format!("Preset comparison skipped: {}", e));
                return None;
            }
        };

        log::debug!("🖼️ Best preset '{}' scored {:.3}", best.name, best.score);

        if let Some(min) = self.preset_min_similarity {
            if best.score < min {
                log::debug!("🖼️ Preset score below {:.2}, using classifier", min);
                return None;
            }
        }

        Some(Recognition::Preset {
            name: best.name,
            score: best.score,
        })
    }

    async fn classify(
        &self,
        classifier: &dyn ImageClassifier,
        image: &[u8],
        notices: &mut Vec<String>,
    ) -> Option<Recognition> {
        let predictions = match classifier.classify(image).await {
            Ok(predictions) => rank_predictions(predictions),
            Err(e) => {
                log::error!("❌ Error recognizing food: {}", e);
                notices.push(format!("Error recognizing food: {}", e));
                return None;
            }
        };

        for prediction in &predictions {
            log::debug!("🔍 Prediction '{}' ({:.3})", prediction.label, prediction.confidence);
        }

        Some(self.resolve_predictions(&predictions))
    }

    /// First prediction at or above the confidence floor that resolves to a
    /// dish wins.
    fn resolve_predictions(&self, predictions: &[ClassifierPrediction]) -> Recognition {
        let resolved = predictions
            .iter()
            .filter(|p| p.confidence >= self.confidence_floor)
            .find_map(|p| {
                self.resolver
                    .resolve(&p.label, self.label_threshold)
                    .map(|key| (key, p))
            });

        if let Some((key, prediction)) = resolved {
            log::info!("✅ Recognized as {} (confidence: {:.2})", key, prediction.confidence);
            return Recognition::Classifier {
                key,
                label: prediction.label.clone(),
                confidence: prediction.confidence,
            };
        }

        let food_detected = predictions.iter().any(|p| looks_like_food(&p.label));
        log::info!("🤷 No dish resolved (food detected: {})", food_detected);
        Recognition::Unrecognized { food_detected }
    }

    fn report(&self, query: String, recognition: Option<Recognition>, notices: Vec<String>) -> FoodReport {
        FoodReport {
            query,
            recognition,
            nutrition: None,
            assessment: None,
            notices,
            analyzed_at: Utc::now(),
        }
    }
}

fn looks_like_food(label: &str) -> bool {
    let cleaned = normalize(label);
    FOOD_RELATED_WORDS.iter().any(|w| cleaned.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutritionRecord, PresetReference};
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockClassifier {
        predictions: Vec<(&'static str, f64)>,
        features: Vec<f32>,
        fail: bool,
        classify_calls: AtomicUsize,
    }

    impl MockClassifier {
        fn new(predictions: Vec<(&'static str, f64)>, features: Vec<f32>) -> Self {
            Self {
                predictions,
                features,
                fail: false,
                classify_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new(), Vec::new())
            }
        }
    }

    #[async_trait::async_trait]
    impl ImageClassifier for MockClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Vec<ClassifierPrediction>> {
            self.classify_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self
                .predictions
                .iter()
                .map(|(label, confidence)| ClassifierPrediction {
                    label: label.to_string(),
                    confidence: *confidence,
                })
                .collect())
        }

        async fn extract_features(&self, _image: &[u8]) -> Result<Vec<f32>> {
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.features.clone())
        }
    }

    fn record(name: &str, calories: f64) -> NutritionRecord {
        NutritionRecord {
            name: name.to_string(),
            calories,
            protein_g: 3.0,
            fat_g: 1.0,
            carbs_g: 20.0,
        }
    }

    fn table() -> Arc<NutritionTable> {
        Arc::new(NutritionTable::new(vec![
            record("Idli", 58.0),
            record("Masala Dosa", 168.0),
            record("Roti", 120.0),
            record("Butter Chicken", 438.0),
        ]))
    }

    fn preset(name: &str, vector: &[f32]) -> PresetReference {
        PresetReference {
            name: name.to_string(),
            feature_vector: vector.to_vec(),
        }
    }

    fn default_config() -> AppConfig {
        AppConfig::from_lookup(|_| None).unwrap()
    }

    fn analyzer(presets: Vec<PresetReference>, classifier: Option<Arc<MockClassifier>>, config: &AppConfig) -> FoodAnalyzer {
        FoodAnalyzer::new(
            Arc::new(LabelResolver::default()),
            table(),
            Arc::new(PresetLibrary::new(presets)),
            classifier.map(|c| c as Arc<dyn ImageClassifier>),
            config,
        )
    }

    #[tokio::test]
    async fn test_empty_presets_fall_through_to_classifier() {
        let classifier = Arc::new(MockClassifier::new(vec![("rice cake, idli style", 0.9)], vec![1.0]));
        let analyzer = analyzer(Vec::new(), Some(classifier.clone()), &default_config());

        let report = analyzer.analyze_image(b"jpeg").await;

        assert!(matches!(
            report.recognition,
            Some(Recognition::Classifier { ref key, .. }) if key == "idli"
        ));
        assert_eq!(report.nutrition.unwrap().name, "Idli");
        assert!(report.assessment.is_some());
        assert!(report.notices.is_empty());
        assert_eq!(classifier.classify_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preset_match_skips_classifier() {
        let classifier = Arc::new(MockClassifier::new(vec![("idli", 0.9)], vec![0.9, 0.1]));
        let analyzer = analyzer(
            vec![preset("masala dosa", &[1.0, 0.0]), preset("idli", &[0.0, 1.0])],
            Some(classifier.clone()),
            &default_config(),
        );

        let report = analyzer.analyze_image(b"jpeg").await;

        assert!(matches!(
            report.recognition,
            Some(Recognition::Preset { ref name, .. }) if name == "masala dosa"
        ));
        assert_eq!(report.nutrition.unwrap().name, "Masala Dosa");
        assert_eq!(classifier.classify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preset_gate_sends_weak_matches_to_classifier() {
        let config = AppConfig::from_lookup(|key| (key == "PRESET_MIN_SIMILARITY").then(|| "0.99".to_string())).unwrap();
        let classifier = Arc::new(MockClassifier::new(vec![("chappati", 0.8)], vec![0.7, 0.7]));
        let analyzer = analyzer(vec![preset("masala dosa", &[1.0, 0.0])], Some(classifier), &config);

        let report = analyzer.analyze_image(b"jpeg").await;

        assert!(matches!(
            report.recognition,
            Some(Recognition::Classifier { ref key, .. }) if key == "roti"
        ));
    }

    #[tokio::test]
    async fn test_low_confidence_predictions_are_skipped() {
        let classifier = Arc::new(MockClassifier::new(vec![("idli", 0.1), ("chapati", 0.5)], Vec::new()));
        let analyzer = analyzer(Vec::new(), Some(classifier), &default_config());

        let report = analyzer.analyze_image(b"jpeg").await;

        assert!(matches!(
            report.recognition,
            Some(Recognition::Classifier { ref key, confidence, .. }) if key == "roti" && confidence == 0.5
        ));
    }

    #[tokio::test]
    async fn test_unresolved_labels_report_food_detection() {
        let detected = analyzer(
            Vec::new(),
            Some(Arc::new(MockClassifier::new(vec![("golf ball", 0.6), ("dining table", 0.3)], Vec::new()))),
            &default_config(),
        )
        .analyze_image(b"jpeg")
        .await;
        assert_eq!(detected.recognition, Some(Recognition::Unrecognized { food_detected: true }));
        assert!(detected.nutrition.is_none());

        let nothing = analyzer(
            Vec::new(),
            Some(Arc::new(MockClassifier::new(vec![("golf ball", 0.6)], Vec::new()))),
            &default_config(),
        )
        .analyze_image(b"jpeg")
        .await;
        assert_eq!(nothing.recognition, Some(Recognition::Unrecognized { food_detected: false }));
    }

    #[tokio::test]
    async fn test_food_words_count_below_confidence_floor() {
        let report = analyzer(
            Vec::new(),
            Some(Arc::new(MockClassifier::new(vec![("golf ball", 0.7), ("dining table", 0.1)], Vec::new()))),
            &default_config(),
        )
        .analyze_image(b"jpeg")
        .await;

        assert_eq!(report.recognition, Some(Recognition::Unrecognized { food_detected: true }));
    }

    #[tokio::test]
    async fn test_classifier_failure_becomes_notice() {
        let analyzer = analyzer(
            vec![preset("idli", &[1.0])],
            Some(Arc::new(MockClassifier::failing())),
            &default_config(),
        );

        let report = analyzer.analyze_image(b"jpeg").await;

        assert!(report.recognition.is_none());
        assert_eq!(report.notices.len(), 2);
        assert!(report.notices[1].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_missing_classifier_is_reported() {
        let report = analyzer(Vec::new(), None, &default_config()).analyze_image(b"jpeg").await;
        assert!(report.recognition.is_none());
        assert!(report.notices[0].contains("unavailable"));
    }

    #[test]
    fn test_text_search_resolves_through_aliases() {
        let analyzer = analyzer(Vec::new(), None, &default_config());

        let report = analyzer.analyze_text("chappati");
        assert_eq!(report.nutrition.unwrap().name, "Roti");
        assert!(report.recognition.is_none());
    }

    #[test]
    fn test_text_search_falls_back_to_raw_text() {
        let analyzer = analyzer(Vec::new(), None, &default_config());

        let report = analyzer.analyze_text("Butter Chicken");
        assert_eq!(report.nutrition.as_ref().unwrap().calories, 438.0);
        assert_eq!(report.assessment.unwrap().badges[0].label, "High Calorie");

        assert!(analyzer.analyze_text("pizza").nutrition.is_none());
        assert!(!analyzer.analyze_text("  ").notices.is_empty());
    }

    #[test]
    fn test_exact_dish_name_beats_alias_key() {
        let nutrition = Arc::new(NutritionTable::new(vec![
            record("Chicken Curry", 240.0),
            record("Paneer Butter Masala", 350.0),
            record("Rice Kheer", 180.0),
            record("Jeera Rice", 150.0),
        ]));
        let analyzer = FoodAnalyzer::new(
            Arc::new(LabelResolver::default()),
            nutrition,
            Arc::new(PresetLibrary::default()),
            None,
            &default_config(),
        );

        assert_eq!(analyzer.analyze_text("Paneer Butter Masala").nutrition.unwrap().name, "Paneer Butter Masala");
        assert_eq!(analyzer.analyze_text("jeera rice").nutrition.unwrap().name, "Jeera Rice");
        // no exact row, so the alias key still decides
        assert_eq!(analyzer.analyze_text("gravy").nutrition.unwrap().name, "Chicken Curry");
    }
}
