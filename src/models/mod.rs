use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the nutrition table (values per serving).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    pub label: String,
    pub confidence: f64,
}

/// Curated reference image reduced to its feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetReference {
    pub name: String,
    pub feature_vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetMatch {
    pub name: String,
    pub score: f64,
}

/// How a food name was obtained from an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Recognition {
    Preset { name: String, score: f64 },
    Classifier { key: String, label: String, confidence: f64 },
    /// Nothing resolved. `food_detected` is set when a top prediction still
    /// looked like food.
    Unrecognized { food_detected: bool },
}

impl Recognition {
    pub fn food_name(&self) -> Option<&str> {
        match self {
            Recognition::Preset { name, .. } => Some(name),
            Recognition::Classifier { key, .. } => Some(key),
            Recognition::Unrecognized { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAssessment {
    pub badges: Vec<HealthBadge>,
}

impl HealthAssessment {
    pub fn summary(&self) -> String {
        self.badges
            .iter()
            .map(|b| b.note)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a text or image food analysis.
#[derive(Debug, Clone, Serialize)]
pub struct FoodReport {
    pub query: String,
    pub recognition: Option<Recognition>,
    pub nutrition: Option<NutritionRecord>,
    pub assessment: Option<HealthAssessment>,
    /// User-facing status lines collected while analysing.
    pub notices: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snacks",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

impl NutritionTotals {
    pub fn add(&mut self, other: &NutritionTotals) {
        self.calories += other.calories;
        self.protein_g += other.protein_g;
        self.fat_g += other.fat_g;
        self.carbs_g += other.carbs_g;
    }

    pub fn scaled(&self, factor: f64) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            carbs_g: self.carbs_g * factor,
        }
    }
}

impl From<&NutritionRecord> for NutritionTotals {
    fn from(record: &NutritionRecord) -> Self {
        NutritionTotals {
            calories: record.calories,
            protein_g: record.protein_g,
            fat_g: record.fat_g,
            carbs_g: record.carbs_g,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlan {
    pub meal_type: MealType,
    pub calorie_allocation: f64,
    pub foods: Vec<String>,
    /// Foods with no row in the nutrition table.
    pub unmatched_foods: Vec<String>,
    pub nutrition: NutritionTotals,
    /// False when the macros come from the default energy split.
    pub from_table: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietPlan {
    pub condition: String,
    pub display_name: String,
    pub description: String,
    pub daily_calories: f64,
    pub meals: Vec<MealPlan>,
    pub summary: NutritionTotals,
    pub avoid: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub name: String,
    pub nutrition: Option<NutritionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeNutrition {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: RecipeNutrition,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodInnovation {
    pub name: &'static str,
    pub ingredients: &'static [&'static str],
    pub why: &'static [&'static str],
    pub outcome: &'static str,
}
