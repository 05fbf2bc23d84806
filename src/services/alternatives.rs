use std::sync::Arc;

use super::label_resolver::{normalize, LabelResolver};
use super::nutrition::NutritionTable;
use crate::models::{Alternative, NutritionRecord};

/// Most rows returned by the nutrition-table fallback.
pub const MAX_FALLBACK_ALTERNATIVES: usize = 5;

/// Hand-picked swaps keyed by canonical dish key.
static SWAPS: &[(&str, &[&str])] = &[
    ("samosa", &["Baked samosa", "Dhokla", "Sprouts chaat"]),
    ("pakora", &["Vegetable cutlet", "Dhokla", "Roasted chana"]),
    ("vada", &["Idli", "Dhokla", "Moong dal chilla"]),
    ("puri", &["Chapati", "Phulka", "Jowar roti"]),
    ("paratha", &["Chapati", "Methi thepla", "Jowar roti"]),
    ("naan", &["Tandoori roti", "Missi roti", "Chapati"]),
    ("rice", &["Brown rice", "Quinoa pulao", "Vegetable daliya"]),
    ("biryani", &["Vegetable pulao", "Brown rice pulao", "Quinoa pulao"]),
    ("dosa", &["Ragi dosa", "Oats dosa", "Moong dal chilla"]),
    ("pav bhaji", &["Vegetable soup", "Millet upma", "Sprouts salad"]),
    ("bhel puri", &["Sprouts chaat", "Roasted makhana", "Fruit chaat"]),
    ("paneer", &["Tofu", "Grilled paneer", "Curd"]),
    ("gulab jamun", &["Fruit salad", "Ragi ladoo", "Dates"]),
    ("jalebi", &["Fruit chaat", "Dates", "Ragi ladoo"]),
    ("kheer", &["Ragi kheer", "Fruit custard", "Curd with fruits"]),
    ("rasgulla", &["Fruit salad", "Curd with fruits", "Dates"]),
    ("laddu", &["Ragi ladoo", "Dry fruit ladoo", "Dates"]),
    ("barfi", &["Dry fruit ladoo", "Roasted makhana", "Dates"]),
];

/// Healthier swaps for a food: the static table first, otherwise lighter
/// rows from the nutrition table.
pub struct HealthyAlternatives {
    resolver: Arc<LabelResolver>,
    nutrition: Arc<NutritionTable>,
    threshold: f64,
}

impl HealthyAlternatives {
    pub fn new(resolver: Arc<LabelResolver>, nutrition: Arc<NutritionTable>, threshold: f64) -> Self {
        Self {
            resolver,
            nutrition,
            threshold,
        }
    }

    /// Empty when the food is neither in the swap table nor the nutrition table.
    pub fn find(&self, food: &str) -> Vec<Alternative> {
        let query = normalize(food).trim().to_string();
        if query.is_empty() {
            return Vec::new();
        }

        let key = if swaps_for(&query).is_some() {
            Some(query.clone())
        } else {
            self.resolver.resolve(&query, self.threshold)
        };

        if let Some(swaps) = key.as_deref().and_then(swaps_for) {
            log::debug!("🥗 Static swaps for '{}' via '{}'", food, key.as_deref().unwrap_or_default());
            return swaps
                .iter()
                .map(|name| Alternative {
                    name: name.to_string(),
                    nutrition: self.nutrition.lookup(name).cloned(),
                })
                .collect();
        }

        let base = self
            .nutrition
            .lookup(&query)
            .or_else(|| key.as_deref().and_then(|k| self.nutrition.lookup(k)));

        match base {
            Some(base) => self.lighter_than(base),
            None => {
                log::debug!("🥗 No alternatives known for '{}'", food);
                Vec::new()
            }
        }
    }

    /// Rows with fewer calories and no more fat than `base`, lightest first.
    fn lighter_than(&self, base: &NutritionRecord) -> Vec<Alternative> {
        let mut lighter: Vec<&NutritionRecord> = self
            .nutrition
            .records()
            .iter()
            .filter(|r| r.calories < base.calories && r.fat_g <= base.fat_g)
            .filter(|r| !r.name.eq_ignore_ascii_case(&base.name))
            .collect();
        lighter.sort_by(|a, b| a.calories.total_cmp(&b.calories));
        lighter.truncate(MAX_FALLBACK_ALTERNATIVES);

        lighter
            .into_iter()
            .map(|r| Alternative {
                name: r.name.clone(),
                nutrition: Some(r.clone()),
            })
            .collect()
    }
}

fn swaps_for(key: &str) -> Option<&'static [&'static str]> {
    SWAPS.iter().find(|(k, _)| *k == key).map(|(_, swaps)| *swaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::label_resolver::DEFAULT_THRESHOLD;

    fn record(name: &str, calories: f64, fat_g: f64) -> NutritionRecord {
        NutritionRecord {
            name: name.to_string(),
            calories,
            protein_g: 2.0,
            fat_g,
            carbs_g: 10.0,
        }
    }

    fn service(records: Vec<NutritionRecord>) -> HealthyAlternatives {
        HealthyAlternatives::new(
            Arc::new(LabelResolver::default()),
            Arc::new(NutritionTable::new(records)),
            DEFAULT_THRESHOLD,
        )
    }

    fn names(alternatives: &[Alternative]) -> Vec<&str> {
        alternatives.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_every_swap_key_is_a_known_dish() {
        let resolver = LabelResolver::default();
        let keys: Vec<&str> = resolver.table().keys().collect();
        for (key, swaps) in SWAPS {
            assert!(keys.contains(key), "unknown dish key {}", key);
            assert!(!swaps.is_empty());
        }
    }

    #[test]
    fn test_static_swap_is_enriched_from_table() {
        let alternatives = service(vec![record("Chapati", 120.0, 3.0)]).find("Puri");

        assert_eq!(names(&alternatives), vec!["Chapati", "Phulka", "Jowar roti"]);
        assert_eq!(alternatives[0].nutrition.as_ref().unwrap().calories, 120.0);
        assert!(alternatives[1].nutrition.is_none());
    }

    #[test]
    fn test_static_swap_through_resolver() {
        // misspelling of puri
        let alternatives = service(Vec::new()).find("poori");
        assert_eq!(names(&alternatives), vec!["Chapati", "Phulka", "Jowar roti"]);
    }

    #[test]
    fn test_table_fallback_is_lighter_and_sorted() {
        let alternatives = service(vec![
            record("Butter Chicken", 400.0, 25.0),
            record("Tandoori Chicken", 260.0, 10.0),
            record("Chicken Soup", 90.0, 3.0),
            record("Fried Fish", 300.0, 30.0),
            record("Mutton Curry", 450.0, 20.0),
            record("Egg Curry", 210.0, 14.0),
        ])
        .find("butter chicken");

        assert_eq!(names(&alternatives), vec!["Chicken Soup", "Egg Curry", "Tandoori Chicken"]);
    }

    #[test]
    fn test_table_fallback_caps_results() {
        let mut records = vec![record("Mega Thali", 1000.0, 50.0)];
        records.extend((0..8).map(|i| record(&format!("Light {}", i), 100.0 + i as f64, 1.0)));

        let alternatives = service(records).find("mega thali");
        assert_eq!(alternatives.len(), MAX_FALLBACK_ALTERNATIVES);
        assert_eq!(alternatives[0].name, "Light 0");
    }

    #[test]
    fn test_unknown_food_has_no_alternatives() {
        let svc = service(vec![record("Idli", 58.0, 0.4)]);
        assert!(svc.find("xyzzy").is_empty());
        assert!(svc.find("   ").is_empty());
    }
}
