use std::sync::Arc;

use super::nutrition::NutritionTable;
use crate::errors::EatError;
use crate::models::{DietPlan, MealPlan, MealType, NutritionRecord, NutritionTotals};
use crate::models::MealType::{Breakfast as B, Dinner as D, Lunch as L, Snack as S};

/// Share of the daily calorie target given to each meal. Sums to 1.0.
pub const MEAL_FRACTIONS: [(MealType, f64); 4] = [(B, 0.25), (L, 0.35), (D, 0.30), (S, 0.10)];

/// Energy split used when none of a meal's foods are in the table:
/// 20% protein, 30% fat, 50% carbohydrate.
const FALLBACK_SPLIT: (f64, f64, f64) = (0.20, 0.30, 0.50);
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARBS: f64 = 4.0;

/// Per-serving bounds used to pick suitable foods from the nutrition table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NutrientLimits {
    pub max_calories: Option<f64>,
    pub max_fat_g: Option<f64>,
    pub max_carbs_g: Option<f64>,
    pub min_protein_g: Option<f64>,
}

impl NutrientLimits {
    pub fn allows(&self, record: &NutritionRecord) -> bool {
        self.max_calories.map_or(true, |max| record.calories <= max)
            && self.max_fat_g.map_or(true, |max| record.fat_g <= max)
            && self.max_carbs_g.map_or(true, |max| record.carbs_g <= max)
            && self.min_protein_g.map_or(true, |min| record.protein_g >= min)
    }
}

#[derive(Debug)]
pub struct Condition {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Recommended foods and the meals each one suits, in serving order.
    pub recommended: &'static [(&'static str, &'static [MealType])],
    pub avoid: &'static [&'static str],
    pub tips: &'static [&'static str],
    pub limits: NutrientLimits,
}

impl Condition {
    pub fn foods_for(&self, meal_type: MealType) -> Vec<&'static str> {
        self.recommended
            .iter()
            .filter(|(_, meals)| meals.contains(&meal_type))
            .map(|(food, _)| *food)
            .collect()
    }
}

pub static CONDITIONS: &[Condition] = &[
    Condition {
        key: "diabetes",
        display_name: "Diabetes",
        description: "Low glycemic index meals built on whole grains, pulses and vegetables, with protein at every meal to keep blood sugar steady.",
        recommended: &[
            ("Ragi dosa", &[B]),
            ("Moong dal chilla", &[B]),
            ("Vegetable upma", &[B]),
            ("Multigrain roti", &[L, D]),
            ("Moong dal", &[L]),
            ("Palak paneer", &[L]),
            ("Bitter gourd sabzi", &[L]),
            ("Vegetable khichdi", &[D]),
            ("Grilled fish", &[D]),
            ("Methi sabzi", &[D]),
            ("Sprouts salad", &[S]),
            ("Buttermilk", &[S]),
            ("Roasted chana", &[S]),
        ],
        avoid: &[
            "Refined carbohydrates",
            "Sugary foods and drinks",
            "Processed foods",
            "High-fat dairy products",
            "Fried foods",
            "Sweetened beverages",
            "White rice and maida products",
            "Red meat",
            "Processed meats",
        ],
        tips: &[
            "Eat small, frequent meals",
            "Include protein with every meal",
            "Choose low glycemic index foods",
            "Stay hydrated with water and herbal teas",
            "Include fiber-rich vegetables",
            "Use healthy cooking methods (steaming, grilling)",
        ],
        limits: NutrientLimits {
            max_calories: Some(300.0),
            max_fat_g: None,
            max_carbs_g: Some(30.0),
            min_protein_g: None,
        },
    },
    Condition {
        key: "heart_disease",
        display_name: "Heart Disease",
        description: "Fiber-rich, low saturated fat meals with plant proteins and omega-3 sources to support healthy cholesterol levels.",
        recommended: &[
            ("Oats porridge", &[B]),
            ("Idli", &[B]),
            ("Sambar", &[B, L]),
            ("Brown rice", &[L]),
            ("Rajma", &[L]),
            ("Mixed vegetable curry", &[L, D]),
            ("Grilled fish", &[D]),
            ("Chapati", &[D]),
            ("Lentil soup", &[D]),
            ("Fruit salad", &[S]),
            ("Walnuts", &[S]),
        ],
        avoid: &[
            "Fried foods",
            "Processed foods",
            "High-fat dairy",
            "Red meat",
            "Sugary foods",
            "Refined carbohydrates",
            "High-sodium foods",
            "Processed meats",
            "High-fat animal products",
        ],
        tips: &[
            "Choose healthy fats",
            "Eat fiber-rich foods",
            "Limit salt intake",
            "Stay active",
            "Maintain healthy weight",
            "Include omega-3 rich foods",
        ],
        limits: NutrientLimits {
            max_calories: Some(350.0),
            max_fat_g: Some(10.0),
            max_carbs_g: None,
            min_protein_g: None,
        },
    },
    Condition {
        key: "hypertension",
        display_name: "Hypertension",
        description: "Fresh, home-cooked, low-sodium meals rich in potassium from vegetables, fruits and pulses.",
        recommended: &[
            ("Vegetable poha", &[B]),
            ("Banana", &[B, S]),
            ("Curd", &[B, L]),
            ("Moong dal", &[L]),
            ("Vegetable pulao", &[L]),
            ("Palak sabzi", &[L, D]),
            ("Chapati", &[D]),
            ("Lauki curry", &[D]),
            ("Grilled chicken", &[D]),
            ("Coconut water", &[S]),
            ("Sprouts salad", &[S]),
        ],
        avoid: &[
            "Processed foods",
            "Canned foods",
            "Pickles and papads",
            "High-sodium foods",
            "Fried foods",
            "Processed meats",
            "Salted snacks",
            "Red meat",
        ],
        tips: &[
            "Limit salt intake",
            "Read food labels",
            "Cook at home",
            "Use herbs for flavor",
            "Choose fresh over processed",
            "Include potassium-rich foods",
        ],
        limits: NutrientLimits {
            max_calories: Some(350.0),
            max_fat_g: Some(12.0),
            max_carbs_g: None,
            min_protein_g: None,
        },
    },
    Condition {
        key: "obesity",
        display_name: "Obesity",
        description: "Calorie-controlled, high-fiber meals with lean proteins that keep you full on fewer calories.",
        recommended: &[
            ("Vegetable oats upma", &[B]),
            ("Moong dal chilla", &[B]),
            ("Multigrain roti", &[L]),
            ("Mixed vegetable curry", &[L]),
            ("Dal", &[L, D]),
            ("Vegetable soup", &[D]),
            ("Grilled paneer", &[D]),
            ("Cucumber salad", &[S]),
            ("Buttermilk", &[S]),
        ],
        avoid: &[
            "Processed foods",
            "Sugary drinks",
            "Fried foods",
            "High-fat dairy",
            "Refined carbohydrates",
            "Sweetened foods",
            "High-calorie snacks",
            "Red meat",
        ],
        tips: &[
            "Control portion sizes",
            "Eat slowly",
            "Stay hydrated",
            "Include protein in meals",
            "Choose whole foods",
            "Plan meals ahead",
        ],
        limits: NutrientLimits {
            max_calories: Some(200.0),
            max_fat_g: Some(8.0),
            max_carbs_g: None,
            min_protein_g: None,
        },
    },
    Condition {
        key: "pcos",
        display_name: "PCOS",
        description: "Balanced, low glycemic load meals with steady protein and healthy fats to support insulin sensitivity and hormone balance.",
        recommended: &[
            ("Besan chilla", &[B]),
            ("Ragi porridge", &[B]),
            ("Quinoa pulao", &[L]),
            ("Chana masala", &[L]),
            ("Palak paneer", &[L, D]),
            ("Multigrain roti", &[D]),
            ("Tofu bhurji", &[D]),
            ("Flaxseed ladoo", &[S]),
            ("Almonds", &[S]),
        ],
        avoid: &[
            "Refined carbohydrates",
            "Sugary foods and drinks",
            "Processed foods",
            "Fried foods",
            "Excess dairy",
            "Trans fats",
        ],
        tips: &[
            "Pair carbohydrates with protein",
            "Prefer whole grains and millets",
            "Include seeds such as flax and pumpkin",
            "Keep regular meal timings",
            "Stay active every day",
        ],
        limits: NutrientLimits {
            max_calories: None,
            max_fat_g: None,
            max_carbs_g: Some(35.0),
            min_protein_g: Some(5.0),
        },
    },
    Condition {
        key: "thyroid",
        display_name: "Thyroid Disorders",
        description: "Nutrient-dense meals with adequate protein, selenium and zinc sources, and moderate portions of cruciferous vegetables.",
        recommended: &[
            ("Boiled egg", &[B]),
            ("Vegetable daliya", &[B]),
            ("Brown rice", &[L]),
            ("Masoor dal", &[L]),
            ("Bhindi sabzi", &[L, D]),
            ("Grilled fish", &[D]),
            ("Chapati", &[D]),
            ("Brazil nuts", &[S]),
            ("Curd", &[S]),
        ],
        avoid: &[
            "Highly processed foods",
            "Excess soy products",
            "Large amounts of raw cruciferous vegetables",
            "Sugary foods",
            "Fried foods",
        ],
        tips: &[
            "Take thyroid medication away from meals",
            "Use iodized salt in moderation",
            "Cook cruciferous vegetables before eating",
            "Include protein with every meal",
            "Keep portions moderate",
        ],
        limits: NutrientLimits {
            max_calories: Some(300.0),
            max_fat_g: None,
            max_carbs_g: None,
            min_protein_g: Some(4.0),
        },
    },
    Condition {
        key: "arthritis",
        display_name: "Arthritis",
        description: "Anti-inflammatory meals featuring turmeric, ginger, omega-3 sources, whole grains and colourful vegetables.",
        recommended: &[
            ("Turmeric milk", &[B]),
            ("Vegetable poha", &[B]),
            ("Rajma", &[L]),
            ("Brown rice", &[L]),
            ("Palak dal", &[L, D]),
            ("Grilled fish", &[D]),
            ("Jowar roti", &[D]),
            ("Walnuts", &[S]),
            ("Fruit salad", &[S]),
        ],
        avoid: &[
            "Fried foods",
            "Processed meats",
            "Sugary drinks",
            "Refined carbohydrates",
            "Excess red meat",
        ],
        tips: &[
            "Add turmeric and ginger to cooking",
            "Include omega-3 rich foods",
            "Maintain healthy weight to ease joints",
            "Stay hydrated",
            "Prefer whole grains",
        ],
        limits: NutrientLimits {
            max_calories: None,
            max_fat_g: Some(10.0),
            max_carbs_g: None,
            min_protein_g: None,
        },
    },
];

/// Look a condition up by key or display name, case-insensitively
/// ("heart disease", "Heart Disease" and "heart_disease" are equivalent).
pub fn find_condition(name: &str) -> Option<&'static Condition> {
    let wanted = name.trim().to_lowercase().replace([' ', '-'], "_");
    CONDITIONS.iter().find(|c| {
        c.key == wanted || c.display_name.to_lowercase().replace([' ', '-'], "_") == wanted
    })
}

/// Assembles disease-specific daily meal plans from the static tables.
pub struct DietPlanner {
    nutrition: Arc<NutritionTable>,
}

impl DietPlanner {
    pub fn new(nutrition: Arc<NutritionTable>) -> Self {
        Self { nutrition }
    }

    /// `Ok(None)` for an unknown condition.
    pub fn plan(&self, condition: &str, daily_calories: f64) -> Result<Option<DietPlan>, EatError> {
        if !daily_calories.is_finite() || daily_calories <= 0.0 {
            return Err(EatError::InvalidCalorieTarget(daily_calories));
        }
        let Some(condition) = find_condition(condition) else {
            log::warn!("⚠️ Unknown condition '{}'", condition);
            return Ok(None);
        };

        let mut meals = Vec::with_capacity(MEAL_FRACTIONS.len());
        let mut summary = NutritionTotals::default();

        for (meal_type, fraction) in MEAL_FRACTIONS {
            let meal = self.build_meal(condition, meal_type, daily_calories * fraction);
            summary.add(&meal.nutrition);
            meals.push(meal);
        }

        log::info!(
            "🩺 Built {} plan for {:.0} kcal ({} meals)",
            condition.key,
            daily_calories,
            meals.len()
        );

        Ok(Some(DietPlan {
            condition: condition.key.to_string(),
            display_name: condition.display_name.to_string(),
            description: condition.description.to_string(),
            daily_calories,
            meals,
            summary,
            avoid: condition.avoid.iter().map(|s| s.to_string()).collect(),
            tips: condition.tips.iter().map(|s| s.to_string()).collect(),
        }))
    }

    fn build_meal(&self, condition: &Condition, meal_type: MealType, allocation: f64) -> MealPlan {
        let foods = condition.foods_for(meal_type);
        let mut raw = NutritionTotals::default();
        let mut unmatched = Vec::new();

        for food in &foods {
            match self.nutrition.lookup(food) {
                Some(record) => raw.add(&NutritionTotals::from(record)),
                None => unmatched.push(food.to_string()),
            }
        }

        // scale the servings so the meal hits its allocation exactly
        let (nutrition, from_table) = if raw.calories > 0.0 {
            (raw.scaled(allocation / raw.calories), true)
        } else {
            (fallback_split(allocation), false)
        };

        MealPlan {
            meal_type,
            calorie_allocation: allocation,
            foods: foods.iter().map(|f| f.to_string()).collect(),
            unmatched_foods: unmatched,
            nutrition,
            from_table,
        }
    }

    /// Rows of the nutrition table within the condition's per-serving
    /// limits, in table order. `None` for an unknown condition.
    pub fn suitable_foods(&self, condition: &str) -> Option<Vec<NutritionRecord>> {
        let condition = find_condition(condition)?;
        Some(
            self.nutrition
                .records()
                .iter()
                .filter(|r| condition.limits.allows(r))
                .cloned()
                .collect(),
        )
    }
}

fn fallback_split(calories: f64) -> NutritionTotals {
    let (protein, fat, carbs) = FALLBACK_SPLIT;
    NutritionTotals {
        calories,
        protein_g: calories * protein / KCAL_PER_G_PROTEIN,
        fat_g: calories * fat / KCAL_PER_G_FAT,
        carbs_g: calories * carbs / KCAL_PER_G_CARBS,
    }
}
