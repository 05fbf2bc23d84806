use crate::models::FoodInnovation;

pub static INNOVATIONS: &[FoodInnovation] = &[
    FoodInnovation {
        name: "Ragi-Nutri Bar",
        ingredients: &["Ragi (Finger Millet)", "Jaggery", "Almonds", "Flaxseeds", "Curd"],
        why: &[
            "Ragi & Almond Flour (Rich in calcium & protein)",
            "Jaggery & Dates (Natural sweeteners, rich in iron)",
            "Flaxseeds (Omega-3 & fiber boost)",
            "Curd-based fermentation (Probiotic benefits for gut health)",
        ],
        outcome: "A healthier alternative to processed energy bars, offering high nutrition with traditional Indian flavors while catering to fitness-conscious individuals and those with lifestyle diseases like diabetes.",
    },
    FoodInnovation {
        name: "Foxtail Moong Protein Dosa",
        ingredients: &["Foxtail millet", "Moong dal", "Chia seeds", "Curry leaves"],
        why: &[
            "Foxtail millet (Gluten-free, high in fiber)",
            "Moong dal (Rich in plant-based protein)",
            "Chia seeds (Omega-3 & antioxidants)",
            "Curry leaves (Iron & digestive benefits)",
        ],
        outcome: "A crispy, high-protein, gut-friendly dosa with a healthier nutrient profile than regular rice-based dosa. Ideal for diabetics and weight-conscious individuals.",
    },
    FoodInnovation {
        name: "Makhana Beetroot Choco Shake",
        ingredients: &["Makhana (fox nuts)", "Dark cocoa", "Beetroot powder", "Dates", "Almonds"],
        why: &[
            "Makhana (Low-calorie, high in calcium & protein)",
            "Beetroot powder (Iron-rich, great for hemoglobin)",
            "Dark cocoa (Antioxidants & heart health)",
            "Dates & almonds (Natural sweetness & healthy fats)",
        ],
        outcome: "A nutrient-dense, caffeine-free chocolate shake that can be a great energy booster for kids, anemic patients and fitness enthusiasts.",
    },
    FoodInnovation {
        name: "Quinoa Paneer Power Bowl",
        ingredients: &["Quinoa", "Paneer", "Spinach", "Turmeric", "Ginger"],
        why: &[
            "Quinoa (Complete protein, high in fiber)",
            "Paneer (Rich in calcium and protein)",
            "Spinach (Iron and vitamin K powerhouse)",
            "Turmeric & Ginger (Anti-inflammatory and digestive benefits)",
        ],
        outcome: "A balanced, protein-rich bowl that combines plant and dairy proteins, good for muscle building and bone health.",
    },
    FoodInnovation {
        name: "Bajra Berry Smoothie Bowl",
        ingredients: &["Bajra (Pearl Millet)", "Mixed Berries", "Yogurt", "Honey", "Chia Seeds"],
        why: &[
            "Bajra (Rich in iron and magnesium)",
            "Mixed Berries (Antioxidants and vitamin C)",
            "Yogurt (Probiotics and protein)",
            "Honey & Chia Seeds (Natural energy and omega-3)",
        ],
        outcome: "A refreshing, nutrient-packed smoothie bowl that provides sustained energy and supports gut health while helping manage blood sugar.",
    },
    FoodInnovation {
        name: "Jowar Methi Roti",
        ingredients: &["Jowar (Sorghum)", "Methi (Fenugreek)", "Ajwain", "Ghee", "Curd"],
        why: &[
            "Jowar (Gluten-free, rich in fiber and minerals)",
            "Methi (Blood sugar control, digestive aid)",
            "Ajwain (Digestive health, anti-inflammatory)",
            "Curd (Probiotics, protein source)",
        ],
        outcome: "A nutritious, gluten-free roti that helps manage diabetes and aids digestion. Suited to anyone with gluten sensitivity.",
    },
    FoodInnovation {
        name: "Sprouted Moong Chaat",
        ingredients: &["Sprouted Moong", "Pomegranate", "Cucumber", "Mint", "Lemon"],
        why: &[
            "Sprouted Moong (Enhanced protein and enzyme content)",
            "Pomegranate (Antioxidants and heart health)",
            "Cucumber (Hydration and low calories)",
            "Mint & Lemon (Digestive aid and vitamin C)",
        ],
        outcome: "A refreshing, protein-rich chaat for weight management and gut health.",
    },
    FoodInnovation {
        name: "Oats Idli with Sambar",
        ingredients: &["Oats", "Urad Dal", "Vegetables", "Sambar Powder", "Coconut"],
        why: &[
            "Oats (Beta-glucan for heart health)",
            "Urad Dal (Complete protein source)",
            "Vegetables (Fiber and micronutrients)",
            "Sambar Powder (Digestive spices)",
        ],
        outcome: "A heart-healthy twist on traditional idli, rich in fiber and protein. Helps manage cholesterol and blood sugar.",
    },
    FoodInnovation {
        name: "Ragi Ladoo",
        ingredients: &["Ragi Flour", "Jaggery", "Dry Fruits", "Ghee", "Cardamom"],
        why: &[
            "Ragi (Calcium and iron rich)",
            "Jaggery (Natural sweetener with minerals)",
            "Dry Fruits (Healthy fats and protein)",
            "Cardamom (Digestive aid)",
        ],
        outcome: "A nutritious sweet that supports bone health, suited to growing children and pregnant women. A healthier alternative to traditional sweets.",
    },
    FoodInnovation {
        name: "Bajra Khichdi",
        ingredients: &["Bajra", "Moong Dal", "Vegetables", "Ghee", "Spices"],
        why: &[
            "Bajra (Rich in iron and magnesium)",
            "Moong Dal (Easy to digest protein)",
            "Vegetables (Fiber and vitamins)",
            "Spices (Digestive and anti-inflammatory)",
        ],
        outcome: "A wholesome one-pot meal for all age groups that aids digestion and keeps energy levels steady.",
    },
    FoodInnovation {
        name: "Whole Wheat Cauliflower Pizza",
        ingredients: &["Whole Wheat Flour", "Cauliflower", "Low-fat Cheese", "Fresh Vegetables", "Herbs"],
        why: &[
            "Whole Wheat Flour (High fiber, complex carbs)",
            "Cauliflower Base (Low-calorie, vitamin-rich)",
            "Low-fat Cheese (Reduced saturated fat)",
            "Fresh Vegetables (Antioxidants and fiber)",
        ],
        outcome: "A lighter pizza that is high in fiber and lower in calories and fat. Good for weight management and cholesterol.",
    },
    FoodInnovation {
        name: "Quinoa Pasta Primavera",
        ingredients: &["Quinoa Pasta", "Fresh Vegetables", "Olive Oil", "Herbs", "Parmesan"],
        why: &[
            "Quinoa Pasta (Complete protein, gluten-free)",
            "Fresh Vegetables (Fiber and micronutrients)",
            "Olive Oil (Heart-healthy fats)",
            "Herbs (Antioxidants and flavor)",
        ],
        outcome: "A protein-rich, gluten-free pasta dish packed with nutrients.",
    },
    FoodInnovation {
        name: "Lentil Burger with Sweet Potato Bun",
        ingredients: &["Lentils", "Sweet Potato", "Quinoa", "Vegetables", "Spices"],
        why: &[
            "Lentils (Plant-based protein, iron)",
            "Sweet Potato (Complex carbs, vitamin A)",
            "Quinoa (Complete protein, fiber)",
            "Vegetables (Fiber and antioxidants)",
        ],
        outcome: "A burger alternative high in protein and fiber while lower in calories and fat. Suited to vegetarians.",
    },
];

/// Ingredient groups offered when composing a recipe request.
pub static INGREDIENT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "grains",
        &[
            "ragi", "bajra", "jowar", "quinoa", "brown rice", "red rice", "foxtail millet", "little millet",
            "kodo millet", "barnyard millet",
        ],
    ),
    (
        "pulses",
        &[
            "moong dal", "toor dal", "chana dal", "urad dal", "masoor dal", "horse gram", "black gram",
            "green gram", "red gram",
        ],
    ),
    (
        "vegetables",
        &["palak", "methi", "lauki", "tinda", "karela", "bhindi", "baingan", "gajar", "shimla mirch", "tamatar"],
    ),
    (
        "spices",
        &[
            "turmeric", "cumin", "coriander", "mustard seeds", "fenugreek", "asafoetida", "curry leaves",
            "cinnamon", "cardamom", "cloves",
        ],
    ),
    (
        "healthy_fats",
        &[
            "coconut oil", "ghee", "sesame oil", "mustard oil", "peanuts", "almonds", "cashews", "walnuts",
            "flaxseeds", "chia seeds",
        ],
    ),
];

/// Case-insensitive lookup by innovation name.
pub fn find_innovation(name: &str) -> Option<&'static FoodInnovation> {
    let wanted = name.trim();
    INNOVATIONS.iter().find(|i| i.name.eq_ignore_ascii_case(wanted))
}

pub fn ingredients_in(category: &str) -> Option<&'static [&'static str]> {
    let wanted = category.trim().to_lowercase().replace(' ', "_");
    INGREDIENT_CATEGORIES
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, items)| *items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_complete() {
        assert_eq!(INNOVATIONS.len(), 13);
        for innovation in INNOVATIONS {
            assert!(!innovation.ingredients.is_empty(), "{}", innovation.name);
            assert!(!innovation.why.is_empty(), "{}", innovation.name);
            assert!(!innovation.outcome.is_empty(), "{}", innovation.name);
        }
    }

    #[test]
    fn test_find_innovation_ignores_case() {
        let found = find_innovation("  ragi ladoo ").unwrap();
        assert_eq!(found.name, "Ragi Ladoo");
        assert!(find_innovation("Chocolate Cake").is_none());
    }

    #[test]
    fn test_ingredient_categories() {
        assert_eq!(INGREDIENT_CATEGORIES.len(), 5);
        assert_eq!(ingredients_in("Grains").unwrap()[0], "ragi");
        assert!(ingredients_in("healthy fats").unwrap().contains(&"flaxseeds"));
        assert!(ingredients_in("desserts").is_none());
    }
}
