use crate::models::{BadgeTone, HealthAssessment, HealthBadge, NutritionRecord};

/// Rule-based health impact badges for one serving.
pub fn assess(record: &NutritionRecord) -> HealthAssessment {
    let mut badges = Vec::new();

    badges.push(if record.calories < 120.0 {
        HealthBadge {
            label: "Low Calorie",
            tone: BadgeTone::Green,
            note: "Low in calories. Good for weight management.",
        }
    } else if record.calories < 250.0 {
        HealthBadge {
            label: "Moderate Calorie",
            tone: BadgeTone::Yellow,
            note: "Moderate calories. Suitable for most diets.",
        }
    } else {
        HealthBadge {
            label: "High Calorie",
            tone: BadgeTone::Red,
            note: "High in calories. Consume in moderation.",
        }
    });

    if record.protein_g > 5.0 {
        badges.push(HealthBadge {
            label: "High Protein",
            tone: BadgeTone::Green,
            note: "Good source of protein.",
        });
    }
    if record.fat_g > 10.0 {
        badges.push(HealthBadge {
            label: "High Fat",
            tone: BadgeTone::Red,
            note: "High in fat. Limit intake if on a low-fat diet.",
        });
    }
    if record.carbs_g > 30.0 {
        badges.push(HealthBadge {
            label: "High Carbs",
            tone: BadgeTone::Yellow,
            note: "High in carbohydrates. Suitable for energy needs.",
        });
    }

    HealthAssessment { badges }
}
