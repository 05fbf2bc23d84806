use crate::models::{
    Alternative, BadgeTone, DietPlan, FoodInnovation, FoodReport, NutritionRecord, Recipe, Recognition,
};

const BAR_WIDTH: usize = 10;

struct ProgressBar {
    bar: String,
    percentage: i32,
}

fn create_progress_bar(current: f64, goal: f64) -> ProgressBar {
    let percentage = if goal > 0.0 && current.is_finite() {
        ((current / goal) * 100.0).clamp(0.0, 100.0) as i32
    } else {
        0
    };
    let filled = (percentage as usize * BAR_WIDTH) / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

    ProgressBar { bar, percentage }
}

fn tone_icon(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Green => "🟢",
        BadgeTone::Yellow => "🟡",
        BadgeTone::Red => "🔴",
    }
}

pub fn recognition_line(recognition: &Recognition) -> String {
    match recognition {
        Recognition::Preset { name, score } => {
            format!("🖼️ Matched preset image '{}' (similarity: {:.2})", name, score)
        }
        Recognition::Classifier { key, label, confidence } => {
            format!("🔍 Recognized as {} from '{}' (confidence: {:.2})", key, label, confidence)
        }
        Recognition::Unrecognized { food_detected: true } => {
            "⚠️ Detected food in the image but couldn't identify the specific dish. \
             Please try another image or use the text input."
                .to_string()
        }
        Recognition::Unrecognized { food_detected: false } => {
            "⚠️ Could not recognize the food in the image. Please try another image or use the text input."
                .to_string()
        }
    }
}

fn nutrition_lines(record: &NutritionRecord) -> String {
    format!(
        "🔥 Calories: {:.0} kcal\n\
         💪 Protein: {:.1} g\n\
         🧈 Fat: {:.1} g\n\
         🍞 Carbohydrates: {:.1} g",
        record.calories, record.protein_g, record.fat_g, record.carbs_g
    )
}

pub fn format_food_report(report: &FoodReport) -> String {
    let mut out = Vec::new();

    if let Some(recognition) = &report.recognition {
        out.push(recognition_line(recognition));
    }

    match &report.nutrition {
        Some(record) => {
            out.push(format!("🍽️ *{}*", record.name));
            out.push(nutrition_lines(record));
            out.push(format!("🕒 Analyzed at {} UTC", report.analyzed_at.format("%Y-%m-%d %H:%M")));
        }
        None => {
            if let Some(name) = report.recognition.as_ref().and_then(Recognition::food_name) {
                out.push(format!("❓ No nutrition information found for {}", name));
            } else if report.recognition.is_none() && !report.query.trim().is_empty() {
                out.push(format!("❓ No nutrition information found for {}", report.query.trim()));
            }
        }
    }

    if let Some(assessment) = &report.assessment {
        out.push(String::new());
        out.push("🩺 Health Impact Assessment".to_string());
        out.push(assessment.summary());
        out.push(
            assessment
                .badges
                .iter()
                .map(|b| format!("{} {}", tone_icon(b.tone), b.label))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }

    for notice in &report.notices {
        out.push(format!("ℹ️ {}", notice));
    }

    out.join("\n")
}

/// Advice on the requested daily target.
fn calorie_target_note(daily_calories: f64) -> Option<&'static str> {
    if daily_calories < 1200.0 {
        Some("⚠️ Targets below 1200 kcal should be supervised by a doctor or dietitian.")
    } else if daily_calories > 3000.0 {
        Some("⚠️ Targets above 3000 kcal are unusual. Watch your portions.")
    } else {
        None
    }
}

pub fn format_diet_plan(plan: &DietPlan) -> String {
    let mut out = vec![
        format!("🩺 *{} Diet Plan* ({:.0} kcal/day)", plan.display_name, plan.daily_calories),
        plan.description.clone(),
        String::new(),
    ];

    if let Some(note) = calorie_target_note(plan.daily_calories) {
        out.push(note.to_string());
        out.push(String::new());
    }

    for meal in &plan.meals {
        let share = create_progress_bar(meal.calorie_allocation, plan.daily_calories);
        out.push(format!("🍽️ {} ({:.0} kcal)", meal.meal_type, meal.calorie_allocation));
        out.push(format!("{} {}%", share.bar, share.percentage));
        out.push(format!("   {}", meal.foods.join(", ")));
        out.push(format!(
            "   Protein {:.1} g | Fat {:.1} g | Carbs {:.1} g{}",
            meal.nutrition.protein_g,
            meal.nutrition.fat_g,
            meal.nutrition.carbs_g,
            if meal.from_table { "" } else { " (estimated)" }
        ));
    }

    out.push(String::new());
    out.push(format!(
        "📊 Daily total: {:.0} kcal | Protein {:.1} g | Fat {:.1} g | Carbs {:.1} g",
        plan.summary.calories, plan.summary.protein_g, plan.summary.fat_g, plan.summary.carbs_g
    ));

    out.push(String::new());
    out.push("🚫 Foods to avoid:".to_string());
    out.extend(plan.avoid.iter().map(|a| format!("- {}", a)));

    out.push(String::new());
    out.push("💡 Tips:".to_string());
    out.extend(plan.tips.iter().map(|t| format!("- {}", t)));

    out.join("\n")
}

pub fn format_suitable_foods(display_name: &str, foods: &[NutritionRecord], limit: usize) -> String {
    if foods.is_empty() {
        return format!("No foods in the nutrition table fit the {} limits.", display_name);
    }

    let mut out = vec![format!("✅ Suitable foods for {} ({} found):", display_name, foods.len())];
    out.extend(
        foods
            .iter()
            .take(limit)
            .map(|f| format!("- {} ({:.0} kcal)", f.name, f.calories)),
    );
    out.join("\n")
}

pub fn format_alternatives(food: &str, alternatives: &[Alternative]) -> String {
    if alternatives.is_empty() {
        return format!("❓ No healthier alternatives found for {}.", food);
    }

    let mut out = vec![format!("🥗 Healthier alternatives to {}:", food)];
    for alternative in alternatives {
        match &alternative.nutrition {
            Some(n) => out.push(format!(
                "- {} ({:.0} kcal, {:.1} g fat)",
                alternative.name, n.calories, n.fat_g
            )),
            None => out.push(format!("- {}", alternative.name)),
        }
    }
    out.join("\n")
}

pub fn format_innovation(innovation: &FoodInnovation) -> String {
    let mut out = vec![format!("🧪 *{}*", innovation.name), "Ingredients:".to_string()];
    out.extend(innovation.ingredients.iter().map(|i| format!("- {}", i)));
    out.push("Why it works:".to_string());
    out.extend(innovation.why.iter().map(|w| format!("- {}", w)));
    out.push(format!("Outcome: {}", innovation.outcome));
    out.join("\n")
}

pub fn format_innovation_list(innovations: &[FoodInnovation]) -> String {
    let mut out = vec!["🧪 Food innovations:".to_string()];
    out.extend(innovations.iter().map(|i| format!("- {}", i.name)));
    out.join("\n")
}

pub fn format_ingredient_categories(categories: &[(&str, &[&str])]) -> String {
    categories
        .iter()
        .map(|(name, items)| format!("{}: {}", name.replace('_', " "), items.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_recipe(recipe: &Recipe) -> String {
    let mut out = vec![format!("👩‍🍳 *{}*", recipe.name), "Ingredients:".to_string()];
    out.extend(recipe.ingredients.iter().map(|i| format!("- {}", i)));

    out.push("Instructions:".to_string());
    out.extend(
        recipe
            .instructions
            .iter()
            .enumerate()
            .map(|(n, step)| format!("{}. {}", n + 1, step)),
    );

    let n = &recipe.nutrition;
    let facts: Vec<String> = [
        ("Calories", n.calories, "kcal"),
        ("Protein", n.protein_g, "g"),
        ("Carbs", n.carbs_g, "g"),
        ("Fat", n.fat_g, "g"),
    ]
    .iter()
    .filter_map(|(label, value, unit)| value.map(|v| format!("{} {:.0} {}", label, v, unit)))
    .collect();
    if !facts.is_empty() {
        out.push(format!("Nutrition: {}", facts.join(" | ")));
    }

    if !recipe.benefits.is_empty() {
        out.push("Health benefits:".to_string());
        out.extend(recipe.benefits.iter().map(|b| format!("- {}", b)));
    }

    out.join("\n")
}
