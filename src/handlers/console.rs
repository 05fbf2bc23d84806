use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::EatError;
use crate::handlers::FoodAnalyzer;
use crate::services::diet::CONDITIONS;
use crate::services::innovations::{find_innovation, ingredients_in, INGREDIENT_CATEGORIES, INNOVATIONS};
use crate::services::report;
use crate::services::{DietPlanner, HealthyAlternatives, RecipeService};

pub const DEFAULT_DAILY_CALORIES: f64 = 2000.0;
const SUITABLE_FOODS_SHOWN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Food(String),
    Image(String),
    Diet { condition: String, calories: Option<f64> },
    Alternatives(String),
    Innovation(Option<String>),
    Ingredients(Option<String>),
    Recipe { ingredients: Vec<String>, cuisine: Option<String> },
}

impl Command {
    /// Anything that is not a known command is a food search.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.trim_start_matches('/').to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "food" => Command::Food(rest.to_string()),
            "image" | "photo" => Command::Image(rest.to_string()),
            "diet" => Self::parse_diet(rest),
            "alt" | "alternatives" => Command::Alternatives(rest.to_string()),
            "innovation" | "innovations" => Command::Innovation(Some(rest.to_string()).filter(|r| !r.is_empty())),
            "ingredients" => Command::Ingredients(Some(rest.to_string()).filter(|r| !r.is_empty())),
            "recipe" => Self::parse_recipe(rest),
            _ => Command::Food(line.to_string()),
        };
        Some(command)
    }

    /// `diet <condition> [calories]`
    fn parse_diet(rest: &str) -> Command {
        if let Some((condition, last)) = rest.rsplit_once(char::is_whitespace) {
            if let Ok(calories) = last.trim().parse::<f64>() {
                return Command::Diet {
                    condition: condition.trim().to_string(),
                    calories: Some(calories),
                };
            }
        }
        Command::Diet {
            condition: rest.to_string(),
            calories: None,
        }
    }

    /// `recipe ragi, moong dal, palak; South Indian`
    fn parse_recipe(rest: &str) -> Command {
        let (list, cuisine) = match rest.split_once(';') {
            Some((list, cuisine)) => (list, Some(cuisine.trim().to_string()).filter(|c| !c.is_empty())),
            None => (rest, None),
        };
        let ingredients = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Command::Recipe { ingredients, cuisine }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Line-oriented front-end over the food services.
pub struct ConsoleHandler {
    analyzer: Arc<FoodAnalyzer>,
    planner: Arc<DietPlanner>,
    alternatives: Arc<HealthyAlternatives>,
    recipes: Option<Arc<dyn RecipeService>>,
}

impl ConsoleHandler {
    pub fn new(
        analyzer: Arc<FoodAnalyzer>,
        planner: Arc<DietPlanner>,
        alternatives: Arc<HealthyAlternatives>,
        recipes: Option<Arc<dyn RecipeService>>,
    ) -> Self {
        Self {
            analyzer,
            planner,
            alternatives,
            recipes,
        }
    }

    /// Answer every line of `input` on `output` until `quit` or end of input.
    /// Lines that are not valid UTF-8 are skipped.
    pub async fn serve<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    log::warn!("⚠️ Skipping unreadable input line: {}", e);
                    output.write_all("⚠️ Could not read that line as text.\n\n".as_bytes()).await?;
                    continue;
                }
                Err(e) => {
                    log::error!("❌ Input closed: {}", e);
                    break;
                }
            };

            match self.handle_line(&line).await {
                Some(Reply::Text(text)) => output.write_all(format!("{}\n\n", text).as_bytes()).await?,
                Some(Reply::Quit) => break,
                None => {}
            }
            output.flush().await?;
        }

        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Option<Reply> {
        let command = Command::parse(line)?;
        log::debug!("📨 Command: {:?}", command);

        let text = match command {
            Command::Quit => return Some(Reply::Quit),
            Command::Help => help_message(self.analyzer.has_classifier(), self.recipes.is_some()),
            Command::Food(name) => report::format_food_report(&self.analyzer.analyze_text(&name)),
            Command::Image(path) => self.handle_image(&path).await,
            Command::Diet { condition, calories } => self.handle_diet(&condition, calories),
            Command::Alternatives(food) => self.handle_alternatives(&food),
            Command::Innovation(name) => handle_innovation(name.as_deref()),
            Command::Ingredients(category) => handle_ingredients(category.as_deref()),
            Command::Recipe { ingredients, cuisine } => self.handle_recipe(&ingredients, cuisine.as_deref()).await,
        };
        Some(Reply::Text(text))
    }

    async fn handle_image(&self, path: &str) -> String {
        if path.is_empty() {
            return "Usage: image <path to jpg>".to_string();
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("⚠️ Could not read image {}: {}", path, e);
                return format!("❌ Could not read image {}: {}", path, e);
            }
        };

        log::info!("📸 Analyzing image {} ({} bytes)", path, bytes.len());
        report::format_food_report(&self.analyzer.analyze_image(&bytes).await)
    }

    fn handle_diet(&self, condition: &str, calories: Option<f64>) -> String {
        if condition.is_empty() {
            return condition_list();
        }

        let daily_calories = calories.unwrap_or(DEFAULT_DAILY_CALORIES);
        match self.planner.plan(condition, daily_calories) {
            Ok(Some(plan)) => {
                let mut text = report::format_diet_plan(&plan);
                if let Some(foods) = self.planner.suitable_foods(&plan.condition) {
                    text.push_str("\n\n");
                    text.push_str(&report::format_suitable_foods(&plan.display_name, &foods, SUITABLE_FOODS_SHOWN));
                }
                text
            }
            Ok(None) => format!("❓ Unknown condition '{}'.\n{}", condition, condition_list()),
            Err(e) => format!("❌ {}", e),
        }
    }

    fn handle_alternatives(&self, food: &str) -> String {
        if food.is_empty() {
            return "Usage: alt <food name>".to_string();
        }
        report::format_alternatives(food, &self.alternatives.find(food))
    }

    async fn handle_recipe(&self, ingredients: &[String], cuisine: Option<&str>) -> String {
        let Some(recipes) = &self.recipes else {
            return "⚠️ Recipe generation is unavailable: OPENROUTER_API_KEY is not set.".to_string();
        };
        if ingredients.is_empty() {
            return "Usage: recipe <ingredient>, <ingredient>[; cuisine]".to_string();
        }

        match recipes.generate_recipe(ingredients, cuisine).await {
            Ok(recipe) => report::format_recipe(&recipe),
            Err(e) => {
                log::error!("❌ Error generating recipe: {}", e);
                match e.downcast_ref::<EatError>() {
                    Some(EatError::MalformedPayload { .. }) => {
                        "⚠️ Could not parse the generated recipe. Please try again.".to_string()
                    }
                    _ => format!("❌ Error generating recipe: {}", e),
                }
            }
        }
    }
}

fn handle_innovation(name: Option<&str>) -> String {
    match name {
        None => report::format_innovation_list(INNOVATIONS),
        Some(name) => match find_innovation(name) {
            Some(innovation) => report::format_innovation(innovation),
            None => format!("❓ Unknown innovation '{}'.\n{}", name, report::format_innovation_list(INNOVATIONS)),
        },
    }
}

fn handle_ingredients(category: Option<&str>) -> String {
    match category {
        None => report::format_ingredient_categories(INGREDIENT_CATEGORIES),
        Some(category) => match ingredients_in(category) {
            Some(items) => items.join(", "),
            None => format!(
                "❓ Unknown category '{}'.\n{}",
                category,
                report::format_ingredient_categories(INGREDIENT_CATEGORIES)
            ),
        },
    }
}

fn condition_list() -> String {
    let names: Vec<&str> = CONDITIONS.iter().map(|c| c.display_name).collect();
    format!("Available conditions: {}", names.join(", "))
}

fn help_message(image_enabled: bool, recipes_enabled: bool) -> String {
    let off = |enabled: bool| if enabled { "" } else { " (unavailable)" };
    format!(
        "🥗 *EATelligence AI*\n\n\
         food <name>            Nutrition and health impact of a dish\n\
         image <path>           Recognize a dish from a photo{}\n\
         diet <condition> [kcal] Daily meal plan (default {:.0} kcal)\n\
         alt <food>             Healthier alternatives\n\
         innovation [name]      Food innovation ideas\n\
         ingredients [category] Ingredient categories for recipes\n\
         recipe <a>, <b>[; cuisine] Generate a recipe{}\n\
         help                   This message\n\
         quit                   Exit\n\n\
         Typing just a food name searches for it.",
        off(image_enabled),
        DEFAULT_DAILY_CALORIES,
        off(recipes_enabled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::{NutritionRecord, Recipe, RecipeNutrition};
    use crate::services::{LabelResolver, NutritionTable, PresetLibrary};

    struct CannedRecipes {
        reply: &'static str,
    }

    #[async_trait::async_trait]
    impl RecipeService for CannedRecipes {
        async fn generate_recipe(&self, ingredients: &[String], _cuisine: Option<&str>) -> Result<Recipe> {
            match self.reply {
                "ok" => Ok(Recipe {
                    name: format!("{} Surprise", ingredients[0]),
                    ingredients: ingredients.to_vec(),
                    instructions: vec!["Cook".to_string()],
                    nutrition: RecipeNutrition::default(),
                    benefits: Vec::new(),
                }),
                "garbage" => Err(EatError::malformed("recipe", "no JSON object found").into()),
                _ => Err(EatError::collaborator("recipe generator", "HTTP 503").into()),
            }
        }
    }

    fn handler(recipes: Option<Arc<dyn RecipeService>>) -> ConsoleHandler {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let resolver = Arc::new(LabelResolver::default());
        let nutrition = Arc::new(NutritionTable::new(vec![NutritionRecord {
            name: "Idli".to_string(),
            calories: 58.0,
            protein_g: 2.0,
            fat_g: 0.4,
            carbs_g: 12.0,
        }]));

        ConsoleHandler::new(
            Arc::new(FoodAnalyzer::new(
                resolver.clone(),
                nutrition.clone(),
                Arc::new(PresetLibrary::default()),
                None,
                &config,
            )),
            Arc::new(DietPlanner::new(nutrition.clone())),
            Arc::new(HealthyAlternatives::new(resolver, nutrition, config.label_threshold)),
            recipes,
        )
    }

    async fn text(handler: &ConsoleHandler, line: &str) -> String {
        match handler.handle_line(line).await {
            Some(Reply::Text(text)) => text,
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("QUIT"), Some(Command::Quit));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("masala dosa"), Some(Command::Food("masala dosa".to_string())));
        assert_eq!(Command::parse("food  idli "), Some(Command::Food("idli".to_string())));
        assert_eq!(Command::parse("innovation"), Some(Command::Innovation(None)));
        assert_eq!(Command::parse("image a.jpg"), Some(Command::Image("a.jpg".to_string())));
    }

    #[test]
    fn test_parse_diet() {
        assert_eq!(
            Command::parse("diet heart disease 1800"),
            Some(Command::Diet {
                condition: "heart disease".to_string(),
                calories: Some(1800.0),
            })
        );
        assert_eq!(
            Command::parse("diet pcos"),
            Some(Command::Diet {
                condition: "pcos".to_string(),
                calories: None,
            })
        );
    }

    #[test]
    fn test_parse_recipe() {
        assert_eq!(
            Command::parse("recipe ragi, moong dal ,, palak; South Indian"),
            Some(Command::Recipe {
                ingredients: vec!["ragi".to_string(), "moong dal".to_string(), "palak".to_string()],
                cuisine: Some("South Indian".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_quit_and_food_search() {
        let handler = handler(None);
        assert_eq!(handler.handle_line("quit").await, Some(Reply::Quit));
        assert_eq!(handler.handle_line("").await, None);

        let reply = text(&handler, "idli").await;
        assert!(reply.contains("Calories: 58 kcal"));
        assert!(reply.contains("Low Calorie"));

        assert!(text(&handler, "pizza").await.contains("No nutrition information found for pizza"));
    }

    #[tokio::test]
    async fn test_serve_skips_undecodable_lines() {
        let input: &[u8] = b"\xff\xfe\nidli\nquit\npizza\n";
        let mut output = Vec::new();

        handler(None).serve(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("⚠️ Could not read that line as text."));
        assert!(text.contains("Calories: 58 kcal"));
        assert!(!text.contains("pizza"));
    }

    #[tokio::test]
    async fn test_diet_command() {
        let handler = handler(None);

        let plan = text(&handler, "diet diabetes 2000").await;
        assert!(plan.contains("Breakfast (500 kcal)"));
        assert!(plan.contains("Suitable foods for Diabetes"));

        assert!(text(&handler, "diet scurvy").await.contains("Unknown condition"));
        assert!(text(&handler, "diet obesity -5").await.contains("positive number"));
        assert!(text(&handler, "diet").await.starts_with("Available conditions"));
    }

    #[tokio::test]
    async fn test_missing_image_is_reported() {
        let reply = text(&handler(None), "image /definitely/not/here.jpg").await;
        assert!(reply.starts_with("❌ Could not read image"));
    }

    #[tokio::test]
    async fn test_recipe_outcomes() {
        assert!(text(&handler(None), "recipe ragi").await.contains("unavailable"));

        let ok = handler(Some(Arc::new(CannedRecipes { reply: "ok" })));
        assert!(text(&ok, "recipe ragi, palak").await.contains("ragi Surprise"));

        let garbage = handler(Some(Arc::new(CannedRecipes { reply: "garbage" })));
        assert!(text(&garbage, "recipe ragi").await.contains("Could not parse"));

        let down = handler(Some(Arc::new(CannedRecipes { reply: "down" })));
        assert!(text(&down, "recipe ragi").await.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_catalogue_commands() {
        let handler = handler(None);
        assert!(text(&handler, "innovation ragi ladoo").await.contains("Ragi Flour"));
        assert!(text(&handler, "innovation").await.contains("Bajra Khichdi"));
        assert!(text(&handler, "ingredients").await.contains("healthy fats: coconut oil"));
        assert!(text(&handler, "ingredients pulses").await.starts_with("moong dal, toor dal"));
        assert!(text(&handler, "alt samosa").await.contains("Dhokla"));
    }
}
