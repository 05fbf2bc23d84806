use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ai_service::RecipeService;
use crate::errors::EatError;
use crate::models::{Recipe, RecipeNutrition};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a professional Indian chef and nutritionist.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

pub struct OpenRouterService {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterService {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building OpenRouter HTTP client")?;
        Ok(Self { api_key, model, client })
    }

    fn build_prompt(ingredients: &[String], cuisine: Option<&str>) -> String {
        let cuisine = cuisine.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("Indian");
        format!(
            "Create a unique, healthy {cuisine} recipe using these ingredients: {list}.\n\
             The recipe should be:\n\
             1. Nutritious and balanced\n\
             2. Easy to prepare\n\
             3. Use traditional {cuisine} cooking methods\n\
             4. Include specific quantities for ingredients\n\
             5. Have clear step-by-step instructions\n\
             6. Include nutritional benefits\n\
             \n\
             Respond with JSON only, using these keys:\n\
             - recipe_name: creative name for the recipe\n\
             - ingredients: list of ingredients with quantities\n\
             - instructions: list of cooking steps\n\
             - nutrition: object with calories, protein, carbs and fat per serving\n\
             - nutritional_benefits: list of nutritional benefits\n\
             \n\
             Make the recipe innovative while keeping it authentic to {cuisine} cuisine.",
            cuisine = cuisine,
            list = ingredients.join(", ")
        )
    }
}

#[async_trait::async_trait]
impl RecipeService for OpenRouterService {
    async fn generate_recipe(&self, ingredients: &[String], cuisine: Option<&str>) -> Result<Recipe> {
        log::info!("🍳 Requesting recipe for {} ingredients", ingredients.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::build_prompt(ingredients, cuisine),
                },
            ],
            max_tokens: 800,
            temperature: 0.7,
        };

        log::info!("🤖 Sending request to OpenRouter with model: {}", self.model);

        let response = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "EATelligence AI")
            .json(&request)
            .send()
            .await
            .map_err(|e| EatError::collaborator("recipe generator", e.to_string()))?;

        let status = response.status();
        log::debug!("📥 OpenRouter response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ OpenRouter API error ({}): {}", status, error_text);
            return Err(EatError::collaborator("recipe generator", format!("HTTP {}: {}", status, error_text)).into());
        }

        let response_text = response.text().await?;
        log::debug!("📄 Raw OpenRouter response size: {} bytes", response_text.len());

        let chat_response = serde_json::from_str::<ChatResponse>(&response_text)
            .map_err(|e| EatError::malformed("chat completion", e.to_string()))?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EatError::malformed("chat completion", "no choices returned"))?;

        let recipe = parse_recipe(&content)?;
        log::info!("✅ Generated recipe '{}'", recipe.name);
        Ok(recipe)
    }
}

/// Parse the model's free-form answer into a `Recipe`. Accepts JSON wrapped
/// in code fences or prose; name, ingredients and instructions are required.
pub fn parse_recipe(text: &str) -> Result<Recipe, EatError> {
    let json = extract_json_object(text).ok_or_else(|| EatError::malformed("recipe", "no JSON object found"))?;
    let value: Value = serde_json::from_str(json).map_err(|e| EatError::malformed("recipe", e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| EatError::malformed("recipe", "top-level value is not an object"))?;

    let name = first_field(object, &["recipe_name", "name", "title"])
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EatError::malformed("recipe", "missing recipe name"))?
        .to_string();

    let ingredients = first_field(object, &["ingredients"]).map(string_list).unwrap_or_default();
    if ingredients.is_empty() {
        return Err(EatError::malformed("recipe", "missing ingredients"));
    }

    let instructions = first_field(object, &["instructions", "steps", "method"])
        .map(string_list)
        .unwrap_or_default();
    if instructions.is_empty() {
        return Err(EatError::malformed("recipe", "missing instructions"));
    }

    let nutrition = first_field(object, &["nutrition", "nutritional_info", "nutrition_info"])
        .and_then(Value::as_object)
        .map(|n| RecipeNutrition {
            calories: first_field(n, &["calories", "kcal", "energy"]).and_then(number),
            protein_g: first_field(n, &["protein", "protein_g"]).and_then(number),
            carbs_g: first_field(n, &["carbs", "carbohydrates", "carbs_g"]).and_then(number),
            fat_g: first_field(n, &["fat", "fats", "fat_g"]).and_then(number),
        })
        .unwrap_or_default();

    let benefits = first_field(object, &["nutritional_benefits", "health_benefits", "benefits"])
        .map(string_list)
        .unwrap_or_default();

    Ok(Recipe {
        name,
        ingredients,
        instructions,
        nutrition,
        benefits,
    })
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn first_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| object.get(*k)).filter(|v| !v.is_null())
}

/// Arrays of strings or objects, or a newline separated string.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        Value::String(s) => s
            .lines()
            .map(|l| l.trim().trim_start_matches(['-', '*']).trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(fields) => {
            // {"quantity": "1 cup", "item": "ragi flour"}
            let parts: Vec<&str> = ["quantity", "amount", "name", "item", "ingredient", "step", "text"]
                .iter()
                .filter_map(|k| fields.get(*k).and_then(Value::as_str))
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

/// Numbers pass through; strings like "350 kcal", "12.5g" or "-.5 g" keep
/// their leading number, sign included.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn leading_number(text: &str) -> Option<f64> {
    let digit = text.find(|c: char| c.is_ascii_digit())?;
    let mut start = digit;
    if text[..start].ends_with('.') {
        start -= 1;
    }
    if text[..start].ends_with('-') {
        start -= 1;
    }

    let (sign, unsigned) = match text[start..].strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", &text[start..]),
    };
    let digits: String = unsigned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    format!("{}{}", sign, digits).parse().ok()
}
