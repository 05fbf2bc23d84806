use anyhow::Result;

use crate::models::Recipe;

/// Trait for recipe generators (OpenRouter, canned fixtures in tests, etc.)
#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    async fn generate_recipe(&self, ingredients: &[String], cuisine: Option<&str>) -> Result<Recipe>;
}
