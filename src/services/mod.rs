pub mod ai_service;
pub mod alternatives;
pub mod classifier; // pretrained image classifier over HTTP
pub mod diet;
pub mod health;
pub mod innovations;
pub mod label_resolver;
pub mod nutrition;
pub mod openrouter; // OpenRouter recipe generation
pub mod preset_matcher;
pub mod report;
pub mod similarity;

pub use ai_service::RecipeService;
pub use alternatives::HealthyAlternatives;
pub use classifier::{HttpImageClassifier, ImageClassifier};
pub use diet::DietPlanner;
pub use label_resolver::LabelResolver;
pub use nutrition::NutritionTable;
pub use openrouter::OpenRouterService;
pub use preset_matcher::PresetLibrary;
