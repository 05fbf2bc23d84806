mod config;
mod errors;
mod handlers;
mod models;
mod services;

use anyhow::Result;
use std::sync::Arc;
use tokio::io::BufReader;

use config::AppConfig;
use handlers::{ConsoleHandler, FoodAnalyzer};
use services::{
    DietPlanner, HealthyAlternatives, HttpImageClassifier, ImageClassifier, LabelResolver, NutritionTable,
    OpenRouterService, PresetLibrary, RecipeService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting EATelligence AI...");

    let config = AppConfig::from_env()?;

    let nutrition = match NutritionTable::load(&config.nutrition_csv) {
        Ok(table) => {
            log::info!("✅ Nutrition table loaded: {} dishes", table.len());
            table
        }
        Err(e) => {
            log::warn!("⚠️ Nutrition data unavailable ({:#}); lookups will find nothing", e);
            NutritionTable::default()
        }
    };
    let nutrition = Arc::new(nutrition);

    let resolver = Arc::new(LabelResolver::default());
    for (alias, owner, winner) in resolver.table().shadowed_aliases() {
        log::debug!("🔎 Alias '{}' of '{}' resolves to '{}'", alias, owner, winner);
    }
    log::info!("✅ Label resolver initialized");

    let classifier: Option<Arc<dyn ImageClassifier>> = match &config.classifier_url {
        Some(url) => match HttpImageClassifier::new(url.clone(), config.http_timeout) {
            Ok(classifier) => {
                log::info!("✅ Image classifier configured at {}", url);
                Some(Arc::new(classifier) as Arc<dyn ImageClassifier>)
            }
            Err(e) => {
                log::warn!("⚠️ Image classifier disabled: {:#}", e);
                None
            }
        },
        None => {
            log::warn!("⚠️ CLASSIFIER_URL not set, image recognition disabled");
            None
        }
    };

    let presets = match &classifier {
        Some(classifier) => match PresetLibrary::load(&config.preset_dir, classifier.as_ref()).await {
            Ok(library) => library,
            Err(e) => {
                log::warn!("⚠️ Preset images unavailable: {:#}", e);
                PresetLibrary::default()
            }
        },
        None => PresetLibrary::default(),
    };
    let presets = Arc::new(presets);

    let recipes: Option<Arc<dyn RecipeService>> = match &config.openrouter_api_key {
        Some(api_key) => {
            let service = OpenRouterService::new(api_key.clone(), config.openrouter_model.clone(), config.http_timeout)?;
            log::info!("✅ OpenRouter service initialized with model: {}", config.openrouter_model);
            Some(Arc::new(service) as Arc<dyn RecipeService>)
        }
        None => {
            log::warn!("⚠️ OPENROUTER_API_KEY not set, recipe generation disabled");
            None
        }
    };

    let analyzer = Arc::new(FoodAnalyzer::new(
        resolver.clone(),
        nutrition.clone(),
        presets,
        classifier,
        &config,
    ));
    let planner = Arc::new(DietPlanner::new(nutrition.clone()));
    let alternatives = Arc::new(HealthyAlternatives::new(resolver, nutrition, config.label_threshold));

    let console = ConsoleHandler::new(analyzer, planner, alternatives, recipes);
    log::info!("🎉 EATelligence AI is ready!");

    println!("\n🥗 EATelligence AI");
    println!("   Type a food name, or 'help' for commands.");
    println!("🛑 'quit' or Ctrl+C to exit\n");

    tokio::select! {
        served = console.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => {
            if let Err(e) = served {
                log::error!("❌ Console stopped: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {}
    }

    log::info!("🛑 Shutting down...");

    Ok(())
}
