pub mod console;
pub mod food_analyzer;

pub use console::ConsoleHandler;
pub use food_analyzer::FoodAnalyzer;
