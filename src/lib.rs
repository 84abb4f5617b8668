pub mod analyzer;
pub mod coerce;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod generate;
pub mod matcher;
pub mod model;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use gateway::{GeminiGateway, ModelGateway};
pub use model::{Analysis, AnalysisSource, GeneratedRecipe, IngredientList, RecipeRecord};
