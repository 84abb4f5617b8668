use crate::config::AnalyzerConfig;
use crate::dataset;
use crate::error::AnalyzerError;
use crate::extract;
use crate::gateway::{GeminiGateway, ModelGateway};
use crate::generate;
use crate::matcher;
use crate::model::{Analysis, GeneratedRecipe, IngredientList, RecipeRecord};
use std::path::Path;

/// Session-scoped facade tying the pipeline together.
///
/// An `Analyzer` owns the model gateway, the loaded recipe dataset and the
/// "last known ingredients" slot. The slot is overwritten by every successful
/// `analyze` call and read by recipe operations that don't re-supply
/// ingredients, mirroring a single user session. Create one `Analyzer` per
/// session; the slot is per-value state, never shared between sessions, and
/// `analyze` taking `&mut self` keeps extractions on one session serial.
pub struct Analyzer {
    gateway: Box<dyn ModelGateway>,
    config: AnalyzerConfig,
    dataset: Vec<RecipeRecord>,
    known: IngredientList,
}

impl Analyzer {
    /// Create an analyzer with an explicit gateway (tests inject stubs here)
    pub fn new(gateway: Box<dyn ModelGateway>, config: AnalyzerConfig) -> Self {
        Analyzer {
            gateway,
            config,
            dataset: Vec::new(),
            known: IngredientList::default(),
        }
    }

    /// Create an analyzer backed by the Gemini gateway from configuration
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let gateway = GeminiGateway::new(&config.gemini)?;
        Ok(Analyzer::new(Box::new(gateway), config))
    }

    /// Load the recipe dataset from a CSV file, replacing any previous one.
    /// Returns the number of recipes loaded.
    pub fn load_dataset(&mut self, csv_path: &Path) -> Result<usize, AnalyzerError> {
        self.dataset = dataset::load_recipes(csv_path)?;
        Ok(self.dataset.len())
    }

    pub fn set_dataset(&mut self, dataset: Vec<RecipeRecord>) {
        self.dataset = dataset;
    }

    /// Detect ingredients from an image and/or text prompt; an image takes
    /// priority. On success the session's known-ingredient slot is
    /// overwritten with the result.
    pub async fn analyze(
        &mut self,
        image_path: Option<&str>,
        prompt: Option<&str>,
    ) -> Result<Analysis, AnalyzerError> {
        let analysis = extract::extract(self.gateway.as_ref(), image_path, prompt).await?;
        self.known = analysis.ingredients.clone();
        Ok(analysis)
    }

    /// The session's current known ingredients (last successful analysis)
    pub fn known_ingredients(&self) -> &IngredientList {
        &self.known
    }

    /// Replace the session's known ingredients without a model call
    pub fn set_known_ingredients(&mut self, ingredients: IngredientList) {
        self.known = ingredients;
    }

    /// Match the dataset against the session's known ingredients and return
    /// the best `top_n` recipes (model-ranked, with deterministic fallback).
    pub async fn matching_recipes(
        &self,
        top_n: usize,
    ) -> Result<Vec<RecipeRecord>, AnalyzerError> {
        if self.known.is_empty() {
            return Err(AnalyzerError::EmptyInput(
                "No known ingredients. Analyze an image or description first".to_string(),
            ));
        }

        let candidates =
            matcher::find_valid_recipes(&self.dataset, &self.known, &self.config.matcher);
        Ok(matcher::filter_top_recipes(
            self.gateway.as_ref(),
            &self.known,
            &candidates,
            top_n,
            &self.config.matcher,
        )
        .await)
    }

    /// Generate `count` novel recipes from the session's known ingredients
    pub async fn generate_recipes(
        &self,
        count: usize,
        preferences: Option<&str>,
    ) -> Result<Vec<GeneratedRecipe>, AnalyzerError> {
        if self.known.is_empty() {
            return Err(AnalyzerError::EmptyInput(
                "No known ingredients. Analyze an image or description first".to_string(),
            ));
        }

        Ok(generate::generate(
            self.gateway.as_ref(),
            &self.known,
            count,
            preferences,
            &self.config.generator,
        )
        .await)
    }
}
