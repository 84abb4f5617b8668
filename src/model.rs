use serde::{Deserialize, Serialize};

/// Ordered, deduplicated list of ingredient names.
///
/// Entries are unique under case-insensitive trimmed comparison; the stored
/// form keeps the casing of the first occurrence, and iteration order is
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngredientList(Vec<String>);

impl IngredientList {
    /// Build a list from raw model output: trim entries, drop empties,
    /// dedupe case-insensitively keeping the first spelling seen.
    pub fn from_raw(raw: Vec<String>) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let mut names = Vec::new();
        for entry in raw {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            names.push(trimmed.to_string());
        }
        IngredientList(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Case-insensitive membership test using the same key as dedup.
    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.0.iter().any(|n| n.to_lowercase() == key)
    }
}

/// A recipe row from the dataset, immutable once loaded
#[derive(Debug, Clone, Serialize)]
pub struct RecipeRecord {
    pub title: String,
    pub ingredients: Vec<String>,
}

/// A model-generated (or synthesized) recipe that passed schema validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// The input that drove an analysis, kept for diagnostics
#[derive(Debug, Clone, Serialize)]
pub enum AnalysisSource {
    Image(String),
    Prompt(String),
}

/// Successful outcome of an ingredient analysis
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub source: AnalysisSource,
    pub ingredients: IngredientList,
}
