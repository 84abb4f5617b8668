use crate::error::AnalyzerError;
use crate::model::RecipeRecord;
use csv::ReaderBuilder;
use log::info;
use std::borrow::Cow;
use std::path::Path;

// Accepted column headers (matched case-insensitively)
const TITLE_COLS: [&str; 2] = ["title", "name"];
const INGREDIENTS_COL: &str = "ingredients";

/// Load the recipe dataset from a CSV file.
///
/// The `ingredients` cell holds a single delimited list (comma or semicolon).
/// Rows with an empty title or no ingredients are skipped. Files that are not
/// valid UTF-8 are decoded through a Latin-1 fallback; public recipe dumps
/// are frequently exported that way.
pub fn load_recipes(csv_path: &Path) -> Result<Vec<RecipeRecord>, AnalyzerError> {
    if !csv_path.exists() {
        return Err(AnalyzerError::Dataset(format!(
            "Recipe dataset not found at {:?}",
            csv_path
        )));
    }

    let bytes = std::fs::read(csv_path)?;
    let text = decode_with_fallback(&bytes);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let title_idx = headers
        .iter()
        .position(|h| TITLE_COLS.contains(&h.trim().to_lowercase().as_str()))
        .ok_or_else(|| {
            AnalyzerError::Dataset("Column 'title' (or 'name') not found".to_string())
        })?;
    let ingredients_idx = headers
        .iter()
        .position(|h| h.trim().to_lowercase() == INGREDIENTS_COL)
        .ok_or_else(|| AnalyzerError::Dataset("Column 'ingredients' not found".to_string()))?;

    let mut recipes = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let title = record.get(title_idx).unwrap_or("").trim().to_string();
        if title.is_empty() {
            continue;
        }

        let ingredients = split_ingredients(record.get(ingredients_idx).unwrap_or(""));
        if ingredients.is_empty() {
            continue;
        }

        recipes.push(RecipeRecord { title, ingredients });
    }

    if recipes.is_empty() {
        return Err(AnalyzerError::Dataset(format!(
            "No usable recipes loaded from {:?}",
            csv_path
        )));
    }

    info!("Loaded {} recipes from {:?}", recipes.len(), csv_path);
    Ok(recipes)
}

fn decode_with_fallback(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        // Latin-1: every byte maps directly to the same code point
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

fn split_ingredients(cell: &str) -> Vec<String> {
    cell.split(|c| c == ',' || c == ';')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
