use crate::coerce;
use crate::config::MatcherConfig;
use crate::gateway::ModelGateway;
use crate::model::{IngredientList, RecipeRecord};
use log::{debug, warn};

/// Deterministic pre-filter: keep recipes sharing at least
/// `MatcherConfig::min_overlap` ingredients with the known set.
///
/// Comparison uses the same case-insensitive trimmed key as the extractor.
/// Input order is preserved.
pub fn find_valid_recipes(
    dataset: &[RecipeRecord],
    known: &IngredientList,
    config: &MatcherConfig,
) -> Vec<RecipeRecord> {
    dataset
        .iter()
        .filter(|recipe| overlap_count(recipe, known) >= config.min_overlap)
        .cloned()
        .collect()
}

fn overlap_count(recipe: &RecipeRecord, known: &IngredientList) -> usize {
    recipe
        .ingredients
        .iter()
        .filter(|ingredient| known.contains(ingredient))
        .count()
}

/// Ask the model to rank a bounded subset of candidates and return the best
/// `top_n`.
///
/// The subset handed to the model is capped at
/// `MatcherConfig::rank_candidate_cap` to respect prompt-size limits. The
/// model is expected to reply with a JSON array of 0-based indices into that
/// subset; out-of-range and duplicate indices are skipped. Any failure
/// (transport, unusable output, zero valid indices) falls back to the first
/// `top_n` candidates in original order.
pub async fn filter_top_recipes(
    gateway: &dyn ModelGateway,
    known: &IngredientList,
    candidates: &[RecipeRecord],
    top_n: usize,
    config: &MatcherConfig,
) -> Vec<RecipeRecord> {
    if candidates.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let subset = &candidates[..candidates.len().min(config.rank_candidate_cap)];
    let prompt = build_ranking_prompt(known, subset, top_n);

    let raw = match gateway.generate_text(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Recipe ranking call failed, keeping original order: {}", e);
            return first_n(candidates, top_n);
        }
    };

    let Some(items) = coerce::coerce_to_array(&raw) else {
        warn!("Recipe ranking output was not a JSON array, keeping original order");
        return first_n(candidates, top_n);
    };

    let mut picked: Vec<usize> = Vec::new();
    for item in &items {
        let Some(index) = item.as_u64().map(|i| i as usize) else {
            continue;
        };
        if index >= subset.len() {
            debug!("Skipping out-of-range ranking index {}", index);
            continue;
        }
        if picked.contains(&index) {
            continue;
        }
        picked.push(index);
        if picked.len() == top_n {
            break;
        }
    }

    if picked.is_empty() {
        warn!("Recipe ranking returned no usable indices, keeping original order");
        return first_n(candidates, top_n);
    }

    picked.into_iter().map(|i| subset[i].clone()).collect()
}

fn first_n(candidates: &[RecipeRecord], top_n: usize) -> Vec<RecipeRecord> {
    candidates.iter().take(top_n).cloned().collect()
}

fn build_ranking_prompt(known: &IngredientList, subset: &[RecipeRecord], top_n: usize) -> String {
    let mut prompt = String::from(
        "You are ranking recipes for a cook with a limited pantry.\n\nAvailable ingredients: ",
    );
    prompt.push_str(&known.names().join(", "));
    prompt.push_str("\n\nCandidate recipes:\n");
    for (index, recipe) in subset.iter().enumerate() {
        prompt.push_str(&format!(
            "{}: {} (needs: {})\n",
            index,
            recipe.title,
            recipe.ingredients.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "\nPick the {} best recipes by ingredient coverage, practicality and variety.\n\
         Respond with strictly a JSON array of the chosen 0-based indices and nothing else.\n\
         Example: [2, 0, 5]",
        top_n
    ));
    prompt
}
