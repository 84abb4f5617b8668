use crate::coerce;
use crate::config::GeneratorConfig;
use crate::gateway::ModelGateway;
use crate::model::{GeneratedRecipe, IngredientList};
use log::{info, warn};
use serde_json::{Map, Value};

const GENERATION_PROMPT: &str = r#"
You are a creative chef. Invent recipes using only the available ingredients
(plus water, salt, pepper and basic pantry staples).

Respond with strictly a JSON array of recipe objects and nothing else:

[
  {
    "name": "<RECIPE NAME>",
    "ingredients": ["<INGREDIENT>", ...],
    "steps": ["<IMPERATIVE STEP>", ...]
  }
]

Each recipe must have 3 to 6 steps.
"#;

const STRICT_JSON_REINFORCEMENT: &str =
    "\n\nSTRICT JSON ONLY. Output a single JSON array, no markdown fences, no prose.";

// Fixed procedure attached to synthetic fallback recipes
const FALLBACK_STEPS: [&str; 4] = [
    "Rinse and prepare the listed ingredients.",
    "Chop everything into bite-sized pieces.",
    "Cook in a pan over medium heat until done, seasoning to taste.",
    "Plate and serve warm.",
];

const FALLBACK_INGREDIENT_POOL: usize = 10;

/// Generate up to `count` recipes from the known ingredients.
///
/// An empty ingredient list returns an empty result without touching the
/// model. Otherwise the model is asked for strict JSON, with up to
/// `GeneratorConfig::max_attempts` tries (retries reinforce the JSON-only
/// instruction). The first attempt producing at least one schema-valid recipe
/// wins. When every attempt is unusable, deterministic synthetic recipes are
/// returned instead, so the operation never comes back empty-handed when
/// ingredients were supplied.
pub async fn generate(
    gateway: &dyn ModelGateway,
    known: &IngredientList,
    count: usize,
    preferences: Option<&str>,
    config: &GeneratorConfig,
) -> Vec<GeneratedRecipe> {
    if known.is_empty() || count == 0 {
        return Vec::new();
    }

    let base_prompt = build_generation_prompt(known, count, preferences);

    for attempt in 1..=config.max_attempts {
        let prompt = if attempt == 1 {
            base_prompt.clone()
        } else {
            format!("{}{}", base_prompt, STRICT_JSON_REINFORCEMENT)
        };

        let raw = match gateway.generate_text(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Recipe generation attempt {}/{} failed: {}",
                    attempt, config.max_attempts, e
                );
                continue;
            }
        };

        let Some(objects) = coerce::coerce_to_object_array(&raw) else {
            warn!(
                "Recipe generation attempt {}/{} produced no JSON array",
                attempt, config.max_attempts
            );
            continue;
        };

        let recipes: Vec<GeneratedRecipe> =
            objects.into_iter().filter_map(validate_recipe).collect();

        if !recipes.is_empty() {
            info!(
                "Generated {} recipes on attempt {}/{}",
                recipes.len(),
                attempt,
                config.max_attempts
            );
            return recipes.into_iter().take(count).collect();
        }
    }

    warn!("All generation attempts unusable, synthesizing fallback recipes");
    fallback_recipes(known, count.min(config.fallback_ceiling))
}

/// Validate one model-supplied recipe object; malformed candidates are
/// dropped individually rather than failing the batch.
fn validate_recipe(object: Map<String, Value>) -> Option<GeneratedRecipe> {
    let name = object.get("name")?.as_str()?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let ingredients = string_array(object.get("ingredients"));
    let steps = string_array(object.get("steps"));
    if ingredients.is_empty() && steps.is_empty() {
        return None;
    }

    Some(GeneratedRecipe {
        name,
        ingredients,
        steps,
    })
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Round-robin the first few known ingredients across `count` synthetic
/// recipes, each with the fixed generic procedure.
fn fallback_recipes(known: &IngredientList, count: usize) -> Vec<GeneratedRecipe> {
    let pool: Vec<&String> = known.names().iter().take(FALLBACK_INGREDIENT_POOL).collect();
    let steps: Vec<String> = FALLBACK_STEPS.iter().map(|s| s.to_string()).collect();

    (0..count)
        .map(|index| {
            let ingredients: Vec<String> = pool
                .iter()
                .enumerate()
                .filter(|(pool_index, _)| pool_index % count == index)
                .map(|(_, name)| (*name).clone())
                .collect();

            let name = match ingredients.first() {
                Some(first) => format!("Simple {} skillet", first.to_lowercase()),
                None => format!("Pantry dish #{}", index + 1),
            };

            GeneratedRecipe {
                name,
                ingredients,
                steps: steps.clone(),
            }
        })
        .collect()
}

fn build_generation_prompt(
    known: &IngredientList,
    count: usize,
    preferences: Option<&str>,
) -> String {
    let mut prompt = format!(
        "{}\nAvailable ingredients: {}\nNumber of recipes: {}",
        GENERATION_PROMPT,
        known.names().join(", "),
        count
    );
    if let Some(preferences) = preferences {
        if !preferences.trim().is_empty() {
            prompt.push_str(&format!("\nCook's preferences: {}", preferences.trim()));
        }
    }
    prompt
}
