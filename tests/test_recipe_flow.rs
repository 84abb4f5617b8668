use pantry_chef::config::{AnalyzerConfig, GeminiConfig};
use pantry_chef::{Analyzer, GeminiGateway, IngredientList, RecipeRecord};
use std::io::Write;

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent?key=test-key";

fn analyzer_against(server: &mockito::ServerGuard) -> Analyzer {
    let gemini = GeminiConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.url(),
        ..Default::default()
    };
    let gateway = GeminiGateway::new(&gemini).unwrap();
    let config = AnalyzerConfig {
        gemini,
        ..Default::default()
    };
    Analyzer::new(Box::new(gateway), config)
}

fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    })
    .to_string()
}

fn pantry(names: &[&str]) -> IngredientList {
    IngredientList::from_raw(names.iter().map(|n| n.to_string()).collect())
}

fn sample_dataset() -> Vec<RecipeRecord> {
    vec![
        RecipeRecord {
            title: "Pancakes".to_string(),
            ingredients: vec!["flour".to_string(), "egg".to_string(), "milk".to_string()],
        },
        RecipeRecord {
            title: "Omelette".to_string(),
            ingredients: vec!["egg".to_string(), "butter".to_string()],
        },
        RecipeRecord {
            title: "Beef stew".to_string(),
            ingredients: vec!["beef".to_string(), "onion".to_string()],
        },
    ]
}

#[tokio::test]
async fn test_matching_recipes_with_model_ranking() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", GEMINI_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply("[1, 0]"))
        .create_async()
        .await;

    let mut analyzer = analyzer_against(&server);
    analyzer.set_dataset(sample_dataset());
    analyzer.set_known_ingredients(pantry(&["egg", "flour"]));

    let recipes = analyzer.matching_recipes(2).await.unwrap();

    // The beef stew shares nothing with the pantry and never reaches ranking
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].title, "Omelette");
    assert_eq!(recipes[1].title, "Pancakes");
}

#[tokio::test]
async fn test_matching_recipes_ranking_outage_keeps_original_order() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", GEMINI_PATH)
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let mut analyzer = analyzer_against(&server);
    analyzer.set_dataset(sample_dataset());
    analyzer.set_known_ingredients(pantry(&["egg"]));

    let recipes = analyzer.matching_recipes(1).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Pancakes");
}

#[tokio::test]
async fn test_dataset_csv_to_matches() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "title,ingredients").unwrap();
    writeln!(csv, "Pancakes,\"flour, egg, milk\"").unwrap();
    writeln!(csv, "Beef stew,\"beef, onion\"").unwrap();
    csv.flush().unwrap();

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", GEMINI_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply("[0]"))
        .create_async()
        .await;

    let mut analyzer = analyzer_against(&server);
    let loaded = analyzer.load_dataset(csv.path()).unwrap();
    assert_eq!(loaded, 2);

    analyzer.set_known_ingredients(pantry(&["egg", "flour"]));
    let recipes = analyzer.matching_recipes(1).await.unwrap();
    assert_eq!(recipes[0].title, "Pancakes");
}

#[tokio::test]
async fn test_generation_end_to_end() {
    let recipes_json = r#"```json
[
  {"name": "Fridge frittata", "ingredients": ["egg", "cheese"], "steps": ["Whisk the eggs.", "Add cheese.", "Bake until set."]},
  {"name": "Cheese toastie", "ingredients": ["bread", "cheese"], "steps": ["Butter the bread.", "Add cheese.", "Grill until golden."]}
]
```"#;

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", GEMINI_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply(recipes_json))
        .create_async()
        .await;

    let mut analyzer = analyzer_against(&server);
    analyzer.set_known_ingredients(pantry(&["egg", "cheese", "bread"]));

    let recipes = analyzer.generate_recipes(2, Some("quick meals")).await.unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].name, "Fridge frittata");
    assert_eq!(recipes[1].steps.len(), 3);
}

#[tokio::test]
async fn test_generation_outage_synthesizes_fallback_recipes() {
    let mut server = mockito::Server::new_async().await;
    // Both attempts hit the same outage
    let mock = server
        .mock("POST", GEMINI_PATH)
        .with_status(503)
        .with_body("overloaded")
        .expect(2)
        .create_async()
        .await;

    let mut analyzer = analyzer_against(&server);
    analyzer.set_known_ingredients(pantry(&["egg", "flour", "milk", "sugar", "butter"]));

    let recipes = analyzer.generate_recipes(3, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(recipes.len(), 3);
    for recipe in &recipes {
        assert!(!recipe.name.is_empty());
        assert!(!recipe.ingredients.is_empty());
        assert_eq!(recipe.steps.len(), 4);
    }
}
