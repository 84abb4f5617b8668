use crate::coerce;
use crate::error::AnalyzerError;
use crate::gateway::{mime_for_image, ModelGateway};
use crate::model::{Analysis, AnalysisSource, IngredientList};
use log::{info, warn};
use std::path::Path;

const IMAGE_PROMPT: &str = r#"
Identify every distinct food ingredient visible in this photo.
Respond with strictly a JSON array of ingredient name strings and nothing else.
Example: ["tomato", "basil", "mozzarella"]
Do not include quantities, packaging, cookware or commentary.
"#;

const TEXT_PROMPT: &str = r#"
Extract every food ingredient mentioned in the user's text below.
Respond with strictly a JSON array of ingredient name strings and nothing else.
Example: ["egg", "flour"]
Do not include quantities, units or commentary.

User text:
"#;

/// Detect ingredients in a photo.
///
/// The image is read as raw binary; decoding it as text corrupts the payload.
/// Gateway failures and unusable model output collapse to an empty list, the
/// caller decides what an empty pantry means.
pub async fn extract_from_image(
    gateway: &dyn ModelGateway,
    image_path: &str,
) -> Result<IngredientList, AnalyzerError> {
    let bytes = tokio::fs::read(image_path).await?;
    let mime_type = mime_for_image(Path::new(image_path));
    info!("Analyzing image {} ({} bytes, {})", image_path, bytes.len(), mime_type);

    let raw = match gateway.generate_from_image(IMAGE_PROMPT, &bytes, mime_type).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Image extraction call failed: {}", e);
            return Ok(IngredientList::default());
        }
    };

    Ok(ingredient_list_from_raw(&raw))
}

/// Detect ingredients in a free-text description.
pub async fn extract_from_prompt(
    gateway: &dyn ModelGateway,
    text: &str,
) -> Result<IngredientList, AnalyzerError> {
    if text.trim().is_empty() {
        return Err(AnalyzerError::EmptyInput(
            "Please provide a text description of your ingredients".to_string(),
        ));
    }

    let prompt = format!("{}{}", TEXT_PROMPT, text);
    let raw = match gateway.generate_text(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Text extraction call failed: {}", e);
            return Ok(IngredientList::default());
        }
    };

    Ok(ingredient_list_from_raw(&raw))
}

/// Detect ingredients from an image and/or a text description.
///
/// An image takes priority: when one is supplied the text is ignored
/// entirely. Calling with neither is a contract violation.
pub async fn extract(
    gateway: &dyn ModelGateway,
    image_path: Option<&str>,
    prompt: Option<&str>,
) -> Result<Analysis, AnalyzerError> {
    if let Some(path) = image_path {
        let ingredients = extract_from_image(gateway, path).await?;
        return Ok(Analysis {
            source: AnalysisSource::Image(path.to_string()),
            ingredients,
        });
    }

    if let Some(text) = prompt {
        if !text.trim().is_empty() {
            let ingredients = extract_from_prompt(gateway, text).await?;
            return Ok(Analysis {
                source: AnalysisSource::Prompt(text.to_string()),
                ingredients,
            });
        }
    }

    Err(AnalyzerError::EmptyInput(
        "Please provide either an image or a text description".to_string(),
    ))
}

fn ingredient_list_from_raw(raw: &str) -> IngredientList {
    let names = match coerce::coerce_to_array(raw) {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        None => {
            warn!("Model output was not a JSON array, treating as no ingredients");
            Vec::new()
        }
    };
    IngredientList::from_raw(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubGateway {
        reply: String,
        fail: bool,
        text_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl StubGateway {
        fn replying(reply: &str) -> Self {
            StubGateway {
                reply: reply.to_string(),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            StubGateway {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ModelGateway for StubGateway {
        fn gateway_name(&self) -> &str {
            "stub"
        }

        async fn generate_text(&self, _prompt: &str) -> Result<String, AnalyzerError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AnalyzerError::MalformedOutput("stub failure".to_string()));
            }
            Ok(self.reply.clone())
        }

        async fn generate_from_image(
            &self,
            _prompt: &str,
            _image: &[u8],
            _mime_type: &str,
        ) -> Result<String, AnalyzerError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AnalyzerError::MalformedOutput("stub failure".to_string()));
            }
            Ok(self.reply.clone())
        }
    }

    fn temp_image() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        file
    }

    #[tokio::test]
    async fn test_prompt_extraction_dedupes_output() {
        let gateway = StubGateway::replying(r#"["Egg", "flour", "egg ", "", "Milk"]"#);
        let list = extract_from_prompt(&gateway, "stuff in my fridge").await.unwrap();
        assert_eq!(
            list.names(),
            &["Egg".to_string(), "flour".to_string(), "Milk".to_string()]
        );
    }

    #[tokio::test]
    async fn test_prompt_extraction_tolerates_prose_wrapping() {
        let gateway =
            StubGateway::replying("Sure!\n```json\n[\"butter\", \"sugar\"]\n```\nHope it helps.");
        let list = extract_from_prompt(&gateway, "baking things").await.unwrap();
        assert_eq!(list.names(), &["butter".to_string(), "sugar".to_string()]);
    }

    #[tokio::test]
    async fn test_refusal_text_becomes_empty_list() {
        let gateway = StubGateway::replying("I cannot identify ingredients");
        let list = extract_from_prompt(&gateway, "???").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_becomes_empty_list() {
        let gateway = StubGateway::failing();
        let list = extract_from_prompt(&gateway, "eggs and bacon").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_a_contract_violation() {
        let gateway = StubGateway::replying("[]");
        let result = extract_from_prompt(&gateway, "  ").await;
        assert!(matches!(result, Err(AnalyzerError::EmptyInput(_))));
        assert_eq!(gateway.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_takes_priority_over_prompt() {
        let gateway = StubGateway::replying(r#"["tomato"]"#);
        let image = temp_image();
        let analysis = extract(
            &gateway,
            Some(image.path().to_str().unwrap()),
            Some("2 eggs"),
        )
        .await
        .unwrap();

        assert_eq!(gateway.image_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.text_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(analysis.source, AnalysisSource::Image(_)));
        assert_eq!(analysis.ingredients.names(), &["tomato".to_string()]);
    }

    #[tokio::test]
    async fn test_no_inputs_is_a_contract_violation() {
        let gateway = StubGateway::replying("[]");
        let result = extract(&gateway, None, None).await;
        assert!(matches!(result, Err(AnalyzerError::EmptyInput(_))));
    }

    #[tokio::test]
    async fn test_missing_image_file_surfaces_io_error() {
        let gateway = StubGateway::replying("[]");
        let result = extract_from_image(&gateway, "/no/such/photo.jpg").await;
        assert!(matches!(result, Err(AnalyzerError::Io(_))));
    }
}
