use crate::config::GeminiConfig;
use crate::error::AnalyzerError;
use crate::gateway::ModelGateway;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    base_url: String,
}

impl GeminiGateway {
    /// Create a new Gemini gateway from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self, AnalyzerError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                config::ConfigError::Message(
                    "GEMINI_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(GeminiGateway {
            client,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn generate(&self, parts: Vec<Value>) -> Result<String, AnalyzerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "parts": parts
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api { status, message });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AnalyzerError::MalformedOutput(
                    "no text candidate in Gemini response".to_string(),
                )
            })?
            .to_string();

        Ok(text)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn gateway_name(&self) -> &str {
        "gemini"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AnalyzerError> {
        if prompt.trim().is_empty() {
            return Err(AnalyzerError::EmptyInput("Prompt cannot be empty".to_string()));
        }

        self.generate(vec![json!({ "text": prompt })]).await
    }

    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AnalyzerError> {
        if prompt.trim().is_empty() {
            return Err(AnalyzerError::EmptyInput("Prompt cannot be empty".to_string()));
        }

        let data = STANDARD.encode(image);
        self.generate(vec![
            json!({ "text": prompt }),
            json!({
                "inline_data": {
                    "mime_type": mime_type,
                    "data": data
                }
            }),
        ])
        .await
    }
}
