mod gemini;

pub use gemini::GeminiGateway;

use crate::error::AnalyzerError;
use async_trait::async_trait;
use std::path::Path;

/// Unified trait for generative model backends
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Get the gateway name (e.g., "gemini")
    fn gateway_name(&self) -> &str;

    /// Generate text from a prompt
    async fn generate_text(&self, prompt: &str) -> Result<String, AnalyzerError>;

    /// Generate text from a prompt plus raw image bytes
    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AnalyzerError>;
}

/// Infer an image MIME type from a file extension.
///
/// Unknown or missing extensions fall back to a generic image type instead
/// of failing; the model tolerates a wrong subtype better than no payload.
pub fn mime_for_image(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "image/jpeg",
    }
}
