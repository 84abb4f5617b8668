use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main analyzer configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    /// Gemini API settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Recipe matching settings
    #[serde(default)]
    pub matcher: MatcherConfig,
    /// Recipe generation settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Configuration for the Gemini model gateway
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Model identifier (e.g., "gemini-2.5-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via GEMINI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for proxies and tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for the deterministic recipe pre-filter and model ranking
#[derive(Debug, Deserialize, Clone)]
pub struct MatcherConfig {
    /// Minimum number of known ingredients a recipe must share to be a candidate
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,
    /// Maximum number of candidates handed to the model for ranking
    #[serde(default = "default_rank_candidate_cap")]
    pub rank_candidate_cap: usize,
}

/// Configuration for recipe generation retries and fallback
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// Number of generation attempts before falling back
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Maximum number of synthetic fallback recipes
    #[serde(default = "default_fallback_ceiling")]
    pub fallback_ceiling: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
            rank_candidate_cap: default_rank_candidate_cap(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            fallback_ceiling: default_fallback_ceiling(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            matcher: MatcherConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_min_overlap() -> usize {
    1
}

fn default_rank_candidate_cap() -> usize {
    20
}

fn default_max_attempts() -> u32 {
    2
}

fn default_fallback_ceiling() -> usize {
    8
}

impl AnalyzerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__GEMINI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Environment variables with PANTRY_ prefix
            // Use double underscore for nested: PANTRY__GEMINI__API_KEY
            .add_source(
                Environment::with_prefix("PANTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
