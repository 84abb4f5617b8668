use thiserror::Error;

/// Errors that can occur during ingredient analysis and recipe operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Failed to reach the generative model API
    #[error("Model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model API answered with a non-success status
    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Model returned text that could not be reduced to the expected JSON shape
    #[error("Unusable model output: {0}")]
    MalformedOutput(String),

    /// Operation invoked without the input it requires
    #[error("{0}")]
    EmptyInput(String),

    /// Recipe dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Failed to read a file (image or dataset)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a dataset row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
