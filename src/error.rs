#[derive(Debug, thiserror::Error)]
pub enum AnalystError {
    #[error("API key is missing. Please provide it or set the OPENAI_API_KEY environment variable.")]
    MissingApiKey,
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Standard input closed before an assistant was chosen")]
    InputClosed,
}
