use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    /// The only fatal condition: nothing can be durably recorded without
    /// the catalog, so the run aborts.
    #[error("Record catalog unavailable at {path}: {reason}")]
    CatalogUnavailable { path: String, reason: String },

    #[error("No record with id {id} in the catalog")]
    UnknownRecord { id: String },

    #[error("Analysis failed for {url}: {reason}")]
    Analysis { url: String, reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
