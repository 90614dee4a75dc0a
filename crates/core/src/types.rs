use thiserror::Error;

/// The main error type for Ordo operations
#[derive(Debug, Error)]
pub enum OrdoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Task error: {0}")]
    Task(String),
}

/// Result type alias for Ordo operations
pub type OrdoResult<T> = Result<T, OrdoError>;
