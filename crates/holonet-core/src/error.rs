use thiserror::Error;

/// Top-level error type for the Holonet service process.
#[derive(Error, Debug)]
pub enum HolonetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
