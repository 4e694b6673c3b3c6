use thiserror::Error;

/// Errors produced by the customizer
#[derive(Debug, Error)]
pub enum CustomizerError {
    /// Failed to launch the browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation in the live page failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the live page failed
    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The page snapshot could not be parsed
    #[error("Failed to parse DOM snapshot: {0}")]
    DomParseFailed(String),

    /// A banner or profile picture target could not be located
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A CSS selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// No template with the given id exists in the catalog
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// The underlying key-value store rejected an operation
    #[error("Storage operation failed: {0}")]
    StorageFailed(String),

    /// Image decode, resize, encode or capture failed
    #[error("Image processing failed: {0}")]
    ImageFailed(String),

    /// A data URL could not be parsed
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// No action is registered under the given name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// An action received parameters it could not use
    #[error("Invalid parameters for '{action}': {reason}")]
    InvalidParams { action: String, reason: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for CustomizerError {
    fn from(err: image::ImageError) -> Self {
        CustomizerError::ImageFailed(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CustomizerError>;
