//! Error types for the haiku garden

use thiserror::Error;

/// Result type alias using haiku-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the haiku garden.
///
/// Malformed proposals, repeated decisions and unknown selections are not
/// errors; they are normalized or reported as no-op outcomes. The variants
/// here cover the ambient surface around the review workflow.
#[derive(Debug, Error)]
pub enum Error {
    // ============ Configuration Errors ============
    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// An image catalog was built without any entries
    #[error("Image catalog must contain at least one image")]
    EmptyCatalog,

    // ============ Tool Errors ============
    /// Tool not found in the toolset
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution failed
    #[error("Tool execution error: {tool_name} - {message}")]
    ToolExecution {
        /// Name of the tool that failed
        tool_name: String,
        /// Error message
        message: String,
    },

    // ============ Review Errors ============
    /// The decision channel to the display layer is gone
    #[error("Decision channel error: {0}")]
    DecisionChannel(String),

    // ============ Serialization Errors ============
    /// YAML parsing failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    // ============ System Errors ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============ Generic Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new tool execution error
    pub fn tool_execution(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a new decision channel error
    pub fn decision_channel(msg: impl Into<String>) -> Self {
        Self::DecisionChannel(msg.into())
    }
}
