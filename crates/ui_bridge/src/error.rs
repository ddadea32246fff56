//! Bridge-level errors
//!
//! Every variant is fatal for the integration: the host is expected to stop
//! rather than render another frame on top of a broken invariant.

use std::path::PathBuf;

use thiserror::Error;

use crate::atlas::AtlasError;
use crate::config::ConfigError;

/// Result type for bridge operations
pub type UiResult<T> = Result<T, UiError>;

/// Errors raised by the bridge
#[derive(Error, Debug)]
pub enum UiError {
    /// Programmer misuse, e.g. `draw` without `new_frame`
    #[error("Usage error: {0}")]
    Usage(String),

    /// A requested file is missing or could not be decoded
    #[error("Resource error for {path:?}: {reason}")]
    Resource {
        /// Offending path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The GUI library reported a failure (e.g. font atlas build)
    #[error("GUI library error: {0}")]
    Library(String),

    /// The GUI library's vertex/index layout cannot be decoded
    #[error("Invalid render layout: {0}")]
    InvalidLayout(String),

    /// Draw data referenced bytes outside its own buffers
    #[error("Malformed draw data: {0}")]
    MalformedDrawData(String),

    /// Texture atlas failure, including unknown texture ids
    #[error("Atlas error: {0}")]
    Atlas(#[from] AtlasError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Host renderer failure
    #[error("Rendering error: {0}")]
    Render(String),
}
