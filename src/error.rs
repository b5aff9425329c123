//! Error types for client hints configuration.
//!
//! Request-time negotiation never fails: malformed hint headers, unknown
//! browsers and missing user agents all degrade to "hint unavailable" or a
//! configured default. Errors therefore only surface while building the
//! configuration or the user-agent parser, before any request is served.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | `UnknownHint`, `Config`, `Json` |
//! | Construction | `Regex` |

use thiserror::Error;

/// Result type for client hints operations.
pub type Result<T> = std::result::Result<T, HintsError>;

/// Errors raised while configuring client hints negotiation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HintsError {
    /// A hint name that does not map to any known client hint.
    #[error("Unknown client hint: {0}")]
    UnknownHint(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration document could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A user-agent rule failed to compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
