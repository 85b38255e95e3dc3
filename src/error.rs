//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Per-slide and per-asset failures are recorded and processing continues;
//! only [`Error::MalformedInput`] and [`Error::NothingToProcess`] abort a
//! whole request.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Relay API error with status context
    #[error("Relay error: {message}")]
    Relay {
        /// Human-readable error description.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// File parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// The top-level request document is not valid JSON
    #[error("Invalid JSON input: {0}")]
    MalformedInput(String),

    /// A slide is missing a required field
    #[error("{0}")]
    Validation(String),

    /// The named template component does not exist in the document
    #[error("Template \"{0}\" not found in document")]
    TemplateNotFound(String),

    /// An image could not be fetched or decoded
    #[error("Failed to load image {url}: {message}")]
    AssetFetch {
        /// Source URL of the image.
        url: String,
        /// What went wrong.
        message: String,
    },

    /// Nothing was produced by a request
    #[error("No slides to process. JSON must contain \"slides\" array or \"coverSlide\" object{}", summarize(.errors))]
    NothingToProcess {
        /// Per-unit errors collected before giving up.
        errors: Vec<String>,
    },

    /// Scene graph rejected an operation
    #[error("Scene error: {0}")]
    Scene(String),
}

fn summarize(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" ({})", errors.join("; "))
    }
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a relay error with HTTP status and a matching hint
    pub fn relay_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            400 => Some("Check the workspace name"),
            404 => Some("No payload for this workspace yet. Send from the web app first"),
            405 => Some("The relay URL does not point at the payload endpoint"),
            503 => Some("Relay storage is not configured or unavailable"),
            500..=599 => Some("Relay server error - try again later"),
            _ => None,
        };
        Self::Relay {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create an asset fetch error
    pub fn asset(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssetFetch { url: url.into(), message: message.into() }
    }

    /// Create a scene graph error
    pub fn scene(message: impl Into<String>) -> Self {
        Self::Scene(message.into())
    }

    /// Whether this error aborts a whole request rather than a single slide
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedInput(_) | Self::NothingToProcess { .. })
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse { file: None, message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn relay_status_provides_hints() {
        let err = Error::relay_status("Not found", 404);
        match err {
            Error::Relay { hint: Some(h), status: Some(404), .. } => {
                assert!(h.contains("No payload"));
            }
            _ => panic!("Expected Relay error with hint"),
        }
    }

    #[test]
    fn nothing_to_process_lists_collected_errors() {
        let err = Error::NothingToProcess {
            errors: vec!["Slide 1 missing \"template\" field".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("No slides to process"));
        assert!(msg.contains("Slide 1"));
        assert!(err.is_fatal());
    }

    #[test]
    fn per_slide_errors_are_not_fatal() {
        assert!(!Error::TemplateNotFound("T".into()).is_fatal());
        assert!(!Error::Validation("x".into()).is_fatal());
        assert!(Error::MalformedInput("eof".into()).is_fatal());
    }
}
