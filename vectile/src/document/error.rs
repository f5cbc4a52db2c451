//! Error types for document loading and parsing.
//!
//! `LoadError` is `Clone` so that a single failed build can be handed to
//! every caller awaiting the memoized load.

use thiserror::Error;

/// Errors that can occur while fetching or parsing a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// HTTP fetch failed
    #[error("document fetch failed: {0}")]
    Fetch(String),

    /// Document body is not valid GeoJSON
    #[error("document parse failed: {0}")]
    Parse(String),

    /// Valid GeoJSON but not a shape this engine accepts
    #[error("unsupported GeoJSON input: {0}")]
    Unsupported(String),

    /// A URL input was given without a loader to fetch it
    #[error("no document loader configured for {0}")]
    NoLoader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = LoadError::Fetch("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "document fetch failed: connection refused"
        );
    }

    #[test]
    fn test_clone_preserves_message() {
        let err = LoadError::Parse("bad token".to_string());
        assert_eq!(err.clone(), err);
    }
}
