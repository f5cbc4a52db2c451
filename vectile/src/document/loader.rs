//! Document loader abstraction for testability.
//!
//! The trait boxes its future so loaders can be held as trait objects by
//! sources and swapped for counting mocks in tests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use super::error::LoadError;

/// Default timeout for document fetches.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for fetching a raw document body from a URL.
///
/// Timeouts are this layer's responsibility; the tile index above it only
/// sees the terminal success or failure.
pub trait DocumentLoader: Send + Sync {
    /// Fetch the document body at `url`.
    fn load(&self, url: &str) -> Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + '_>>;
}

/// Real document loader backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpDocumentLoader {
    client: reqwest::Client,
}

impl HttpDocumentLoader {
    /// Create a loader with the default timeout.
    pub fn new() -> Result<Self, LoadError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a loader with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LoadError::Fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl DocumentLoader for HttpDocumentLoader {
    fn load(&self, url: &str) -> Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            debug!(url = %url, "fetching document");
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| LoadError::Fetch(e.to_string()))?
                .error_for_status()
                .map_err(|e| LoadError::Fetch(e.to_string()))?;
            response
                .text()
                .await
                .map_err(|e| LoadError::Fetch(e.to_string()))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock loader returning a fixed body (or error) and counting calls.
    pub struct MockDocumentLoader {
        body: Result<String, LoadError>,
        loads: AtomicUsize,
    }

    impl MockDocumentLoader {
        pub fn ok(body: impl Into<String>) -> Self {
            Self {
                body: Ok(body.into()),
                loads: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: LoadError) -> Self {
            Self {
                body: Err(error),
                loads: AtomicUsize::new(0),
            }
        }

        /// Number of times `load` has been invoked.
        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl DocumentLoader for MockDocumentLoader {
        fn load(
            &self,
            _url: &str,
        ) -> Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + '_>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let body = self.body.clone();
            Box::pin(async move { body })
        }
    }

    #[tokio::test]
    async fn test_mock_loader_counts_calls() {
        let loader = MockDocumentLoader::ok("{}");
        assert_eq!(loader.load_count(), 0);
        let _ = loader.load("http://example.com/a.geojson").await;
        let _ = loader.load("http://example.com/a.geojson").await;
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_loader_returns_error() {
        let loader = MockDocumentLoader::failing(LoadError::Fetch("boom".to_string()));
        let result = loader.load("http://example.com/a.geojson").await;
        assert_eq!(result, Err(LoadError::Fetch("boom".to_string())));
    }
}
