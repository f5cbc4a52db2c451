//! Pre-tiled-binary-backed vector source.
//!
//! The wire format, cache, and spatial index of pre-tiled sources live
//! outside this crate; this module only declares the store contract and
//! the thin source wrapper that dispatches to it. The trait boxes its
//! future so stores can be held as trait objects.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::coord::TileCoord;

use super::types::{PickedFeature, TileLayers};

/// Errors from the external tile store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Opening the store failed (bad URL, unreadable header, ...)
    #[error("failed to open tile store: {0}")]
    Open(String),

    /// A tile fetch failed
    #[error("tile fetch failed: {0}")]
    Fetch(String),
}

/// Contract consumed from the external pre-tiled store/cache.
///
/// `get` returns the display tile's features already transformed for the
/// requested tile size, or an empty map when the tile is absent; the
/// renderer treats both as "nothing to paint".
pub trait DisplayTileStore: Send + Sync {
    /// Fetch and transform the tile at `coord`.
    fn get(
        &self,
        coord: TileCoord,
        tile_size: u32,
    ) -> Pin<Box<dyn Future<Output = Result<TileLayers, StoreError>> + Send + '_>>;

    /// The store's own spatial query at a zoom level.
    fn query_features(&self, lon: f64, lat: f64, zoom: u8) -> Vec<PickedFeature>;
}

/// Constructor for external stores, injected where a pre-tiled URL must be
/// opened at provider-creation time.
pub trait TileStoreFactory: Send + Sync {
    /// Open the store behind `url`.
    fn open(&self, url: &str) -> Result<Arc<dyn DisplayTileStore>, StoreError>;
}

/// Vector source over an external pre-tiled store.
///
/// Cloning shares the store handle, so derived sources reuse whatever
/// caching the external store maintains.
#[derive(Clone)]
pub struct PreTiledSource {
    url: Option<String>,
    store: Arc<dyn DisplayTileStore>,
    feature_id_prop: String,
}

impl PreTiledSource {
    /// Property carrying the feature identifier in pre-tiled sources.
    pub const DEFAULT_FEATURE_ID_PROP: &'static str = "FID";

    /// Wrap an external store.
    pub fn new(store: Arc<dyn DisplayTileStore>) -> Self {
        Self {
            url: None,
            store,
            feature_id_prop: Self::DEFAULT_FEATURE_ID_PROP.to_string(),
        }
    }

    /// Record the URL the store was opened from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Override the feature-id property used by highlight rules.
    pub fn with_feature_id_prop(mut self, prop: impl Into<String>) -> Self {
        self.feature_id_prop = prop.into();
        self
    }

    /// The URL the store was opened from, if known.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The feature-id property name for this source.
    pub fn feature_id_prop(&self) -> &str {
        &self.feature_id_prop
    }

    /// Fetch a tile from the external store.
    pub async fn get(&self, coord: TileCoord, tile_size: u32) -> Result<TileLayers, StoreError> {
        self.store.get(coord, tile_size).await
    }

    /// Query the external store's spatial index.
    pub fn query_features(&self, lon: f64, lat: f64, zoom: u8) -> Vec<PickedFeature> {
        self.store.query_features(lon, lat, zoom)
    }
}

impl fmt::Debug for PreTiledSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreTiledSource")
            .field("url", &self.url)
            .field("feature_id_prop", &self.feature_id_prop)
            .finish()
    }
}
