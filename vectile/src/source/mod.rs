//! Vector source abstraction
//!
//! A [`VectorSource`] is the capability the rest of the pipeline renders
//! from: `get(coord, tile_size)` returning transformed features grouped by
//! layer name. The two variants (untiled GeoJSON document and external
//! pre-tiled store) are an explicit tagged union; each carries its own
//! layer-name and feature-id fields rather than sharing sentinel
//! constants. The variant is chosen once at construction and never changes
//! for a given instance.

mod pretiled;
mod types;
mod untiled;

pub use pretiled::{DisplayTileStore, PreTiledSource, StoreError, TileStoreFactory};
pub use types::{PickedFeature, SourceError, TileLayers};
pub use untiled::{DocumentInput, IndexedDocument, UntiledSource};

use crate::coord::TileCoord;

/// A tile-producing vector source.
///
/// Requests for different tile coordinates are independent and safe to
/// issue concurrently; per-coordinate results are not cached here (the
/// untiled index and the external store each own their caching).
#[derive(Debug, Clone)]
pub enum VectorSource {
    /// Backed by an untiled GeoJSON document, tiled on demand
    Untiled(UntiledSource),
    /// Backed by an external pre-tiled binary store
    PreTiled(PreTiledSource),
}

impl VectorSource {
    /// Fetch the tile at `coord`, transformed for `tile_size` pixels.
    pub async fn get(&self, coord: TileCoord, tile_size: u32) -> Result<TileLayers, SourceError> {
        match self {
            VectorSource::Untiled(source) => Ok(source.get(coord, tile_size).await?),
            VectorSource::PreTiled(source) => source
                .get(coord, tile_size)
                .await
                .map_err(|e| SourceError::Store(e.to_string())),
        }
    }

    /// Short variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            VectorSource::Untiled(_) => "untiled",
            VectorSource::PreTiled(_) => "pretiled",
        }
    }

    /// The feature-id property name for highlight rules.
    pub fn feature_id_prop(&self) -> &str {
        match self {
            VectorSource::Untiled(source) => source.feature_id_prop(),
            VectorSource::PreTiled(source) => source.feature_id_prop(),
        }
    }
}
