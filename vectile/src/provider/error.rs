//! Provider construction errors.
//!
//! Configuration problems are fatal: construction fails and is not
//! retried. Runtime load/tile failures travel through `SourceError`
//! instead and reach the renderer as absent tiles.

use thiserror::Error;

use crate::coord::CoordError;
use crate::source::StoreError;

/// Fatal errors at provider construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rectangle needs too many tiles at the minimum zoom; rendering
    /// would start with an excessive burst of simultaneous tile loads.
    #[error(
        "rectangle requires {tile_count} tiles at minimum zoom {min_zoom}; the limit is {limit}"
    )]
    TooManyTiles {
        tile_count: u32,
        min_zoom: u8,
        limit: u32,
    },

    /// A rule references a layer the active source cannot produce.
    #[error("rule references layer {layer:?}, but this source only produces {available:?}")]
    UnknownRuleLayer { layer: String, available: String },

    /// A pre-tiled URL was given without a store factory to open it.
    #[error("pre-tiled URL {url:?} requires a tile store factory")]
    MissingStoreFactory { url: String },

    /// The injected store factory failed to open the URL.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Building the default HTTP document loader failed.
    #[error("failed to build document loader: {0}")]
    Loader(String),

    /// Rectangle corners fell outside the tiling scheme.
    #[error(transparent)]
    Coord(#[from] CoordError),
}
