//! Shared types for vector sources.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::document::{LoadError, Tags};
use crate::geom::TransformedFeature;

/// Output of a tile request: transformed features grouped by layer name.
pub type TileLayers = HashMap<String, Vec<TransformedFeature>>;

/// A feature returned from a pick query, with the layer it came from and,
/// for point features, its geographic position.
#[derive(Debug, Clone)]
pub struct PickedFeature {
    /// Name of the layer the feature belongs to
    pub layer_name: String,
    /// The feature's property bag
    pub tags: Arc<Tags>,
    /// (lon, lat) for point features, `None` otherwise
    pub position: Option<(f64, f64)>,
}

/// Errors surfaced by vector sources.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Loading or indexing the untiled document failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The external pre-tiled store failed
    #[error("tile store error: {0}")]
    Store(String),
}
