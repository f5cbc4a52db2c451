//! Untiled-document-backed vector source.
//!
//! Wraps a GeoJSON document (inline or fetched from a URL) behind the
//! tile-request contract. The document load and index build happen at most
//! once per source, collapsed across concurrent first requests by a
//! single-flight cell; clones share the cell, so a derived source never
//! re-fetches or re-indexes.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::coord::TileCoord;
use crate::document::{Document, DocumentLoader, LoadError};
use crate::geom::{transform, TransformedFeature};
use crate::index::{IndexOptions, TileIndex};

use super::types::TileLayers;

/// Where the document comes from.
#[derive(Clone)]
pub enum DocumentInput {
    /// URL to fetch through the source's loader
    Url(String),
    /// Already-loaded document
    Document(Arc<Document>),
}

impl fmt::Debug for DocumentInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentInput::Url(url) => f.debug_tuple("Url").field(url).finish(),
            DocumentInput::Document(doc) => f
                .debug_struct("Document")
                .field("features", &doc.len())
                .finish(),
        }
    }
}

/// Document plus its built tile index, the product of one load.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    /// The loaded document
    pub document: Arc<Document>,
    /// The tile index built from it
    pub index: Arc<TileIndex>,
}

/// Vector source over an untiled GeoJSON document.
///
/// Cloning is cheap and shares the already-built tile index.
#[derive(Clone)]
pub struct UntiledSource {
    input: DocumentInput,
    loader: Option<Arc<dyn DocumentLoader>>,
    layer_name: String,
    feature_id_prop: String,
    options: IndexOptions,
    state: Arc<OnceCell<Result<IndexedDocument, LoadError>>>,
}

impl UntiledSource {
    /// Layer name untiled documents are served under. GeoJSON carries no
    /// semantic layering, so every feature lands in this one layer.
    pub const DEFAULT_LAYER_NAME: &'static str = "layer";

    /// Property carrying the feature identifier for highlight rules.
    pub const DEFAULT_FEATURE_ID_PROP: &'static str = "_id_";

    /// Source fetching its document from a URL through `loader`.
    pub fn from_url(url: impl Into<String>, loader: Arc<dyn DocumentLoader>) -> Self {
        Self::with_input(DocumentInput::Url(url.into()), Some(loader))
    }

    /// Source over an already-loaded document.
    pub fn from_document(document: Arc<Document>) -> Self {
        Self::with_input(DocumentInput::Document(document), None)
    }

    fn with_input(input: DocumentInput, loader: Option<Arc<dyn DocumentLoader>>) -> Self {
        Self {
            input,
            loader,
            layer_name: Self::DEFAULT_LAYER_NAME.to_string(),
            feature_id_prop: Self::DEFAULT_FEATURE_ID_PROP.to_string(),
            options: IndexOptions::default(),
            state: Arc::new(OnceCell::new()),
        }
    }

    /// Override the layer name features are grouped under.
    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = layer_name.into();
        self
    }

    /// Override the feature-id property used by highlight rules.
    pub fn with_feature_id_prop(mut self, prop: impl Into<String>) -> Self {
        self.feature_id_prop = prop.into();
        self
    }

    /// Override tile index options.
    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }

    /// The layer name this source produces.
    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    /// The feature-id property name for this source.
    pub fn feature_id_prop(&self) -> &str {
        &self.feature_id_prop
    }

    /// The document input this source was built from.
    pub fn input(&self) -> &DocumentInput {
        &self.input
    }

    /// Load the document and build the tile index, at most once.
    ///
    /// Concurrent first calls share one in-flight build; a failure is
    /// cached and handed to every later caller. Retrying requires a new
    /// source.
    pub async fn indexed(&self) -> Result<IndexedDocument, LoadError> {
        self.state
            .get_or_init(|| async {
                let document = match &self.input {
                    DocumentInput::Document(doc) => Arc::clone(doc),
                    DocumentInput::Url(url) => {
                        let loader = self
                            .loader
                            .as_ref()
                            .ok_or_else(|| LoadError::NoLoader(url.clone()))?;
                        let body = loader.load(url).await?;
                        Arc::new(Document::from_geojson_str(&body)?)
                    }
                };
                let index = Arc::new(TileIndex::build(&document, self.options));
                info!(features = document.len(), "untiled source ready");
                Ok(IndexedDocument { document, index })
            })
            .await
            .clone()
    }

    /// The loaded document, awaiting the build if necessary.
    pub async fn document(&self) -> Result<Arc<Document>, LoadError> {
        Ok(self.indexed().await?.document)
    }

    /// Fetch a tile and transform its features into pixel space.
    ///
    /// An empty map means the tile has no features: a normal, retryable
    /// state for the renderer, distinct from a load failure.
    pub async fn get(&self, coord: TileCoord, tile_size: u32) -> Result<TileLayers, LoadError> {
        let indexed = self.indexed().await?;
        let mut layers = TileLayers::new();
        let Some(tile) = indexed.index.get_tile(coord) else {
            debug!(tile = %coord, "tile empty");
            return Ok(layers);
        };

        let extent = indexed.index.options().extent as f64;
        let mut features = Vec::with_capacity(tile.features.len());
        for feature in &tile.features {
            let transformed = transform(&feature.geometry, extent, tile_size as f64);
            if transformed.bbox.is_degenerate() {
                warn!(tile = %coord, "excluding feature with degenerate geometry");
                continue;
            }
            features.push(TransformedFeature {
                kind: feature.kind,
                geom: transformed.paths,
                tags: feature.tags.clone(),
                bbox: transformed.bbox,
                num_vertices: transformed.num_vertices,
            });
        }
        if !features.is_empty() {
            layers.insert(self.layer_name.clone(), features);
        }
        Ok(layers)
    }
}

impl fmt::Debug for UntiledSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntiledSource")
            .field("input", &self.input)
            .field("layer_name", &self.layer_name)
            .field("built", &self.state.initialized())
            .finish()
    }
}
