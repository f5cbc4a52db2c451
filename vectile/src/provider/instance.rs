//! Provider lifecycle: creation, derivation, and the query surface.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::coord::{Rectangle, TileCoord, TilingScheme, WebMercatorTilingScheme};
use crate::document::{DocumentLoader, HttpDocumentLoader};
use crate::pick;
use crate::source::{
    PickedFeature, PreTiledSource, SourceError, TileLayers, TileStoreFactory, UntiledSource,
    VectorSource,
};

use super::error::ConfigError;
use super::options::{CloneOverrides, ProviderInput, ProviderOptions};
use super::rules::{LabelRule, PaintRule, RuleFilter, Symbolizer};

/// Tile size in pixels handed to the painter.
const TILE_SIZE: u32 = 256;

/// Most tiles the rectangle may need at the minimum zoom level. More
/// than this at startup means an excessive burst of simultaneous loads.
const MAX_TILES_AT_MINIMUM_ZOOM: u32 = 4;

/// Stroke width of the derived highlight rule, in pixels.
const HIGHLIGHT_WIDTH: f32 = 4.0;

/// A query-ready provider: one vector source, one rule set, one tiling
/// scheme.
///
/// Instances are constructed by [`create`](Self::create) and derived by
/// [`clone_with`](Self::clone_with); both enforce the invariant that paint
/// rules only reference layers the active source can produce.
pub struct ProviderInstance {
    source: VectorSource,
    scheme: Arc<dyn TilingScheme>,
    minimum_zoom: u8,
    maximum_zoom: u8,
    rectangle: Rectangle,
    credit: Option<String>,
    paint_rules: Vec<PaintRule>,
    label_rules: Vec<LabelRule>,
    loader: Option<Arc<dyn DocumentLoader>>,
    store_factory: Option<Arc<dyn TileStoreFactory>>,
}

impl ProviderInstance {
    /// Build a provider from heterogeneous input.
    ///
    /// URL strings dispatch on extension: GeoJSON extensions produce the
    /// untiled variant, anything else is treated as a pre-tiled archive
    /// and opened through the injected store factory. Raw documents and
    /// ready-made sources are adopted without re-parsing.
    pub fn create(options: ProviderOptions) -> Result<Self, ConfigError> {
        let scheme: Arc<dyn TilingScheme> = options
            .scheme
            .unwrap_or_else(|| Arc::new(WebMercatorTilingScheme::new()));

        let rectangle = match options.rectangle {
            Some(r) => r
                .intersection(&scheme.rectangle())
                .unwrap_or_else(|| scheme.rectangle()),
            None => scheme.rectangle(),
        };

        Self::check_tile_count(&*scheme, &rectangle, options.minimum_zoom)?;

        let mut loader = options.loader;
        let source = match options.data {
            ProviderInput::Source(source) => source,
            ProviderInput::Document(document) => {
                VectorSource::Untiled(UntiledSource::from_document(document))
            }
            ProviderInput::Url(url) => {
                if is_geojson_url(&url) {
                    let document_loader = match loader.clone() {
                        Some(l) => l,
                        None => {
                            let built: Arc<dyn DocumentLoader> = Arc::new(
                                HttpDocumentLoader::new()
                                    .map_err(|e| ConfigError::Loader(e.to_string()))?,
                            );
                            loader = Some(Arc::clone(&built));
                            built
                        }
                    };
                    VectorSource::Untiled(UntiledSource::from_url(url, document_loader))
                } else {
                    let factory = options
                        .store_factory
                        .as_ref()
                        .ok_or_else(|| ConfigError::MissingStoreFactory { url: url.clone() })?;
                    let store = factory.open(&url)?;
                    VectorSource::PreTiled(PreTiledSource::new(store).with_url(url))
                }
            }
        };

        Self::check_rule_layers(&source, &options.paint_rules, &options.label_rules)?;

        info!(
            source = source.kind(),
            minimum_zoom = options.minimum_zoom,
            maximum_zoom = options.maximum_zoom,
            "created provider"
        );
        Ok(Self {
            source,
            scheme,
            minimum_zoom: options.minimum_zoom,
            maximum_zoom: options.maximum_zoom,
            rectangle,
            credit: options.credit,
            paint_rules: options.paint_rules,
            label_rules: options.label_rules,
            loader,
            store_factory: options.store_factory,
        })
    }

    /// Reject rectangles needing more than four tiles at the minimum zoom.
    fn check_tile_count(
        scheme: &dyn TilingScheme,
        rectangle: &Rectangle,
        minimum_zoom: u8,
    ) -> Result<(), ConfigError> {
        let (sw_lon, sw_lat) = rectangle.southwest();
        let (ne_lon, ne_lat) = rectangle.northeast();
        let sw = scheme.position_to_tile(sw_lon, sw_lat, minimum_zoom)?;
        let ne = scheme.position_to_tile(ne_lon, ne_lat, minimum_zoom)?;
        let tile_count = (ne.x.abs_diff(sw.x) + 1) * (ne.y.abs_diff(sw.y) + 1);
        if tile_count > MAX_TILES_AT_MINIMUM_ZOOM {
            return Err(ConfigError::TooManyTiles {
                tile_count,
                min_zoom: minimum_zoom,
                limit: MAX_TILES_AT_MINIMUM_ZOOM,
            });
        }
        Ok(())
    }

    /// Every rule must reference a layer the source can produce. Only the
    /// untiled variant knows its layer set up front; pre-tiled layer names
    /// live in the external archive.
    fn check_rule_layers(
        source: &VectorSource,
        paint_rules: &[PaintRule],
        label_rules: &[LabelRule],
    ) -> Result<(), ConfigError> {
        let VectorSource::Untiled(untiled) = source else {
            return Ok(());
        };
        let available = untiled.layer_name();
        let referenced = paint_rules
            .iter()
            .map(|r| r.data_layer.as_str())
            .chain(label_rules.iter().map(|r| r.data_layer.as_str()));
        for layer in referenced {
            if layer != available {
                return Err(ConfigError::UnknownRuleLayer {
                    layer: layer.to_string(),
                    available: available.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The active vector source.
    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    /// Minimum rendered zoom level.
    pub fn minimum_zoom(&self) -> u8 {
        self.minimum_zoom
    }

    /// Maximum rendered zoom level.
    pub fn maximum_zoom(&self) -> u8 {
        self.maximum_zoom
    }

    /// The provider's rectangle in degrees.
    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    /// Attribution text, if any.
    pub fn credit(&self) -> Option<&str> {
        self.credit.as_deref()
    }

    /// Paint rules for the external painter.
    pub fn paint_rules(&self) -> &[PaintRule] {
        &self.paint_rules
    }

    /// Label rules for the external label placer.
    pub fn label_rules(&self) -> &[LabelRule] {
        &self.label_rules
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> u32 {
        TILE_SIZE
    }

    /// Fetch the tile at `coord`, transformed for this provider's tile
    /// size.
    ///
    /// An empty map is a normal result (nothing to paint there), not an
    /// error; the renderer treats it as retryable state.
    pub async fn get_tile(&self, coord: TileCoord) -> Result<TileLayers, SourceError> {
        self.source.get(coord, TILE_SIZE).await
    }

    /// Features near a geographic point.
    ///
    /// The untiled variant runs the antimeridian-safe buffer query at
    /// `radius_m` meters; the pre-tiled variant delegates to the external
    /// store's own index at `zoom`, keeping only features from rendered
    /// layers with non-empty properties.
    pub async fn pick(
        &self,
        lon: f64,
        lat: f64,
        zoom: u8,
        radius_m: f64,
    ) -> Result<Vec<PickedFeature>, SourceError> {
        match &self.source {
            VectorSource::PreTiled(source) => {
                let rendered: HashSet<&str> = self
                    .paint_rules
                    .iter()
                    .map(|r| r.data_layer.as_str())
                    .chain(self.label_rules.iter().map(|r| r.data_layer.as_str()))
                    .collect();
                Ok(source
                    .query_features(lon, lat, zoom)
                    .into_iter()
                    .filter(|f| !f.tags.is_empty() && rendered.contains(f.layer_name.as_str()))
                    .collect())
            }
            VectorSource::Untiled(source) => {
                let document = source.document().await?;
                Ok(pick::pick(&document, lon, lat, radius_m)
                    .into_iter()
                    .map(|feature| PickedFeature {
                        layer_name: source.layer_name().to_string(),
                        tags: feature.tags().clone(),
                        position: feature.position(),
                    })
                    .collect())
            }
        }
    }

    /// Derive a new instance, replacing only the overridden fields.
    ///
    /// The source's computed state always transfers: an untiled clone
    /// shares the build cell (never re-fetching or re-indexing), a
    /// pre-tiled clone shares the store handle.
    pub fn clone_with(&self, overrides: CloneOverrides) -> Result<Self, ConfigError> {
        let data = match overrides.data {
            Some(data) => data,
            None => match &self.source {
                VectorSource::Untiled(untiled) => {
                    ProviderInput::Source(VectorSource::Untiled(untiled.clone()))
                }
                VectorSource::PreTiled(pretiled) => {
                    ProviderInput::Source(VectorSource::PreTiled(pretiled.clone()))
                }
            },
        };
        debug!(source = self.source.kind(), "deriving provider clone");
        Self::create(ProviderOptions {
            data,
            minimum_zoom: overrides.minimum_zoom.unwrap_or(self.minimum_zoom),
            maximum_zoom: overrides.maximum_zoom.unwrap_or(self.maximum_zoom),
            rectangle: Some(overrides.rectangle.unwrap_or(self.rectangle)),
            credit: overrides.credit.or_else(|| self.credit.clone()),
            paint_rules: overrides
                .paint_rules
                .unwrap_or_else(|| self.paint_rules.clone()),
            label_rules: overrides
                .label_rules
                .unwrap_or_else(|| self.label_rules.clone()),
            loader: self.loader.clone(),
            store_factory: self.store_factory.clone(),
            scheme: Some(Arc::clone(&self.scheme)),
        })
    }

    /// Derive an instance that highlights one picked feature: a single
    /// line paint rule filtered to the feature's identifier, no labels.
    ///
    /// Returns `None` when the feature carries no identifier under the
    /// source's id property.
    pub fn highlight(&self, picked: &PickedFeature, color: impl Into<String>) -> Option<Self> {
        let id_prop = self.source.feature_id_prop().to_string();
        let feature_id = picked.tags.get(&id_prop)?.clone();
        let layer_name = match &self.source {
            VectorSource::Untiled(untiled) => untiled.layer_name().to_string(),
            VectorSource::PreTiled(_) => picked.layer_name.clone(),
        };

        let filter: RuleFilter =
            Arc::new(move |_zoom, tags| tags.get(&id_prop) == Some(&feature_id));
        let rule = PaintRule::new(
            layer_name,
            Symbolizer::Line {
                color: color.into(),
                width: HIGHLIGHT_WIDTH,
            },
        )
        .with_filter(filter);

        match self.clone_with(
            CloneOverrides::none()
                .with_paint_rules(vec![rule])
                .with_label_rules(Vec::new()),
        ) {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!(error = %e, "highlight derivation failed");
                None
            }
        }
    }
}

impl fmt::Debug for ProviderInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderInstance")
            .field("source", &self.source)
            .field("minimum_zoom", &self.minimum_zoom)
            .field("maximum_zoom", &self.maximum_zoom)
            .field("rectangle", &self.rectangle)
            .field("paint_rules", &self.paint_rules.len())
            .field("label_rules", &self.label_rules.len())
            .finish()
    }
}

/// Whether a URL points at a GeoJSON document rather than a pre-tiled
/// archive.
fn is_geojson_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.to_ascii_lowercase();
    path.ends_with(".json") || path.ends_with(".geojson")
}
