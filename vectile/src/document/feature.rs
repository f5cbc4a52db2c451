//! Feature and document model.
//!
//! A [`Document`] is an ordered, immutable sequence of [`Feature`]s parsed
//! from a GeoJSON Feature Collection. The only mutation after load is the
//! per-feature bounding-box cache, computed lazily on first use.

use std::sync::{Arc, OnceLock};

use geo::{BoundingRect, Geometry, Rect};
use tracing::warn;

use super::error::LoadError;

/// Property bag attached to a feature ("tags").
pub type Tags = serde_json::Map<String, serde_json::Value>;

/// One discrete geographic object.
///
/// Geometry is in the document's native coordinate space (degrees for
/// untiled GeoJSON documents). The planar bounding box is computed once
/// on first request and cached.
#[derive(Debug, Clone)]
pub struct Feature {
    geometry: Geometry<f64>,
    tags: Arc<Tags>,
    bbox: OnceLock<Option<Rect<f64>>>,
}

impl Feature {
    /// Create a feature from a geometry and its property bag.
    pub fn new(geometry: Geometry<f64>, tags: Tags) -> Self {
        Self {
            geometry,
            tags: Arc::new(tags),
            bbox: OnceLock::new(),
        }
    }

    /// The feature's geometry in document coordinates.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// The feature's property bag.
    pub fn tags(&self) -> &Arc<Tags> {
        &self.tags
    }

    /// Planar bounding box in document coordinates, cached after the
    /// first call.
    ///
    /// `None` for geometry with no coordinates (degenerate; excluded from
    /// picking).
    pub fn bbox(&self) -> Option<Rect<f64>> {
        *self.bbox.get_or_init(|| self.geometry.bounding_rect())
    }

    /// Position of a point feature as (lon, lat), if this is one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match &self.geometry {
            Geometry::Point(p) => Some((p.x(), p.y())),
            _ => None,
        }
    }
}

/// An ordered sequence of features plus format metadata.
///
/// Immutable once loaded except for each feature's lazy bbox cache.
#[derive(Debug, Clone, Default)]
pub struct Document {
    features: Vec<Arc<Feature>>,
}

impl Document {
    /// Create a document from already-built features, preserving order.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features: features.into_iter().map(Arc::new).collect(),
        }
    }

    /// The document's features in load order.
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the document holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parse a GeoJSON document body.
    ///
    /// Accepts a Feature Collection, a single Feature, or a bare geometry
    /// (the latter two are wrapped into a one-feature document). Features
    /// without geometry are skipped with a warning rather than failing the
    /// whole document.
    pub fn from_geojson_str(body: &str) -> Result<Self, LoadError> {
        let geojson: geojson::GeoJson = body
            .parse()
            .map_err(|e: geojson::Error| LoadError::Parse(e.to_string()))?;
        Self::from_geojson(geojson)
    }

    /// Build a document from an already-parsed GeoJSON value.
    pub fn from_geojson(geojson: geojson::GeoJson) -> Result<Self, LoadError> {
        let collection = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc,
            geojson::GeoJson::Feature(feature) => geojson::FeatureCollection {
                bbox: None,
                features: vec![feature],
                foreign_members: None,
            },
            geojson::GeoJson::Geometry(geometry) => geojson::FeatureCollection {
                bbox: None,
                features: vec![geojson::Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: None,
                    properties: None,
                    foreign_members: None,
                }],
                foreign_members: None,
            },
        };
        Self::from_feature_collection(collection)
    }

    /// Build a document from a GeoJSON Feature Collection.
    pub fn from_feature_collection(
        collection: geojson::FeatureCollection,
    ) -> Result<Self, LoadError> {
        let mut features = Vec::with_capacity(collection.features.len());
        for (i, feature) in collection.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                warn!(index = i, "skipping feature without geometry");
                continue;
            };
            let geometry = Geometry::<f64>::try_from(geometry)
                .map_err(|e| LoadError::Parse(format!("feature {i}: {e}")))?;
            let tags = feature.properties.unwrap_or_default();
            features.push(Arc::new(Feature::new(geometry, tags)));
        }
        Ok(Self { features })
    }
}
