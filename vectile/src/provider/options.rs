//! Provider construction options and clone overrides.

use std::fmt;
use std::sync::Arc;

use crate::coord::{Rectangle, TilingScheme};
use crate::document::{Document, DocumentLoader};
use crate::source::{TileStoreFactory, VectorSource};

use super::rules::{LabelRule, PaintRule};

/// Heterogeneous provider input, dispatched on at creation.
#[derive(Clone)]
pub enum ProviderInput {
    /// URL of a GeoJSON document or a pre-tiled archive; the extension
    /// selects the variant
    Url(String),
    /// Raw in-memory document
    Document(Arc<Document>),
    /// Already-constructed source, adopted as-is
    Source(VectorSource),
}

impl fmt::Debug for ProviderInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderInput::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ProviderInput::Document(doc) => f
                .debug_struct("Document")
                .field("features", &doc.len())
                .finish(),
            ProviderInput::Source(source) => {
                f.debug_tuple("Source").field(&source.kind()).finish()
            }
        }
    }
}

/// Options for [`ProviderInstance::create`](super::ProviderInstance::create).
///
/// Only `data` is required; everything else has the defaults the original
/// rendering stack assumes (zoom 0–24, the scheme's full rectangle,
/// 256-pixel tiles).
#[derive(Clone)]
pub struct ProviderOptions {
    pub data: ProviderInput,
    pub minimum_zoom: u8,
    pub maximum_zoom: u8,
    pub rectangle: Option<Rectangle>,
    pub credit: Option<String>,
    pub paint_rules: Vec<PaintRule>,
    pub label_rules: Vec<LabelRule>,
    /// Loader for GeoJSON URLs; a default HTTP loader is built when absent
    pub loader: Option<Arc<dyn DocumentLoader>>,
    /// Factory for opening pre-tiled URLs; required for that input shape
    pub store_factory: Option<Arc<dyn TileStoreFactory>>,
    /// Tiling scheme; Web Mercator when absent
    pub scheme: Option<Arc<dyn TilingScheme>>,
}

impl ProviderOptions {
    /// Options with defaults around the given input.
    pub fn new(data: ProviderInput) -> Self {
        Self {
            data,
            minimum_zoom: 0,
            maximum_zoom: 24,
            rectangle: None,
            credit: None,
            paint_rules: Vec::new(),
            label_rules: Vec::new(),
            loader: None,
            store_factory: None,
            scheme: None,
        }
    }

    /// Set the zoom bounds.
    pub fn with_zoom_range(mut self, minimum_zoom: u8, maximum_zoom: u8) -> Self {
        self.minimum_zoom = minimum_zoom;
        self.maximum_zoom = maximum_zoom;
        self
    }

    /// Restrict the provider to a rectangle.
    pub fn with_rectangle(mut self, rectangle: Rectangle) -> Self {
        self.rectangle = Some(rectangle);
        self
    }

    /// Attribution text.
    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = Some(credit.into());
        self
    }

    /// Paint rules for the external painter.
    pub fn with_paint_rules(mut self, rules: Vec<PaintRule>) -> Self {
        self.paint_rules = rules;
        self
    }

    /// Label rules for the external label placer.
    pub fn with_label_rules(mut self, rules: Vec<LabelRule>) -> Self {
        self.label_rules = rules;
        self
    }

    /// Inject a document loader.
    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Inject a pre-tiled store factory.
    pub fn with_store_factory(mut self, factory: Arc<dyn TileStoreFactory>) -> Self {
        self.store_factory = Some(factory);
        self
    }

    /// Substitute the tiling scheme.
    pub fn with_scheme(mut self, scheme: Arc<dyn TilingScheme>) -> Self {
        self.scheme = Some(scheme);
        self
    }
}

/// Field overrides for [`ProviderInstance::clone_with`](super::ProviderInstance::clone_with).
///
/// Unset fields copy from the source instance; the source's already-built
/// tile index or store handle always transfers.
#[derive(Clone, Default)]
pub struct CloneOverrides {
    pub data: Option<ProviderInput>,
    pub minimum_zoom: Option<u8>,
    pub maximum_zoom: Option<u8>,
    pub rectangle: Option<Rectangle>,
    pub credit: Option<String>,
    pub paint_rules: Option<Vec<PaintRule>>,
    pub label_rules: Option<Vec<LabelRule>>,
}

impl CloneOverrides {
    /// No overrides: a faithful clone.
    pub fn none() -> Self {
        Self::default()
    }

    /// Replace the data input.
    pub fn with_data(mut self, data: ProviderInput) -> Self {
        self.data = Some(data);
        self
    }

    /// Replace the zoom bounds.
    pub fn with_zoom_range(mut self, minimum_zoom: u8, maximum_zoom: u8) -> Self {
        self.minimum_zoom = Some(minimum_zoom);
        self.maximum_zoom = Some(maximum_zoom);
        self
    }

    /// Replace the rectangle.
    pub fn with_rectangle(mut self, rectangle: Rectangle) -> Self {
        self.rectangle = Some(rectangle);
        self
    }

    /// Replace the credit.
    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = Some(credit.into());
        self
    }

    /// Replace the paint rules.
    pub fn with_paint_rules(mut self, rules: Vec<PaintRule>) -> Self {
        self.paint_rules = Some(rules);
        self
    }

    /// Replace the label rules.
    pub fn with_label_rules(mut self, rules: Vec<LabelRule>) -> Self {
        self.label_rules = Some(rules);
        self
    }
}
