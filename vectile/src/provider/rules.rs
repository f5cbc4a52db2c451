//! Paint and label rule model.
//!
//! Rules are descriptions consumed by the external painter and label
//! placer; this crate only carries them, validates their layer references,
//! and derives the single-rule highlight set.

use std::fmt;
use std::sync::Arc;

use crate::document::Tags;

/// Predicate deciding whether a rule applies to a feature at a zoom level.
pub type RuleFilter = Arc<dyn Fn(u8, &Tags) -> bool + Send + Sync>;

/// How a matched feature is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbolizer {
    /// Stroke lines/outlines
    Line {
        /// CSS-style color
        color: String,
        /// Stroke width in pixels
        width: f32,
    },
    /// Fill polygon interiors
    Fill { color: String },
    /// Draw a circle at point features
    Circle { color: String, radius: f32 },
}

/// One paint rule: which layer it draws, how, and when.
#[derive(Clone)]
pub struct PaintRule {
    /// Layer name this rule draws from
    pub data_layer: String,
    /// How matched features are drawn
    pub symbolizer: Symbolizer,
    /// Minimum zoom (inclusive)
    pub min_zoom: u8,
    /// Maximum zoom (inclusive); `None` is unbounded
    pub max_zoom: Option<u8>,
    /// Optional per-feature predicate
    pub filter: Option<RuleFilter>,
}

impl PaintRule {
    /// Rule drawing every feature of a layer at all zooms.
    pub fn new(data_layer: impl Into<String>, symbolizer: Symbolizer) -> Self {
        Self {
            data_layer: data_layer.into(),
            symbolizer,
            min_zoom: 0,
            max_zoom: None,
            filter: None,
        }
    }

    /// Restrict the rule to a zoom range.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: Option<u8>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Attach a per-feature predicate.
    pub fn with_filter(mut self, filter: RuleFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether the rule applies to a feature at a zoom level.
    pub fn matches(&self, zoom: u8, tags: &Tags) -> bool {
        if zoom < self.min_zoom {
            return false;
        }
        if let Some(max) = self.max_zoom {
            if zoom > max {
                return false;
            }
        }
        match &self.filter {
            Some(filter) => filter(zoom, tags),
            None => true,
        }
    }
}

impl fmt::Debug for PaintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintRule")
            .field("data_layer", &self.data_layer)
            .field("symbolizer", &self.symbolizer)
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// One label rule: which layer and property to label, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRule {
    /// Layer name this rule labels
    pub data_layer: String,
    /// Property supplying the label text
    pub label_property: String,
    /// Minimum zoom (inclusive)
    pub min_zoom: u8,
    /// Maximum zoom (inclusive); `None` is unbounded
    pub max_zoom: Option<u8>,
}

impl LabelRule {
    /// Rule labeling a layer from a property at all zooms.
    pub fn new(data_layer: impl Into<String>, label_property: impl Into<String>) -> Self {
        Self {
            data_layer: data_layer.into(),
            label_property: label_property.into(),
            min_zoom: 0,
            max_zoom: None,
        }
    }
}
