//! Provider lifecycle and derivation
//!
//! Constructs a query-ready [`ProviderInstance`] from heterogeneous input
//! (URL string, raw document, or already-built source) and derives cheap
//! clones that reuse already-computed tile indices, including the
//! highlight derivation used to emphasize one picked feature.

mod error;
mod instance;
mod options;
mod rules;

pub use error::ConfigError;
pub use instance::ProviderInstance;
pub use options::{CloneOverrides, ProviderInput, ProviderOptions};
pub use rules::{LabelRule, PaintRule, RuleFilter, Symbolizer};
