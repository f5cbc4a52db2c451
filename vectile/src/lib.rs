//! Vectile - Vector-tile adapter and spatial query engine
//!
//! Takes arbitrary vector geographic data, a single large GeoJSON
//! document or an external pre-tiled binary source, and makes it
//! renderable and queryable: untiled data is partitioned into a quad-tree
//! of discrete tiles on demand, tile-local geometry is transformed into
//! the pixel space a rasterizing painter consumes, and point-radius
//! feature lookups work correctly across the antimeridian.
//!
//! # High-Level API
//!
//! Most hosts go through the provider layer:
//!
//! ```ignore
//! use vectile::provider::{ProviderInstance, ProviderInput, ProviderOptions};
//! use vectile::coord::TileCoord;
//!
//! let provider = ProviderInstance::create(ProviderOptions::new(
//!     ProviderInput::Url("https://example.com/data.geojson".to_string()),
//! ))?;
//!
//! let layers = provider.get_tile(TileCoord::new(0, 0, 0)).await?;
//! let nearby = provider.pick(151.2, -33.8, 12, 50.0).await?;
//! ```

pub mod coord;
pub mod document;
pub mod geom;
pub mod index;
pub mod logging;
pub mod pick;
pub mod provider;
pub mod source;

/// Version of the vectile library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
