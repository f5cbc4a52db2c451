//! Feature/document data model and document loading
//!
//! A [`Document`] is parsed once from GeoJSON and is immutable afterwards,
//! apart from each feature's lazily cached bounding box. Loading goes
//! through the [`DocumentLoader`] trait so tests can substitute a counting
//! mock for the HTTP client.

mod error;
mod feature;
mod loader;

pub use error::LoadError;
pub use feature::{Document, Feature, Tags};
pub use loader::{DocumentLoader, HttpDocumentLoader};

#[cfg(test)]
pub(crate) use loader::tests::MockDocumentLoader;
