//! End-to-end tests through the provider layer: document in, transformed
//! tiles and antimeridian-safe picks out.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vectile::coord::TileCoord;
use vectile::document::{DocumentLoader, LoadError};
use vectile::geom::GeomKind;
use vectile::provider::{CloneOverrides, ProviderInput, ProviderInstance, ProviderOptions};
use vectile::source::UntiledSource;

/// One polygon crossing the antimeridian (0..360 longitude convention)
/// and one ordinary point at (10, 10).
const TWO_FEATURES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[179,-1],[181,-1],[181,1],[179,1],[179,-1]]]
            },
            "properties": { "_id_": "seam", "name": "dateline" }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [10.0, 10.0] },
            "properties": { "_id_": "marker", "name": "inland" }
        }
    ]
}"#;

/// Loader serving a fixed body and counting invocations.
struct CountingLoader {
    body: String,
    loads: AtomicUsize,
}

impl CountingLoader {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            loads: AtomicUsize::new(0),
        }
    }

    fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DocumentLoader for CountingLoader {
    fn load(
        &self,
        _url: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + '_>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let body = self.body.clone();
        Box::pin(async move { Ok(body) })
    }
}

fn provider_over(loader: Arc<CountingLoader>) -> ProviderInstance {
    ProviderInstance::create(
        ProviderOptions::new(ProviderInput::Url(
            "https://example.com/data.geojson".to_string(),
        ))
        .with_loader(loader),
    )
    .expect("provider construction succeeds")
}

#[tokio::test]
async fn test_root_tile_contains_both_features_transformed() {
    let provider = provider_over(Arc::new(CountingLoader::new(TWO_FEATURES)));
    let layers = provider.get_tile(TileCoord::new(0, 0, 0)).await.unwrap();

    assert_eq!(layers.len(), 1, "untiled documents produce a single layer");
    let features = &layers[UntiledSource::DEFAULT_LAYER_NAME];
    assert_eq!(features.len(), 2);

    let polygon = features
        .iter()
        .find(|f| f.kind == GeomKind::Polygon)
        .expect("seam polygon present");
    assert_eq!(polygon.num_vertices, 5, "ring size preserved");
    assert!(!polygon.bbox.is_degenerate());
    assert!(polygon.bbox.min_x <= polygon.bbox.max_x);

    let point = features
        .iter()
        .find(|f| f.kind == GeomKind::Point)
        .expect("marker present");
    assert_eq!(point.num_vertices, 1);

    // Pixel space at a 256px tile: the marker sits east of center, north
    // of the equator row.
    let c = point.geom[0][0];
    assert!(c.x > 128.0 && c.x < 256.0);
    assert!(c.y > 0.0 && c.y < 128.0);
}

#[tokio::test]
async fn test_pick_finds_only_the_marker_inland() {
    let provider = provider_over(Arc::new(CountingLoader::new(TWO_FEATURES)));
    let picked = provider.pick(10.0, 10.0, 5, 50.0).await.unwrap();
    assert_eq!(picked.len(), 1);
    assert_eq!(
        picked[0].tags.get("_id_"),
        Some(&serde_json::json!("marker"))
    );
    assert_eq!(picked[0].position, Some((10.0, 10.0)));
}

#[tokio::test]
async fn test_pick_finds_seam_polygon_from_both_sides() {
    let provider = provider_over(Arc::new(CountingLoader::new(TWO_FEATURES)));

    let west = provider.pick(179.9, 0.0, 5, 50_000.0).await.unwrap();
    assert_eq!(west.len(), 1);
    assert_eq!(west[0].tags.get("_id_"), Some(&serde_json::json!("seam")));

    let east = provider.pick(-179.9, 0.0, 5, 50_000.0).await.unwrap();
    assert_eq!(east.len(), 1);
    assert_eq!(east[0].tags.get("_id_"), Some(&serde_json::json!("seam")));
}

#[tokio::test]
async fn test_document_loads_once_across_tiles_and_picks() {
    let loader = Arc::new(CountingLoader::new(TWO_FEATURES));
    let provider = provider_over(loader.clone());

    let _ = provider.get_tile(TileCoord::new(0, 0, 0)).await.unwrap();
    let _ = provider.get_tile(TileCoord::new(1, 0, 1)).await.unwrap();
    let _ = provider.pick(10.0, 10.0, 5, 50.0).await.unwrap();

    assert_eq!(loader.load_count(), 1);
}

#[tokio::test]
async fn test_concurrent_first_requests_share_one_load() {
    let loader = Arc::new(CountingLoader::new(TWO_FEATURES));
    let provider = Arc::new(provider_over(loader.clone()));

    let mut handles = Vec::new();
    for z in 0..6u8 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            provider.get_tile(TileCoord::new(0, 0, z)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(loader.load_count(), 1, "race to build collapses to one");
}

#[tokio::test]
async fn test_highlight_clone_reuses_index_and_draws_one_feature() {
    let loader = Arc::new(CountingLoader::new(TWO_FEATURES));
    let provider = provider_over(loader.clone());

    let picked = provider.pick(10.0, 10.0, 5, 50.0).await.unwrap();
    let highlight = provider
        .highlight(&picked[0], "#ffffff")
        .expect("marker has an id");

    // Same tiles, no second fetch.
    let layers = highlight.get_tile(TileCoord::new(0, 0, 0)).await.unwrap();
    assert_eq!(loader.load_count(), 1);

    // The single highlight rule matches only the picked feature.
    assert_eq!(highlight.paint_rules().len(), 1);
    assert!(highlight.label_rules().is_empty());
    let rule = &highlight.paint_rules()[0];
    let features = &layers[UntiledSource::DEFAULT_LAYER_NAME];
    let matching: Vec<_> = features
        .iter()
        .filter(|f| rule.matches(0, &f.tags))
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(
        matching[0].tags.get("_id_"),
        Some(&serde_json::json!("marker"))
    );
}

#[tokio::test]
async fn test_clone_with_overrides_keeps_source_state() {
    let loader = Arc::new(CountingLoader::new(TWO_FEATURES));
    let provider = provider_over(loader.clone());
    let _ = provider.get_tile(TileCoord::new(0, 0, 0)).await.unwrap();

    let clone = provider
        .clone_with(CloneOverrides::none().with_credit("© elsewhere"))
        .unwrap();
    let _ = clone.get_tile(TileCoord::new(0, 0, 0)).await.unwrap();

    assert_eq!(loader.load_count(), 1);
    assert_eq!(clone.credit(), Some("© elsewhere"));
    assert_eq!(clone.minimum_zoom(), provider.minimum_zoom());
}

#[tokio::test]
async fn test_load_failure_surfaces_not_panics() {
    struct FailingLoader;

    impl DocumentLoader for FailingLoader {
        fn load(
            &self,
            _url: &str,
        ) -> Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + '_>> {
            Box::pin(async { Err(LoadError::Fetch("503".to_string())) })
        }
    }

    let provider = ProviderInstance::create(
        ProviderOptions::new(ProviderInput::Url(
            "https://example.com/data.geojson".to_string(),
        ))
        .with_loader(Arc::new(FailingLoader)),
    )
    .unwrap();

    let first = provider.get_tile(TileCoord::new(0, 0, 0)).await;
    assert!(first.is_err(), "load failure is an error, not an empty tile");
    let second = provider.get_tile(TileCoord::new(0, 0, 0)).await;
    assert!(second.is_err(), "failure is remembered, not retried");
}
