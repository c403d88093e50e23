use std::path::Path;

use glam::{UVec2, Vec2};

use rdw_guard::gain::{ContextClassifier, PathContext};
use rdw_guard::types::{FREE, OCCUPIED, UNKNOWN};
use rdw_guard::{WalkableQuery, load_walkable_map};

#[test]
fn loads_trinary_map() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let yaml_path = manifest_dir.join("tests/fixtures/simple.yaml");

    let grid = load_walkable_map(&yaml_path).expect("grid should load");

    assert_eq!(grid.info().width, 2);
    assert_eq!(grid.info().height, 2);
    assert_eq!(grid.info().origin, Vec2::new(-1.0, -1.0));

    // Bottom image row is grid row 0.
    assert_eq!(grid.get(UVec2::new(0, 0)), Some(FREE));
    assert_eq!(grid.get(UVec2::new(1, 0)), Some(UNKNOWN));
    assert_eq!(grid.get(UVec2::new(0, 1)), Some(OCCUPIED));
    // Transparent pixel.
    assert_eq!(grid.get(UVec2::new(1, 1)), Some(UNKNOWN));

    assert!(grid.sample_walkable(Vec2::new(-0.75, -0.75)));
    assert!(!grid.sample_walkable(Vec2::new(-0.75, -0.25)));
    assert!(!grid.sample_walkable(Vec2::new(5.0, 5.0)));
}

#[test]
fn classifies_contexts_on_loaded_map() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let grid = load_walkable_map(manifest_dir.join("tests/fixtures/corridor.yaml"))
        .expect("grid should load");
    assert_eq!((grid.info().width, grid.info().height), (100, 50));

    let classifier = ContextClassifier::default();
    assert_eq!(
        classifier.classify(Vec2::new(2.5, 2.5), &grid),
        PathContext::OnStraightPath
    );
    assert_eq!(
        classifier.classify(Vec2::new(7.5, 2.5), &grid),
        PathContext::OnCurvedPath
    );
    assert_eq!(
        classifier.classify(Vec2::new(2.5, 1.0), &grid),
        PathContext::OffPath
    );
}

#[test]
fn missing_image_is_an_error() {
    let dir = std::env::temp_dir().join("rdw_guard_missing_image");
    std::fs::create_dir_all(&dir).unwrap();
    let yaml_path = dir.join("map.yaml");
    std::fs::write(&yaml_path, "image: nope.png\nresolution: 0.1\norigin: [0, 0]\n").unwrap();
    assert!(load_walkable_map(&yaml_path).is_err());
}
