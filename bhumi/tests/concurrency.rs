//! Concurrent map updates and queries.
//!
//! Run with: cargo test --test concurrency

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use bhumi::grid::layers::{TRAVERSABILITY_FOOTPRINT, TRAVERSABILITY_ROT, TRAVERSABILITY_X};
use bhumi::{
    FootprintPath, GridCoord, TraversabilityConfig, TraversabilityError, TraversabilityMap,
    WorldPoint,
};
use common::*;

const UPDATES: usize = 50;

#[test]
fn test_queries_during_updates() {
    init_logging();
    let map = Arc::new(TraversabilityMap::new(TraversabilityConfig::default()));
    map.set_elevation_map(flat_terrain(0.6), 0.0).unwrap();
    map.compute_traversability().unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let path = FootprintPath::circular(straight_path(WorldPoint::new(1.0, 2.0), 4, 0.5), 0.2);

    let queries: Vec<_> = (0..3)
        .map(|_| {
            let map = Arc::clone(&map);
            let done = Arc::clone(&done);
            let path = path.clone();
            thread::spawn(move || {
                let mut checked = 0usize;
                while !done.load(Ordering::Acquire) {
                    let result = map.check_footprint_path(&path).unwrap();
                    // Every published map is uniformly 0.6 or 0.9
                    assert!(result.is_safe);
                    let t = result.traversability;
                    assert!(
                        (t - 0.6).abs() < 1e-4 || (t - 0.9).abs() < 1e-4,
                        "mixed score {t}"
                    );
                    checked += 1;
                }
                checked
            })
        })
        .collect();

    for i in 0..UPDATES {
        let value = if i % 2 == 0 { 0.9 } else { 0.6 };
        map.set_elevation_map(flat_terrain(value), 0.0).unwrap();
        map.compute_traversability().unwrap();
    }
    done.store(true, Ordering::Release);

    for handle in queries {
        let checked = handle.join().expect("query thread panicked");
        assert!(checked > 0);
    }
    assert!(map.is_initialized());
}

#[test]
fn test_footprint_layers_during_queries() {
    init_logging();
    let mut config = TraversabilityConfig::default();
    config.footprint.polygon = box_footprint(0.4, 0.3);
    let map = Arc::new(TraversabilityMap::new(config));
    map.set_elevation_map(flat_terrain(0.6), 0.0).unwrap();
    map.compute_traversability().unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let queries = {
        let map = Arc::clone(&map);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut checked = 0usize;
            while !done.load(Ordering::Acquire) {
                let x = 0.55 + (checked % 40) as f32 * 0.1;
                assert!(map.is_traversable_disc(WorldPoint::new(x, 2.05), 0.3, 0.0, false).traversable);
                checked += 1;
            }
            checked
        })
    };

    let computed = map.compute_footprint_layers(0.5);
    done.store(true, Ordering::Release);
    assert!(queries.join().expect("query thread panicked") > 0);
    computed.unwrap();

    // Full-map layers and the query caches both landed
    let current = map.traversability_map();
    for layer in [TRAVERSABILITY_X, TRAVERSABILITY_ROT] {
        let values = current.layer(layer).expect("footprint layer missing");
        assert!(values.iter().all(|v| v.is_finite()), "{layer} incomplete");
    }
    assert!(current.is_valid(TRAVERSABILITY_FOOTPRINT, GridCoord::new(5, 20)));
}

#[test]
fn test_footprint_layer_during_updates() {
    let map = Arc::new(TraversabilityMap::new(TraversabilityConfig::default()));
    map.set_elevation_map(flat_terrain(0.6), 0.0).unwrap();
    map.compute_traversability().unwrap();

    let worker = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for _ in 0..5 {
                // A new map published mid-pass rejects the stale result
                match map.compute_disc_footprint_layer(0.2, 0.1) {
                    Ok(()) | Err(TraversabilityError::MapReplaced) => {}
                    Err(e) => panic!("footprint layer failed: {e}"),
                }
            }
        })
    };
    for _ in 0..10 {
        map.set_elevation_map(flat_terrain(0.6), 0.0).unwrap();
        map.compute_traversability().unwrap();
    }
    worker.join().expect("footprint thread panicked");

    map.compute_disc_footprint_layer(0.2, 0.1).unwrap();
    let current = map.traversability_map();
    let values = current.layer(TRAVERSABILITY_FOOTPRINT).unwrap();
    assert!(values.iter().all(|v| v.is_finite()));

    let outcome = map.is_traversable_disc(WorldPoint::new(2.05, 2.05), 0.3, 0.0, false);
    assert!(outcome.traversable);
    assert!((outcome.traversability - 0.6).abs() < 1e-4);
}
