use std::sync::Arc;

use fielddata::{FieldDataCache, FieldDataOptions, GeoPoint, GeoPointFieldData};
use fielddata_index::{MemorySegment, SegmentReader};
use fielddata_testkit::data_gen::{GeoSegmentShape, generate_geo_segment};

#[test]
fn test_geo_points_are_loaded_once_per_segment() {
    let cache = FieldDataCache::<GeoPointFieldData>::new();
    let options = FieldDataOptions::default();
    let generated = generate_geo_segment(&GeoSegmentShape::multi_valued(64, 3, 11));

    let first = cache
        .geo_points(&generated.segment, &generated.field, &options)
        .unwrap();
    let second = cache
        .geo_points(&generated.segment, &generated.field, &options)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    let other = generate_geo_segment(&GeoSegmentShape::single_valued(8, 12));
    let third = cache.geo_points(&other.segment, &other.field, &options).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_reload_after_invalidation() {
    let cache = FieldDataCache::<GeoPointFieldData>::new();
    let options = FieldDataOptions::default();
    let mut builder = MemorySegment::builder();
    builder.add_document([("location", "1.5,2.5")]);
    let segment = builder.build();

    let first = cache.geo_points(&segment, "location", &options).unwrap();
    assert_eq!(cache.invalidate_segment(segment.segment_id()), 1);
    assert!(!cache.contains(segment.segment_id(), "location"));

    let second = cache.geo_points(&segment, "location", &options).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.value(0), Some(GeoPoint::new(1.5, 2.5)));
}

#[test]
fn test_failed_loads_are_retried() {
    let cache = FieldDataCache::<GeoPointFieldData>::new();
    let mut builder = MemorySegment::builder();
    builder.add_document([("location", "bad")]);
    let segment = builder.build();

    for _ in 0..2 {
        let err = cache
            .geo_points(&segment, "location", &FieldDataOptions::default())
            .unwrap_err();
        assert!(err.is_malformed_term());
    }
    assert!(!cache.contains(segment.segment_id(), "location"));
    assert!(cache.is_empty());
    assert_eq!(cache.invalidate_segment(segment.segment_id()), 0);
}

#[test]
fn test_shared_across_threads() {
    let cache = FieldDataCache::<GeoPointFieldData>::new();
    let options = FieldDataOptions::default();
    let generated = generate_geo_segment(&GeoSegmentShape::multi_valued(500, 2, 3));

    let loaded: Vec<Arc<GeoPointFieldData>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    cache
                        .geo_points(&generated.segment, &generated.field, &options)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(loaded.iter().all(|data| Arc::ptr_eq(data, &loaded[0])));
}
