use geo_contour_polygons::{contour_into, AffineTransform, ContourOptions, GeoJsonSink, SampleGrid};
use geojson::{GeoJson, Value};

/// 5x5 grid: a ring of 9s around a low centre
fn annulus() -> SampleGrid {
    SampleGrid::from_rows(&[
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 9.0, 9.0, 9.0, 0.0],
        vec![0.0, 9.0, 0.0, 9.0, 0.0],
        vec![0.0, 9.0, 9.0, 9.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
    ])
    .unwrap()
}

fn run(sink: &mut GeoJsonSink, levels: &[f64], transform: &AffineTransform) {
    contour_into(&annulus(), transform, levels, &ContourOptions::default(), sink).unwrap();
}

#[test]
fn test_feature_collection_shape() {
    let mut sink = GeoJsonSink::new();
    run(&mut sink, &[5.0, 3.0], &AffineTransform::identity());
    let collection = sink.into_feature_collection();

    assert_eq!(collection.features.len(), 2);
    let levels: Vec<f64> = collection
        .features
        .iter()
        .map(|f| f.property("level").and_then(|v| v.as_f64()).unwrap())
        .collect();
    assert_eq!(levels, vec![5.0, 3.0]);

    for feature in &collection.features {
        match &feature.geometry.as_ref().unwrap().value {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 1);
                // Exterior plus the hole around the low centre
                assert_eq!(polygons[0].len(), 2);
                for ring in &polygons[0] {
                    assert!(ring.len() >= 4);
                    assert_eq!(ring.first(), ring.last());
                }
            }
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_levels_handling() {
    let mut sink = GeoJsonSink::new();
    run(&mut sink, &[5.0, 50.0], &AffineTransform::identity());
    assert_eq!(sink.features().len(), 1);

    let mut sink = GeoJsonSink::new().include_empty_levels(true);
    run(&mut sink, &[5.0, 50.0], &AffineTransform::identity());
    assert_eq!(sink.features().len(), 2);
    match &sink.features()[1].geometry.as_ref().unwrap().value {
        Value::MultiPolygon(polygons) => assert!(polygons.is_empty()),
        other => panic!("expected MultiPolygon, got {other:?}"),
    }
}

#[test]
fn test_serializes_to_valid_geojson() {
    let transform = AffineTransform::new(-97.5, 0.1, 0.0, 35.2, 0.0, -0.1).unwrap();
    let mut sink = GeoJsonSink::new().with_precision(5);
    run(&mut sink, &[4.5], &transform);

    let json = serde_json::to_string(&sink.into_feature_collection()).unwrap();
    let parsed: GeoJson = json.parse().unwrap();
    match parsed {
        GeoJson::FeatureCollection(fc) => {
            assert_eq!(fc.features.len(), 1);
            let value = &fc.features[0].geometry.as_ref().unwrap().value;
            let Value::MultiPolygon(polygons) = value else {
                panic!("expected MultiPolygon");
            };
            for position in &polygons[0][0] {
                assert!(position[0] > -97.5 && position[0] < -97.0);
                assert!(position[1] > 34.7 && position[1] < 35.2);
                // Rounded to 5 decimals
                assert_eq!((position[0] * 1e5).round() / 1e5, position[0]);
            }
        }
        other => panic!("expected FeatureCollection, got {other:?}"),
    }
}
