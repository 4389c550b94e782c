use std::{fs, path::Path};

use serde_json::{Value, json};
use sieve::{GeoJsonSource, GeoJsonTarget, SieveConfig, SieveError, Source, run_sieve};

fn write_collection(path: &Path, features: Value) {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    fs::write(path, collection.to_string()).expect("Should write fixture");
}

fn read_collection(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Should read output");
    serde_json::from_str(&content).expect("Should be valid JSON")
}

fn polygon(rings: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": rings },
        "properties": properties,
    })
}

fn square(min: f64, max: f64) -> Value {
    json!([[min, min], [min, max], [max, max], [max, min], [min, min]])
}

#[tokio::test]
async fn test_sieve_geojson_directory() {
    let input = tempfile::tempdir().expect("Should create input dir");
    let output = tempfile::tempdir().expect("Should create output dir");

    write_collection(
        &input.path().join("parcels.geojson"),
        json!([
            polygon(json!([square(0.0, 10.0), square(5.0, 6.0)]), json!({ "id": 1, "name": "big" })),
            polygon(json!([square(0.0, 2.0)]), json!({ "id": 2 })),
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [3.0, 4.0]] },
                "properties": { "name": "road", "id": 3 },
            },
        ]),
    );
    write_collection(
        &input.path().join("empty.json"),
        json!([]),
    );
    fs::write(input.path().join("notes.txt"), "not a dataset").expect("Should write notes");

    let config = SieveConfig {
        resolution: 3.0,
        page_size: 2,
        ..Default::default()
    };
    let source = GeoJsonSource::open(input.path()).expect("Should open source");
    let tables = source.tables().expect("Should list tables");
    assert_eq!(
        tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["empty", "parcels"]
    );
    assert_eq!(tables[1].columns, vec!["id".to_string(), "name".to_string()]);

    let target = GeoJsonTarget::new(output.path(), config.page_size);
    let report = run_sieve(source, target, &config).await.expect("Should sieve dataset");
    assert_eq!(report.total_features(), 3);
    assert_eq!(report.tables[1].writer.pages, 2);

    let empty = read_collection(&output.path().join("empty.geojson"));
    assert_eq!(empty["features"], json!([]));

    let parcels = read_collection(&output.path().join("parcels.geojson"));
    let features = parcels["features"].as_array().expect("Should have features");
    assert_eq!(features.len(), 3);

    let by_id = |id: i64| {
        features
            .iter()
            .find(|f| f["properties"]["id"] == json!(id))
            .expect("Should find feature")
    };

    assert_eq!(by_id(1)["geometry"]["coordinates"], json!([square(0.0, 10.0)]));
    assert_eq!(by_id(1)["properties"]["name"], json!("big"));
    assert_eq!(by_id(2)["geometry"]["type"], json!("Polygon"));
    let centroid = &by_id(2)["geometry"]["coordinates"][0][0];
    for ordinate in [&centroid[0], &centroid[1]] {
        let value = ordinate.as_f64().expect("Should be a number");
        assert!((value - 1.0).abs() < 1e-9, "centroid ordinate {}", value);
    }
    assert_eq!(by_id(2)["properties"]["name"], Value::Null);
    assert_eq!(by_id(3)["geometry"]["type"], json!("LineString"));
}

#[tokio::test]
async fn test_sieve_single_file() {
    let input = tempfile::tempdir().expect("Should create input dir");
    let output = tempfile::tempdir().expect("Should create output dir");
    let file = input.path().join("lakes.geojson");

    write_collection(
        &file,
        json!([{
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[square(0.0, 10.0)], [square(15.0, 20.0)]],
            },
            "properties": { "lake": "twin" },
        }]),
    );

    let config = SieveConfig {
        resolution: 9.0,
        replace_with_centroid: false,
        ..Default::default()
    };
    let source = GeoJsonSource::open(&file).expect("Should open file");
    let target = GeoJsonTarget::new(output.path(), config.page_size);
    let report = run_sieve(source, target, &config).await.expect("Should sieve file");
    assert_eq!(report.tables[0].processor.dropped, 1);

    let lakes = read_collection(&output.path().join("lakes.geojson"));
    assert_eq!(
        lakes["features"][0]["geometry"]["coordinates"],
        json!([[square(0.0, 10.0)]])
    );
    assert_eq!(lakes["features"][0]["properties"]["lake"], json!("twin"));
}

#[tokio::test]
async fn test_invalid_source_reports_error() {
    let input = tempfile::tempdir().expect("Should create input dir");
    let output = tempfile::tempdir().expect("Should create output dir");
    fs::write(input.path().join("broken.geojson"), "{ nope").expect("Should write fixture");

    let source = GeoJsonSource::open(input.path()).expect("Should open source");
    let target = GeoJsonTarget::new(output.path(), 10);
    assert!(run_sieve(source, target, &SieveConfig::default()).await.is_err());
}

#[test]
fn test_duplicate_table_names_are_rejected() {
    let input = tempfile::tempdir().expect("Should create input dir");
    write_collection(&input.path().join("roads.geojson"), json!([]));
    write_collection(&input.path().join("roads.json"), json!([]));

    match GeoJsonSource::open(input.path()) {
        Err(SieveError::DuplicateTable { name, first, second }) => {
            assert_eq!(name, "roads");
            assert_ne!(first, second);
        }
        other => panic!("expected a duplicate table error, got {:?}", other.map(|_| ())),
    }
}
