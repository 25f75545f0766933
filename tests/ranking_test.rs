use std::collections::HashSet;
use zip_gazetteer::{
    find_closest_cities, resolve_city, DedupPolicy, GazetteerError, ReferencePoint, ZipDirectory,
    ZipRecord, DEFAULT_TOP_N,
};

fn springfield_directory() -> ZipDirectory {
    ZipDirectory::from_records(vec![
        ZipRecord::new("62701", "Springfield", "IL", 39.78, -89.65, Some(116_250)),
        ZipRecord::new("62629", "Chatham", "IL", 39.67, -89.70, Some(13_350)),
        ZipRecord::new("65801", "Springfield", "MO", 37.21, -93.30, Some(169_176)),
        ZipRecord::new("14604", "Rochester", "NY", 43.15, -77.60, Some(211_328)),
    ])
}

#[test]
fn test_springfield_scenario() {
    let directory = springfield_directory();
    let matches = directory.find_by_city("Springfield", Some("IL"));
    let reference = ReferencePoint::from(matches[0]);

    let nearest = find_closest_cities(&directory, &reference, 2, DedupPolicy::default());

    let names: Vec<(&str, &str)> = nearest
        .iter()
        .map(|r| (r.record.city.as_str(), r.record.state_id.as_str()))
        .collect();
    assert_eq!(names, vec![("Chatham", "IL"), ("Springfield", "MO")]);
    assert!(nearest[0].distance < nearest[1].distance);
}

#[test]
fn test_springfield_scenario_through_query() {
    let directory = springfield_directory();
    let report =
        resolve_city(&directory, "Springfield", Some("IL"), 2, DedupPolicy::default()).unwrap();

    assert_eq!(report.zip_codes(), vec!["62701"]);
    let lines: Vec<String> = report.nearest.iter().map(|r| r.to_string()).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("city: Chatham, zipcode: 62629, distance: "));
    assert!(lines[0].ends_with(", population: 13350"));
    assert!(lines[1].starts_with("city: Springfield, zipcode: 65801, "));
}

#[test]
fn test_all_distinct_cities_when_top_n_is_large() {
    let directory = springfield_directory();
    let reference = ReferencePoint::from(directory.find_by_zip("14604").unwrap());

    let nearest = find_closest_cities(&directory, &reference, DEFAULT_TOP_N, DedupPolicy::CityName);

    // Springfield IL and MO share a name, only the nearer one survives
    let zips: Vec<&str> = nearest.iter().map(|r| r.record.zip.as_str()).collect();
    assert_eq!(zips, vec!["62701", "62629"]);

    let names: HashSet<&str> = nearest.iter().map(|r| r.record.city.as_str()).collect();
    assert_eq!(names.len(), nearest.len());
}

#[test]
fn test_empty_directory_yields_empty_ranking() {
    let directory = ZipDirectory::from_records(Vec::new());
    let reference = ReferencePoint {
        lat: 39.78,
        lng: -89.65,
        city: "Springfield".to_string(),
        state_id: "IL".to_string(),
    };

    let nearest = find_closest_cities(&directory, &reference, DEFAULT_TOP_N, DedupPolicy::default());
    assert!(nearest.is_empty());
}

#[test]
fn test_unknown_city() {
    let directory = springfield_directory();

    assert!(directory.find_by_city("Nowhere", None).is_empty());

    let err = resolve_city(&directory, "Nowhere", None, DEFAULT_TOP_N, DedupPolicy::default())
        .unwrap_err();
    assert!(matches!(err, GazetteerError::CityNotFound { .. }));
    assert_eq!(err.exit_code(), 1);
}
