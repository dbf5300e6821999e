use geozone::config::subsystems::ClusteringConfig;
use geozone::{GeoRecord, ZoneClusterer};

// ~1.002 miles of longitude at the equator under the 3959-mile Earth radius
const ONE_MILE_LNG: f64 = 0.0145;

struct TestRecord {
    address: String,
    coordinate: Option<(f64, f64)>,
}

impl GeoRecord for TestRecord {
    fn coordinate(&self) -> Option<(f64, f64)> {
        self.coordinate
    }

    fn sample_address(&self) -> &str {
        &self.address
    }
}

fn located(lat: f64, lng: f64, address: &str) -> TestRecord {
    TestRecord {
        address: address.to_string(),
        coordinate: Some((lat, lng)),
    }
}

fn unlocated(address: &str) -> TestRecord {
    TestRecord {
        address: address.to_string(),
        coordinate: None,
    }
}

fn clusterer(radius_miles: f64) -> ZoneClusterer {
    let config = ClusteringConfig {
        radius_miles,
        ..ClusteringConfig::default()
    };
    ZoneClusterer::new(config).unwrap()
}

fn rtree_clusterer(radius_miles: f64) -> ZoneClusterer {
    let config = ClusteringConfig {
        radius_miles,
        spatial_index: true,
        ..ClusteringConfig::default()
    };
    ZoneClusterer::new(config).unwrap()
}

/// A-B and B-C are ~1 mile apart, A-C ~2 miles. Three clustered points plus
/// one far-away singleton and one record without a coordinate.
fn chain_records() -> Vec<TestRecord> {
    vec![
        located(0.0, 0.0, "100 Main St"),
        located(0.0, ONE_MILE_LNG, "200 Main St"),
        located(0.0, 2.0 * ONE_MILE_LNG, "300 Main St"),
        located(1.0, 1.0, "1 Remote Rd"),
        unlocated("PO Box 12"),
    ]
}

#[test]
fn chain_clustering_is_transitive() {
    // A and C are ~2 miles apart, beyond the 1.5-mile radius, but both are
    // within radius of B, so all three land in one zone.
    let records = chain_records();
    let labels = clusterer(1.5).assign_zones(&records);

    assert_eq!(labels[0], Some("Zone A".to_string()));
    assert_eq!(labels[1], Some("Zone A".to_string()));
    assert_eq!(labels[2], Some("Zone A".to_string()));
}

#[test]
fn isolated_point_becomes_singleton_zone() {
    let records = chain_records();
    let report = clusterer(1.5).zone_records(&records);

    assert_eq!(report.labels[3], Some("Zone B".to_string()));

    let singleton = report
        .zones
        .iter()
        .find(|z| z.zone_id == "Zone B")
        .expect("singleton zone missing");
    assert_eq!(singleton.count, 1);
}

#[test]
fn null_coordinate_records_are_excluded() {
    let records = chain_records();
    let report = clusterer(1.5).zone_records(&records);

    assert_eq!(report.labels[4], None);

    let summarized: usize = report.zones.iter().map(|z| z.count).sum();
    assert_eq!(summarized, 4, "unlocated record leaked into a summary");
}

#[test]
fn non_finite_coordinates_are_treated_as_missing() {
    let records = vec![
        located(f64::NAN, 0.0, "NaN lat"),
        located(0.0, f64::INFINITY, "Inf lng"),
        located(0.0, 0.0, "Valid"),
    ];
    let labels = clusterer(1.5).assign_zones(&records);

    assert_eq!(labels[0], None);
    assert_eq!(labels[1], None);
    assert_eq!(labels[2], Some("Zone A".to_string()));
}

#[test]
fn singletons_are_labeled_after_clusters() {
    // The singleton comes first in input order, but cluster labels are
    // assigned first, so the cluster is Zone A and the singleton Zone B.
    let records = vec![
        located(1.0, 1.0, "1 Remote Rd"),
        located(0.0, 0.0, "100 Main St"),
        located(0.0, ONE_MILE_LNG, "200 Main St"),
    ];
    let labels = clusterer(1.5).assign_zones(&records);

    assert_eq!(labels[0], Some("Zone B".to_string()));
    assert_eq!(labels[1], Some("Zone A".to_string()));
    assert_eq!(labels[2], Some("Zone A".to_string()));
}

#[test]
fn duplicate_coordinates_share_a_zone() {
    let records = vec![
        located(0.0, 0.0, "Unit 1"),
        located(0.0, 0.0, "Unit 2"),
    ];
    let report = clusterer(1.5).zone_records(&records);

    assert_eq!(report.labels[0], report.labels[1]);
    assert_eq!(report.zones.len(), 1);
    assert_eq!(report.zones[0].count, 2);
}

#[test]
fn empty_input_yields_empty_outputs() {
    let records: Vec<TestRecord> = Vec::new();
    let report = clusterer(1.5).zone_records(&records);

    assert!(report.labels.is_empty());
    assert!(report.zones.is_empty());
}

#[test]
fn partition_invariant_holds() {
    let records = scattered_records();
    let report = clusterer(1.5).zone_records(&records);

    // Every coordinate-bearing record gets exactly one label, every record
    // without a coordinate gets none.
    for (record, label) in records.iter().zip(&report.labels) {
        assert_eq!(record.coordinate().is_some(), label.is_some());
    }

    // Zone counts partition the labeled records.
    let labeled = report.labels.iter().filter(|l| l.is_some()).count();
    let summarized: usize = report.zones.iter().map(|z| z.count).sum();
    assert_eq!(labeled, summarized);

    // Labels are unique per zone.
    let mut ids: Vec<&str> = report.zones.iter().map(|z| z.zone_id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), report.zones.len());
}

#[test]
fn identical_runs_produce_identical_output() {
    let records = scattered_records();
    let engine = clusterer(1.5);

    let first = engine.zone_records(&records);
    let second = engine.zone_records(&records);

    assert_eq!(first.labels, second.labels);
    assert_eq!(first.zones, second.zones);
}

#[test]
fn growing_the_radius_never_shrinks_clusters() {
    for records in [chain_records(), scattered_records()] {
        let tight = clusterer(0.5).zone_records(&records);
        let loose = clusterer(1.5).zone_records(&records);

        // Total zone count never increases with a larger radius.
        assert!(loose.zones.len() <= tight.zones.len());

        // No record's zone can lose members: the loose-radius zone holding a
        // record is at least as big as its tight-radius zone.
        for (tight_label, loose_label) in tight.labels.iter().zip(&loose.labels) {
            let (Some(tight_label), Some(loose_label)) = (tight_label, loose_label) else {
                continue;
            };
            let tight_size = tight.labels.iter().flatten().filter(|l| *l == tight_label).count();
            let loose_size = loose.labels.iter().flatten().filter(|l| *l == loose_label).count();
            assert!(loose_size >= tight_size);
        }
    }

    // The chain set actually merges: four zones at half a mile, two at 1.5.
    let records = chain_records();
    assert_eq!(clusterer(0.5).zone_records(&records).zones.len(), 4);
    assert_eq!(clusterer(1.5).zone_records(&records).zones.len(), 2);
}

#[test]
fn rtree_index_matches_linear_scan() {
    let records = scattered_records();

    let linear = clusterer(1.5).zone_records(&records);
    let indexed = rtree_clusterer(1.5).zone_records(&records);

    assert_eq!(linear.labels, indexed.labels);
    assert_eq!(linear.zones, indexed.zones);
}

#[test]
fn batches_cluster_independently() {
    let batches = vec![chain_records(), scattered_records()];
    let engine = clusterer(1.5);

    let reports = engine.zone_batches(&batches);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].labels, engine.assign_zones(&batches[0]));
    assert_eq!(reports[1].labels, engine.assign_zones(&batches[1]));
}

#[test]
fn rejects_non_positive_radius() {
    assert!(ZoneClusterer::new(ClusteringConfig {
        radius_miles: 0.0,
        ..ClusteringConfig::default()
    })
    .is_err());

    assert!(ZoneClusterer::new(ClusteringConfig {
        radius_miles: -1.5,
        ..ClusteringConfig::default()
    })
    .is_err());

    assert!(ZoneClusterer::new(ClusteringConfig {
        radius_miles: f64::NAN,
        ..ClusteringConfig::default()
    })
    .is_err());
}

/// A deterministic spread: three tight groups, two loners, two unlocated
/// records. Group spacing is ~0.4 miles within groups, tens of miles
/// between them.
fn scattered_records() -> Vec<TestRecord> {
    let mut records = Vec::new();

    for group in 0..3 {
        let base_lat = group as f64 * 0.5;
        for member in 0..4 {
            records.push(located(
                base_lat,
                member as f64 * 0.4 * ONE_MILE_LNG,
                &format!("{}00 Group {} Ave", member + 1, group),
            ));
        }
        if group == 1 {
            records.push(unlocated("Unknown address"));
        }
    }

    records.push(located(10.0, 10.0, "1 Far Pl"));
    records.push(located(-10.0, -10.0, "2 Far Pl"));
    records.push(unlocated(""));

    records
}
