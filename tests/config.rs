use std::io::Write;

use tempfile::NamedTempFile;

use geozone::config::subsystems::ClusteringConfig;
use geozone::ZoningConfig;

#[test]
fn defaults_match_documented_values() {
    let config = ZoningConfig::default();

    assert_eq!(config.clustering.radius_miles, 1.5);
    assert!(!config.clustering.spatial_index);
    assert_eq!(config.clustering.log_level, "info");
}

#[test]
fn ini_overrides_clustering_settings() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "# comment line\n\
         [clustering]\n\
         radius_miles = 2.5\n\
         spatial_index = true\n\
         log_level = debug"
    )
    .unwrap();

    let config = ZoningConfig::from_ini(file.path()).unwrap();

    assert_eq!(config.clustering.radius_miles, 2.5);
    assert!(config.clustering.spatial_index);
    assert_eq!(config.clustering.get_log_level(), log::LevelFilter::Debug);
}

#[test]
fn ini_overrides_output_paths() {
    let dir = tempfile::TempDir::new().unwrap();
    let zones_file = dir.path().join("z.csv");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[file]\n\
         zones_file = {}",
        zones_file.display()
    )
    .unwrap();

    let config = ZoningConfig::from_ini(file.path()).unwrap();

    assert_eq!(config.clustering.radius_miles, 1.5);
    assert_eq!(config.files.zones_file, zones_file);
}

#[test]
fn invalid_ini_values_fall_back_to_defaults() {
    // Bad keys and unparsable values are logged and skipped, leaving the
    // defaults in place; the final config still validates.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[clustering]\n\
         radius_miles = minus-two\n\
         unknown_key = 7"
    )
    .unwrap();

    let config = ZoningConfig::from_ini(file.path()).unwrap();

    assert_eq!(config.clustering.radius_miles, 1.5);
}

#[test]
fn validate_rejects_non_positive_radius() {
    let mut config = ClusteringConfig::default();

    config.radius_miles = 0.0;
    assert!(config.validate().is_err());

    config.radius_miles = -2.0;
    assert!(config.validate().is_err());

    config.radius_miles = f64::INFINITY;
    assert!(config.validate().is_err());

    config.radius_miles = 0.25;
    assert!(config.validate().is_ok());
}

#[test]
fn unknown_log_level_defaults_to_info() {
    let config = ClusteringConfig {
        log_level: "shouting".to_string(),
        ..ClusteringConfig::default()
    };

    assert_eq!(config.get_log_level(), log::LevelFilter::Info);
}
