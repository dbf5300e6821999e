use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use log::{info, warn};

use geozone::export::{self, RunStats};
use geozone::{DocumentRecord, Result, ZoneClusterer, ZoningConfig};

#[derive(Parser, Debug)]
#[command(
    name = "zone_documents",
    about = "Cluster geocoded document records into named geographic zones"
)]
struct Args {
    /// JSON file holding the extracted document records
    input: PathBuf,

    /// INI configuration file
    #[arg(long, default_value = "default.ini")]
    config: PathBuf,

    /// Override the clustering radius in miles
    #[arg(long)]
    radius: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first; fall back to defaults when no file exists so
    // the binary works out of the box.
    let mut config = if args.config.exists() {
        ZoningConfig::from_ini(&args.config)?
    } else {
        ZoningConfig::default()
    };

    if let Some(radius) = args.radius {
        config.clustering.radius_miles = radius;
    }
    config.validate()?;

    // Initialize logging system with configuration
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, config.clustering.get_log_level())
        .init();

    if !args.config.exists() {
        warn!("Config file {:?} not found, using defaults", args.config);
    }

    let started_at = Local::now();

    let raw = fs::read_to_string(&args.input)?;
    let mut documents: Vec<DocumentRecord> = serde_json::from_str(&raw)?;
    info!("Loaded {} document records from {:?}", documents.len(), args.input);

    let clusterer = ZoneClusterer::new(config.clustering.clone())?;
    info!(
        "Clustering with radius {} miles ({} neighbor search)",
        clusterer.radius_miles(),
        if config.clustering.spatial_index { "R-tree" } else { "linear" }
    );

    let report = clusterer.zone_records(&documents);

    // Annotate the records with their zone labels before export
    for (document, label) in documents.iter_mut().zip(&report.labels) {
        document.zone_id = label.clone();
    }

    let geocoded_documents = report.labels.iter().filter(|label| label.is_some()).count();

    export::export_documents_csv(&documents, &config.files.documents_file)?;
    export::export_zones_csv(&report.zones, &config.files.zones_file)?;
    export::export_zones_json(&report.zones, &config.files.zones_json_file)?;

    let stats = RunStats {
        total_documents: documents.len(),
        geocoded_documents,
        total_zones: report.zones.len(),
        started_at,
        finished_at: Local::now(),
    };
    export::write_run_log(&stats, &config.files.log_file)?;

    info!(
        "Created {} zones from {} geocoded records ({} total)",
        report.zones.len(),
        geocoded_documents,
        documents.len()
    );

    Ok(())
}
