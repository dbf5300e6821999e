// src/export.rs
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::types::{DocumentRecord, ZoneSummary};

/// Flattened zone row for CSV output; sample addresses are joined into a
/// single pipe-separated column.
#[derive(Serialize)]
struct ZoneCsvRow<'a> {
    zone_id: &'a str,
    count: usize,
    centroid_lat: f64,
    centroid_lng: f64,
    sample_addresses: String,
    map_link: &'a str,
}

pub fn export_documents_csv<P: AsRef<Path>>(documents: &[DocumentRecord], path: P) -> Result<()> {
    ensure_parent_dir(path.as_ref())?;

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for document in documents {
        writer.serialize(document)?;
    }
    writer.flush()?;

    info!("Exported {} documents to {:?}", documents.len(), path.as_ref());
    Ok(())
}

pub fn export_zones_csv<P: AsRef<Path>>(zones: &[ZoneSummary], path: P) -> Result<()> {
    ensure_parent_dir(path.as_ref())?;

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for zone in zones {
        writer.serialize(ZoneCsvRow {
            zone_id: &zone.zone_id,
            count: zone.count,
            centroid_lat: zone.centroid_lat,
            centroid_lng: zone.centroid_lng,
            sample_addresses: zone.sample_addresses.join(" | "),
            map_link: &zone.map_link,
        })?;
    }
    writer.flush()?;

    info!("Exported {} zones to {:?}", zones.len(), path.as_ref());
    Ok(())
}

pub fn export_zones_json<P: AsRef<Path>>(zones: &[ZoneSummary], path: P) -> Result<()> {
    ensure_parent_dir(path.as_ref())?;

    let json = serde_json::to_string_pretty(zones)?;
    fs::write(path.as_ref(), json)?;

    info!("Exported {} zones to {:?}", zones.len(), path.as_ref());
    Ok(())
}

/// Statistics for one pipeline run, written to the run log.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub total_documents: usize,
    pub geocoded_documents: usize,
    pub total_zones: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

pub fn write_run_log<P: AsRef<Path>>(stats: &RunStats, path: P) -> Result<()> {
    ensure_parent_dir(path.as_ref())?;

    let duration_secs = (stats.finished_at - stats.started_at).num_milliseconds() as f64 / 1000.0;
    let geocoding_rate = if stats.total_documents > 0 {
        stats.geocoded_documents as f64 / stats.total_documents as f64 * 100.0
    } else {
        0.0
    };

    let log_content = format!(
        "DOCUMENT ZONING - RUN LOG\n\
         =========================\n\
         Date: {}\n\
         Duration: {:.2} seconds\n\
         \n\
         SUMMARY\n\
         -------\n\
         Total Documents: {}\n\
         Geocoded Documents: {}\n\
         Total Zones Created: {}\n\
         \n\
         GEOCODING RATE: {:.1}%\n",
        stats.finished_at.format("%Y-%m-%d %H:%M:%S"),
        duration_secs,
        stats.total_documents,
        stats.geocoded_documents,
        stats.total_zones,
        geocoding_rate,
    );

    fs::write(path.as_ref(), log_content)?;

    info!("Run log written to {:?}", path.as_ref());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
