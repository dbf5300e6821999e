// src/summary.rs
use ahash::AHashMap;

use crate::cluster::labels::label_index;
use crate::types::{GeoRecord, ZoneSummary};

/// Zone summaries list the first few member addresses as a sample.
const MAX_SAMPLE_ADDRESSES: usize = 3;

struct ZoneGroup {
    zone_id: String,
    members: Vec<usize>,
}

/// Groups labeled records by zone and derives per-zone statistics.
///
/// `labels` must be parallel to `records` (as produced by
/// [`crate::ZoneClusterer::assign_zones`]); unlabeled records are ignored.
/// The result is sorted by count descending, ties broken by the label's
/// discovery order.
pub fn summarize_zones<R: GeoRecord>(records: &[R], labels: &[Option<String>]) -> Vec<ZoneSummary> {
    let mut group_positions: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<ZoneGroup> = Vec::new();

    for (record_index, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            let group_pos = *group_positions.entry(label.as_str()).or_insert_with(|| {
                groups.push(ZoneGroup {
                    zone_id: label.clone(),
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[group_pos].members.push(record_index);
        }
    }

    // Order groups by label discovery index before the size sort, so the
    // stable sort's tie-break is discovery order rather than the order labels
    // happen to first appear in the record sequence. Labels not produced by
    // this crate sort after, in first-appearance order.
    let mut ordered: Vec<(usize, ZoneGroup)> = groups.into_iter().enumerate().collect();
    ordered.sort_by_key(|(appearance, group)| match label_index(&group.zone_id) {
        Some(rank) => (0u8, rank, *appearance),
        None => (1u8, *appearance, *appearance),
    });

    let mut zones: Vec<ZoneSummary> = ordered
        .into_iter()
        .filter_map(|(_, group)| summarize_group(records, &group))
        .collect();

    // Sort zones by size (descending); stable, so ties keep discovery order
    zones.sort_by(|a, b| b.count.cmp(&a.count));
    zones
}

fn summarize_group<R: GeoRecord>(records: &[R], group: &ZoneGroup) -> Option<ZoneSummary> {
    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    let mut coordinate_count = 0usize;

    for &record_index in &group.members {
        if let Some((lat, lng)) = records[record_index].coordinate() {
            if lat.is_finite() && lng.is_finite() {
                sum_lat += lat;
                sum_lng += lng;
                coordinate_count += 1;
            }
        }
    }

    // Cannot occur for labels the clusterer assigns; callers may hand in
    // arbitrary label vectors.
    if coordinate_count == 0 {
        return None;
    }

    // Arithmetic mean per axis, not a geodesic centroid. At the 1-2 mile
    // radius scale the difference is negligible.
    let centroid_lat = sum_lat / coordinate_count as f64;
    let centroid_lng = sum_lng / coordinate_count as f64;

    let sample_addresses: Vec<String> = group
        .members
        .iter()
        .take(MAX_SAMPLE_ADDRESSES)
        .map(|&record_index| records[record_index].sample_address())
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect();

    let map_link = format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        centroid_lat, centroid_lng
    );

    Some(ZoneSummary {
        zone_id: group.zone_id.clone(),
        count: group.members.len(),
        centroid_lat,
        centroid_lng,
        sample_addresses,
        map_link,
    })
}
