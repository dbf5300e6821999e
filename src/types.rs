use serde::{Serialize, Deserialize};

/// A record the clusterer can zone. Implementors expose an optional resolved
/// coordinate pair and a display address; the clustering core requires
/// nothing else from the record type.
pub trait GeoRecord {
    /// Resolved coordinate as `(lat, lng)`, or `None` when geocoding failed
    /// upstream. Non-finite components are treated the same as `None` by
    /// every consumer in this crate.
    fn coordinate(&self) -> Option<(f64, f64)>;

    /// Free-text address shown in zone summaries. May be empty.
    fn sample_address(&self) -> &str;
}

/// Transient clustering view of one record's coordinate. `index` points back
/// into the caller's record slice and is the only linkage to the source
/// record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub index: usize,
    pub lat: f64,
    pub lng: f64,
}

/// Derived per-zone statistics, recomputed in full on every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone_id: String,
    pub count: usize,
    pub centroid_lat: f64,
    pub centroid_lng: f64,
    pub sample_addresses: Vec<String>,
    pub map_link: String,
}

/// One extracted document as produced by the upstream scraping and
/// extraction stages. Field set follows the exported CSV columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    #[serde(default)]
    pub doc_url: String,
    #[serde(default)]
    pub doc_type: String,
    #[serde(default)]
    pub recorded_date: String,
    #[serde(default)]
    pub borrower_owner_name: Option<String>,
    #[serde(default)]
    pub lender_name: Option<String>,
    #[serde(default)]
    pub property_address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl GeoRecord for DocumentRecord {
    fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    fn sample_address(&self) -> &str {
        &self.property_address
    }
}
