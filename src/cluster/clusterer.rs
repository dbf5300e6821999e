// src/cluster/clusterer.rs
use ahash::AHashSet;
use std::collections::VecDeque;
use log::debug;
use rayon::prelude::*;

use crate::config::subsystems::ClusteringConfig;
use crate::error::Result;
use crate::summary::summarize_zones;
use crate::types::{GeoPoint, GeoRecord, ZoneSummary};
use super::labels::zone_label;
use super::neighbors::{LinearScan, NeighborFinder, RTreeIndex};

/// Zone assignment plus derived summaries for one record batch.
#[derive(Debug, Clone)]
pub struct ZoneReport {
    /// Parallel to the input records; `None` for records without a usable
    /// coordinate.
    pub labels: Vec<Option<String>>,
    /// Summaries sorted by size descending, ties in discovery order.
    pub zones: Vec<ZoneSummary>,
}

/// Groups coordinate-bearing records into radius-connected zones and assigns
/// deterministic labels: same records and radius in, same zones out.
pub struct ZoneClusterer {
    config: ClusteringConfig,
}

/// Visited markers for a single clustering pass, keyed by position in the
/// point slice. Owned by one call, so independent batches never share state.
struct VisitState {
    visited: AHashSet<usize>,
}

impl VisitState {
    fn new(capacity: usize) -> Self {
        Self {
            visited: AHashSet::with_capacity(capacity),
        }
    }

    /// Marks the position visited; false if it already was.
    fn mark(&mut self, pos: usize) -> bool {
        self.visited.insert(pos)
    }

    fn contains(&self, pos: usize) -> bool {
        self.visited.contains(&pos)
    }
}

impl ZoneClusterer {
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn radius_miles(&self) -> f64 {
        self.config.radius_miles
    }

    /// Assigns a zone label to every record with a finite coordinate pair.
    /// The returned vector is parallel to `records`; entries for records
    /// without a usable coordinate stay `None`.
    pub fn assign_zones<R: GeoRecord>(&self, records: &[R]) -> Vec<Option<String>> {
        let points = collect_points(records);
        let mut labels: Vec<Option<String>> = vec![None; records.len()];

        if points.is_empty() {
            return labels;
        }

        let clusters = if self.config.spatial_index {
            let finder = RTreeIndex::new(&points);
            self.cluster_points(&points, &finder)
        } else {
            let finder = LinearScan::new(&points);
            self.cluster_points(&points, &finder)
        };

        // Clusters first, in discovery order
        let mut next_zone = 0usize;
        for cluster in &clusters {
            let label = zone_label(next_zone);
            next_zone += 1;
            for &pos in cluster {
                labels[points[pos].index] = Some(label.clone());
            }
        }

        // Points with no neighbor within radius stayed unvisited: they become
        // singleton zones in ascending record order, continuing the same
        // letter sequence.
        for point in &points {
            if labels[point.index].is_none() {
                labels[point.index] = Some(zone_label(next_zone));
                next_zone += 1;
            }
        }

        debug!(
            "Assigned {} zones across {} geocoded records ({} total)",
            next_zone,
            points.len(),
            records.len()
        );

        labels
    }

    /// Full pass over one batch: label assignment plus zone summaries.
    pub fn zone_records<R: GeoRecord>(&self, records: &[R]) -> ZoneReport {
        let labels = self.assign_zones(records);
        let zones = summarize_zones(records, &labels);
        ZoneReport { labels, zones }
    }

    /// Runs [`Self::zone_records`] over independent batches in parallel.
    /// Within a batch the pass stays sequential, since cluster expansion
    /// depends on previously visited state.
    pub fn zone_batches<R: GeoRecord + Sync>(&self, batches: &[Vec<R>]) -> Vec<ZoneReport> {
        batches
            .par_iter()
            .map(|batch| self.zone_records(batch))
            .collect()
    }

    /// Radius-connectivity clustering with an effective min-points of one:
    /// any point with at least one neighbor seeds a cluster, and membership
    /// is transitive through intermediate points, so two points farther than
    /// the radius apart can share a cluster through a chain between them.
    fn cluster_points<F: NeighborFinder>(&self, points: &[GeoPoint], finder: &F) -> Vec<Vec<usize>> {
        let mut state = VisitState::new(points.len());
        let mut clusters = Vec::new();

        for pos in 0..points.len() {
            if state.contains(pos) {
                continue;
            }

            let neighbors = finder.neighbors_within(pos, self.config.radius_miles);

            if !neighbors.is_empty() {
                clusters.push(self.expand_cluster(pos, neighbors, finder, &mut state));
            }
        }

        clusters
    }

    /// Breadth-first expansion from a seed point. The queue is consumed in
    /// insertion order and neighbor sets arrive in slice order, which keeps
    /// cluster membership independent of anything but the input sequence.
    fn expand_cluster<F: NeighborFinder>(
        &self,
        seed: usize,
        seed_neighbors: Vec<usize>,
        finder: &F,
        state: &mut VisitState,
    ) -> Vec<usize> {
        let mut cluster = vec![seed];
        state.mark(seed);

        let mut queue: VecDeque<usize> = seed_neighbors.into();

        while let Some(pos) = queue.pop_front() {
            if !state.mark(pos) {
                continue;
            }
            cluster.push(pos);

            for neighbor in finder.neighbors_within(pos, self.config.radius_miles) {
                if !state.contains(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        cluster
    }
}

/// Builds the transient point set: one [`GeoPoint`] per record whose
/// coordinate pair is present and finite, preserving input order. Malformed
/// geocoding results are excluded here rather than failing the run.
fn collect_points<R: GeoRecord>(records: &[R]) -> Vec<GeoPoint> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record.coordinate() {
            Some((lat, lng)) if lat.is_finite() && lng.is_finite() => {
                Some(GeoPoint { index, lat, lng })
            }
            _ => None,
        })
        .collect()
}
