// src/cluster/neighbors.rs
use rstar::{RTree, RTreeObject, AABB};
use crate::distance::haversine_miles;
use crate::types::GeoPoint;

// Conservative miles-per-degree-of-latitude. Slightly below the true ~69.1
// so the search envelope over-covers and never excludes a real neighbor.
const MILES_PER_DEGREE: f64 = 68.0;

/// Neighbor lookup behind the clustering loop. Implementations answer "which
/// points lie within `radius_miles` of the point at `pos`", returning
/// positions into the point slice in ascending order, the query point
/// excluded. Swapping implementations changes performance only, never
/// clustering semantics.
pub trait NeighborFinder {
    fn neighbors_within(&self, pos: usize, radius_miles: f64) -> Vec<usize>;
}

/// Exact O(n) scan over the point slice in input order. A full clustering
/// pass over it is O(n²), which is fine at the low-thousands scale this
/// crate targets; [`RTreeIndex`] exists for anything larger.
pub struct LinearScan<'a> {
    points: &'a [GeoPoint],
}

impl<'a> LinearScan<'a> {
    pub fn new(points: &'a [GeoPoint]) -> Self {
        Self { points }
    }
}

impl NeighborFinder for LinearScan<'_> {
    fn neighbors_within(&self, pos: usize, radius_miles: f64) -> Vec<usize> {
        let origin = &self.points[pos];
        self.points
            .iter()
            .enumerate()
            .filter(|(other_pos, other)| {
                *other_pos != pos
                    && haversine_miles(origin.lat, origin.lng, other.lat, other.lng) <= radius_miles
            })
            .map(|(other_pos, _)| other_pos)
            .collect()
    }
}

/// Wrapper around a point to make it compatible with R-tree spatial indexing.
struct IndexedPoint {
    /// Position in the point slice
    pos: usize,
    lat: f64,
    lng: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lng])
    }
}

/// R-tree-backed neighbor queries: a degree-space envelope prefilter followed
/// by the exact haversine check. Results are re-sorted to slice order so
/// clustering output stays bit-identical to [`LinearScan`].
///
/// The envelope math assumes county-scale data away from the poles and the
/// antimeridian.
pub struct RTreeIndex<'a> {
    points: &'a [GeoPoint],
    tree: RTree<IndexedPoint>,
}

impl<'a> RTreeIndex<'a> {
    pub fn new(points: &'a [GeoPoint]) -> Self {
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(pos, p)| IndexedPoint {
                pos,
                lat: p.lat,
                lng: p.lng,
            })
            .collect();

        // Bulk load is much more efficient than individual insertions
        Self {
            points,
            tree: RTree::bulk_load(entries),
        }
    }
}

impl NeighborFinder for RTreeIndex<'_> {
    fn neighbors_within(&self, pos: usize, radius_miles: f64) -> Vec<usize> {
        let origin = &self.points[pos];

        let lat_pad = radius_miles / MILES_PER_DEGREE;
        // Longitude degrees shrink with latitude; clamp the cosine away from
        // zero so the envelope stays finite near the poles.
        let lng_scale = origin.lat.to_radians().cos().abs().max(1e-6);
        let lng_pad = radius_miles / (MILES_PER_DEGREE * lng_scale);

        let search_area = AABB::from_corners(
            [origin.lat - lat_pad, origin.lng - lng_pad],
            [origin.lat + lat_pad, origin.lng + lng_pad],
        );

        let mut neighbors: Vec<usize> = self
            .tree
            .locate_in_envelope(&search_area)
            .filter(|candidate| {
                candidate.pos != pos
                    && haversine_miles(origin.lat, origin.lng, candidate.lat, candidate.lng)
                        <= radius_miles
            })
            .map(|candidate| candidate.pos)
            .collect();

        // R-tree traversal order is structural, not input order
        neighbors.sort_unstable();
        neighbors
    }
}
