// src/distance.rs

/// Earth radius in statute miles. Every distance in this crate, including
/// the clustering radius, is expressed in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance in miles between two coordinates, via the
/// Haversine formula.
///
/// Pure and symmetric; returns 0 for identical inputs. NaN inputs propagate,
/// so coordinates must be validated finite before they reach this function.
pub fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}
