//! Great-circle distance between geographic coordinates.
//!
//! Sites and reported positions are WGS-84 degree coordinates, so distances
//! use the haversine formula on a mean-radius sphere rather than planar
//! Euclidean math. At geofence scale (tens of meters) the spherical
//! approximation is accurate to well under a meter.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS-84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Haversine distance between two points, in meters.
///
/// The result is rounded to centimeters; callers display it to field staff
/// and sub-centimeter digits are noise.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let d = 2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin();

    (d * 100.0).round() / 100.0
}

/// Whether `reported` lies within `radius_meters` of `site`.
pub fn within_radius(site: GeoPoint, reported: GeoPoint, radius_meters: f64) -> bool {
    distance_meters(site, reported) <= radius_meters
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
