//! Great-circle length measurement
//!
//! Distances use the haversine formula on a spherical Earth of mean radius
//! [`EARTH_RADIUS_M`]. This is an approximation: results differ from the WGS84
//! ellipsoid geodesic by up to ~0.5%.

use crate::Geometry;
use geo::Coord;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two (lon, lat) coordinates in meters
#[inline]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Length of a polyline in kilometers
///
/// Sums the great-circle distance of every consecutive pair of coordinates.
/// Fewer than two coordinates have no segments and measure 0.
pub fn length_of_line(coords: &[Coord<f64>]) -> f64 {
    let meters: f64 = coords
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum();
    meters / 1000.0
}

/// Length of a geometry in kilometers
///
/// Only `LineString` and `MultiLineString` have a length; every other kind is 0.
pub fn length_of_geometry(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::LineString(line) => length_of_line(&line.0),
        Geometry::MultiLineString(lines) => {
            lines.0.iter().map(|line| length_of_line(&line.0)).sum()
        }
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::GeometryCollection(_) => 0.0,
    }
}
