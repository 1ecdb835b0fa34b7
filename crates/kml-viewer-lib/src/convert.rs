//! KML document conversion
//!
//! Walks the parsed KML tree in document order and turns every `Placemark` that carries a
//! geometry into one [`Feature`]. Payload shapes are validated here, so everything
//! downstream works with the closed [`Geometry`] enum.
//!
//! A `MultiGeometry` is flattened; a single child becomes that child, anything more
//! becomes a `GeometryCollection` (even when all children share a kind).
//!
//! `gx:Track` and `gx:MultiTrack` are not modelled by the `kml` crate, they arrive as raw
//! placemark children and are read into a `LineString` / `MultiLineString`.

use crate::{DataError, Feature, FeatureCollection, Geometry, Result};
use geo::{Coord, LineString, MultiLineString, Point, Polygon};
use kml::Kml;
use kml::types::{Element, Geometry as KmlGeometry, Placemark};

/// Convert KML text into a feature collection
///
/// Fails with [`DataError::KmlParse`] when the text is not a KML document and with
/// [`DataError::EmptyDocument`] when no placemark has a supported geometry.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_kml(text: &str) -> Result<FeatureCollection> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let kml: Kml = text.parse()?;

    let mut features = Vec::new();
    collect_features(&kml, &mut features);

    if features.is_empty() {
        return Err(DataError::EmptyDocument);
    }

    tracing::debug!("Converted KML document into {} features", features.len());
    Ok(FeatureCollection::new(features))
}

/// Convert raw file bytes (UTF-8, invalid sequences replaced) into a feature collection
pub fn parse_kml_bytes(bytes: &[u8]) -> Result<FeatureCollection> {
    parse_kml(&String::from_utf8_lossy(bytes))
}

/// Recursively collect placemark features from containers
fn collect_features(kml: &Kml, features: &mut Vec<Feature>) {
    match kml {
        Kml::KmlDocument(doc) => {
            for element in &doc.elements {
                collect_features(element, features);
            }
        }
        Kml::Document { elements, .. } => {
            for element in elements {
                collect_features(element, features);
            }
        }
        Kml::Folder(folder) => {
            for element in &folder.elements {
                collect_features(element, features);
            }
        }
        Kml::Placemark(placemark) => match placemark_geometry(placemark) {
            Some(geometry) => features.push(Feature::new(geometry)),
            None => tracing::debug!(
                "Skipping placemark without supported geometry: {:?}",
                placemark.name
            ),
        },
        _ => {}
    }
}

fn placemark_geometry(placemark: &Placemark) -> Option<Geometry> {
    match &placemark.geometry {
        Some(geometry) => convert_geometry(geometry),
        None => placemark.children.iter().find_map(convert_track),
    }
}

/// `gx:Track` / `gx:MultiTrack`, the `gx:` prefix is already stripped by the reader
fn convert_track(element: &Element) -> Option<Geometry> {
    match element.name.as_str() {
        "Track" => track_line(element).map(Geometry::LineString),
        "MultiTrack" => {
            let lines: Vec<_> = element
                .children
                .iter()
                .filter(|child| child.name == "Track")
                .filter_map(track_line)
                .collect();
            (!lines.is_empty()).then(|| Geometry::MultiLineString(MultiLineString::new(lines)))
        }
        _ => None,
    }
}

/// Read the `gx:coord` children ("lon lat [alt]") of a track
fn track_line(track: &Element) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = track
        .children
        .iter()
        .filter(|child| child.name == "coord")
        .filter_map(|child| parse_track_coord(child.content.as_deref()?))
        .collect();
    (!coords.is_empty()).then(|| LineString::new(coords))
}

fn parse_track_coord(text: &str) -> Option<Coord<f64>> {
    let mut parts = text.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some(Coord { x, y })
}

/// Convert a KML geometry, `None` if nothing supported remains
fn convert_geometry(geometry: &KmlGeometry) -> Option<Geometry> {
    match geometry {
        KmlGeometry::MultiGeometry(multi) => {
            let mut parts = Vec::with_capacity(multi.geometries.len());
            for child in &multi.geometries {
                flatten_into(child, &mut parts);
            }
            merge_parts(parts)
        }
        other => convert_simple(other),
    }
}

fn convert_simple(geometry: &KmlGeometry) -> Option<Geometry> {
    match geometry {
        KmlGeometry::Point(point) => Some(Geometry::Point(Point::from(to_coord(&point.coord)))),
        KmlGeometry::LineString(line) => Some(Geometry::LineString(to_line_string(&line.coords))),
        // A bare ring is rendered and measured as the closed polyline it describes
        KmlGeometry::LinearRing(ring) => Some(Geometry::LineString(to_line_string(&ring.coords))),
        KmlGeometry::Polygon(polygon) => Some(Geometry::Polygon(Polygon::new(
            to_line_string(&polygon.outer.coords),
            polygon
                .inner
                .iter()
                .map(|ring| to_line_string(&ring.coords))
                .collect(),
        ))),
        _ => None,
    }
}

/// Push the simple geometries of a possibly nested multi-geometry
fn flatten_into(geometry: &KmlGeometry, parts: &mut Vec<Geometry>) {
    match geometry {
        KmlGeometry::MultiGeometry(multi) => {
            for child in &multi.geometries {
                flatten_into(child, parts);
            }
        }
        other => {
            if let Some(converted) = convert_simple(other) {
                parts.push(converted);
            }
        }
    }
}

fn merge_parts(mut parts: Vec<Geometry>) -> Option<Geometry> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Geometry::GeometryCollection(parts)),
    }
}

/// Drop elevation, keep (lon, lat)
#[inline]
fn to_coord(coord: &kml::types::Coord<f64>) -> Coord<f64> {
    Coord {
        x: coord.x,
        y: coord.y,
    }
}

fn to_line_string(coords: &[kml::types::Coord<f64>]) -> LineString<f64> {
    LineString::new(coords.iter().map(to_coord).collect())
}
