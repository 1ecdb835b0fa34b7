//! GeoJSON serialization of a feature collection

use crate::{Feature, FeatureCollection, Geometry, Result};
use geo::{Coord, LineString, Polygon};
use serde_json::{Value, json};

/// Build a GeoJSON `FeatureCollection` value
pub fn to_geojson(collection: &FeatureCollection) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": collection.iter().map(feature_to_value).collect::<Vec<_>>(),
    })
}

/// Serialize a collection as GeoJSON text
pub fn to_geojson_string(collection: &FeatureCollection, pretty: bool) -> Result<String> {
    let value = to_geojson(collection);
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

fn feature_to_value(feature: &Feature) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": geometry_to_value(feature.geometry()),
    })
}

fn geometry_to_value(geometry: &Geometry) -> Value {
    let kind = geometry.kind().name();
    match geometry {
        Geometry::Point(p) => json!({ "type": kind, "coordinates": position(p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": kind,
            "coordinates": mp.0.iter().map(|p| position(p.0)).collect::<Vec<_>>(),
        }),
        Geometry::LineString(ls) => json!({ "type": kind, "coordinates": line(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": kind,
            "coordinates": mls.0.iter().map(line).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(poly) => json!({ "type": kind, "coordinates": rings(poly) }),
        Geometry::MultiPolygon(mpoly) => json!({
            "type": kind,
            "coordinates": mpoly.0.iter().map(rings).collect::<Vec<_>>(),
        }),
        Geometry::GeometryCollection(children) => json!({
            "type": kind,
            "geometries": children.iter().map(geometry_to_value).collect::<Vec<_>>(),
        }),
    }
}

#[inline]
fn position(c: Coord<f64>) -> Value {
    json!([c.x, c.y])
}

fn line(ls: &LineString<f64>) -> Value {
    Value::Array(ls.0.iter().copied().map(position).collect())
}

fn rings(poly: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(poly.exterior())
            .chain(poly.interiors())
            .map(line)
            .collect(),
    )
}
