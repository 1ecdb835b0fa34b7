//! Geometry data model
//!
//! Features carry a closed set of geometry kinds whose coordinate payloads are `geo`
//! types, so a `LineString` can never hold polygon rings and measurement code can match
//! exhaustively. Coordinates are WGS84 degrees with `x` = longitude and `y` = latitude.

use crate::measure;
use geo::{
    Coord, CoordsIter, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Rect,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying the shape of a geometry payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// GeoJSON type name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A geometry with a payload shape matching its kind
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    MultiPoint(MultiPoint<f64>),
    LineString(LineString<f64>),
    MultiLineString(MultiLineString<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The kind tag of this geometry
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
            Self::LineString(_) => GeometryKind::LineString,
            Self::MultiLineString(_) => GeometryKind::MultiLineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Self::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Total number of coordinates, including closing coordinates of polygon rings
    pub fn coords_count(&self) -> usize {
        match self {
            Self::Point(p) => p.coords_count(),
            Self::MultiPoint(mp) => mp.coords_count(),
            Self::LineString(ls) => ls.coords_count(),
            Self::MultiLineString(mls) => mls.coords_count(),
            Self::Polygon(poly) => poly.coords_count(),
            Self::MultiPolygon(mpoly) => mpoly.coords_count(),
            Self::GeometryCollection(children) => children.iter().map(Self::coords_count).sum(),
        }
    }

    /// Visit every coordinate in document order
    pub fn for_each_coord(&self, f: &mut impl FnMut(Coord<f64>)) {
        match self {
            Self::Point(p) => p.coords_iter().for_each(&mut *f),
            Self::MultiPoint(mp) => mp.coords_iter().for_each(&mut *f),
            Self::LineString(ls) => ls.coords_iter().for_each(&mut *f),
            Self::MultiLineString(mls) => mls.coords_iter().for_each(&mut *f),
            Self::Polygon(poly) => poly.coords_iter().for_each(&mut *f),
            Self::MultiPolygon(mpoly) => mpoly.coords_iter().for_each(&mut *f),
            Self::GeometryCollection(children) => {
                for child in children {
                    child.for_each_coord(f);
                }
            }
        }
    }
}

/// A single feature of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// Great-circle length in kilometers (zero for non-linear kinds)
    pub fn length_km(&self) -> f64 {
        measure::length_of_geometry(&self.geometry)
    }
}

/// Information about a feature collection
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionInfo {
    /// Number of features
    pub feature_count: usize,
    /// Total number of coordinates
    pub vertex_count: usize,
    /// Sum of all line lengths in kilometers
    pub total_length_km: f64,
}

/// Ordered features in input document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Get a feature by its 0-based position
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Bounding box of all features in WGS84 degrees
    pub fn bounding_box_wgs84(&self) -> Option<Rect<f64>> {
        let mut bounds = Bounds::default();
        for feature in &self.features {
            feature.geometry.for_each_coord(&mut |c| bounds.extend(c));
        }
        bounds.into_rect()
    }

    /// Center of the bounding box as (longitude, latitude)
    pub fn center_wgs84(&self) -> Option<Coord<f64>> {
        self.bounding_box_wgs84().map(|rect| rect.center())
    }

    pub fn get_info(&self) -> CollectionInfo {
        CollectionInfo {
            feature_count: self.features.len(),
            vertex_count: self.features.iter().map(|f| f.geometry.coords_count()).sum(),
            total_length_km: self.features.iter().map(Feature::length_km).sum(),
        }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Running min/max accumulator
#[derive(Debug)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    any: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
            any: false,
        }
    }
}

impl Bounds {
    #[inline]
    fn extend(&mut self, c: Coord<f64>) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
        self.any = true;
    }

    fn into_rect(self) -> Option<Rect<f64>> {
        self.any.then(|| {
            Rect::new(
                Coord {
                    x: self.min_x,
                    y: self.min_y,
                },
                Coord {
                    x: self.max_x,
                    y: self.max_y,
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    fn create_test_collection() -> FeatureCollection {
        FeatureCollection::new(vec![
            Feature::new(Geometry::LineString(line(&[(0.0, 0.0), (0.0, 1.0)]))),
            Feature::new(Geometry::Point(Point::new(2.0, -1.0))),
            Feature::new(Geometry::Polygon(Polygon::new(
                line(&[(-1.0, 0.0), (-1.0, 0.5), (-0.5, 0.5)]),
                vec![],
            ))),
        ])
    }

    #[test]
    fn test_kind_names_match_geojson() {
        assert_eq!(GeometryKind::LineString.to_string(), "LineString");
        assert_eq!(GeometryKind::MultiLineString.name(), "MultiLineString");
        assert_eq!(GeometryKind::GeometryCollection.name(), "GeometryCollection");
    }

    #[test]
    fn test_feature_kind() {
        let collection = create_test_collection();
        let kinds: Vec<_> = collection.iter().map(Feature::kind).collect();
        assert_eq!(
            kinds,
            vec![
                GeometryKind::LineString,
                GeometryKind::Point,
                GeometryKind::Polygon
            ]
        );
    }

    #[test]
    fn test_bounding_box_empty() {
        let collection = FeatureCollection::default();
        assert!(collection.bounding_box_wgs84().is_none());
        assert!(collection.center_wgs84().is_none());
    }

    #[test]
    fn test_bounding_box_with_features() {
        let collection = create_test_collection();
        let bbox = collection.bounding_box_wgs84().unwrap();

        assert_eq!(bbox.min(), Coord { x: -1.0, y: -1.0 });
        assert_eq!(bbox.max(), Coord { x: 2.0, y: 1.0 });
    }

    #[test]
    fn test_bounding_box_of_nested_collection() {
        let collection = FeatureCollection::new(vec![Feature::new(
            Geometry::GeometryCollection(vec![
                Geometry::Point(Point::new(10.0, 20.0)),
                Geometry::GeometryCollection(vec![Geometry::Point(Point::new(12.0, 18.0))]),
            ]),
        )]);
        let bbox = collection.bounding_box_wgs84().unwrap();
        assert_eq!(bbox.min(), Coord { x: 10.0, y: 18.0 });
        assert_eq!(bbox.max(), Coord { x: 12.0, y: 20.0 });
    }

    #[test]
    fn test_center_wgs84() {
        let collection = create_test_collection();
        let center = collection.center_wgs84().unwrap();
        assert!((center.x - 0.5).abs() < 1e-12);
        assert!(center.y.abs() < 1e-12);
    }

    #[test]
    fn test_get_info() {
        let collection = create_test_collection();
        let info = collection.get_info();

        assert_eq!(info.feature_count, 3);
        // 2 line vertices + 1 point + 4 ring vertices (closed automatically)
        assert_eq!(info.vertex_count, 7);
        assert!((info.total_length_km - 111.19).abs() < 0.01);
    }

    #[test]
    fn test_collection_info_default() {
        let info = CollectionInfo::default();
        assert_eq!(info.feature_count, 0);
        assert_eq!(info.vertex_count, 0);
        assert_eq!(info.total_length_km, 0.0);
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let collection: FeatureCollection = (0..5)
            .map(|i| Feature::new(Geometry::Point(Point::new(i as f64, 0.0))))
            .collect();
        assert_eq!(collection.len(), 5);
        for (i, feature) in collection.iter().enumerate() {
            assert_eq!(feature.geometry(), &Geometry::Point(Point::new(i as f64, 0.0)));
        }
        assert!(collection.get(5).is_none());
    }
}
