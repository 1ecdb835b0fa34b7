//! Display-ready projections of a feature collection
//!
//! - [`summarize`] counts features per geometry kind
//! - [`detail`] lists every feature with its 1-based position and length

use crate::{FeatureCollection, GeometryKind};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feature counts per geometry kind, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryResult {
    counts: Vec<(GeometryKind, usize)>,
}

impl SummaryResult {
    /// Count one more feature of the given kind
    fn increment(&mut self, kind: GeometryKind) {
        match self.counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((kind, 1)),
        }
    }

    /// Number of features of a kind (0 if absent)
    pub fn get(&self, kind: GeometryKind) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, count)| *count)
    }

    /// Iterate (kind, count) pairs in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (GeometryKind, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Number of distinct kinds
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// One row of the detail table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetailRow {
    /// 1-based position in the collection
    pub index: usize,
    pub kind: GeometryKind,
    /// Great-circle length in kilometers
    pub length_km: f64,
}

impl DetailRow {
    /// Length with two decimals and unit, e.g. `"12.34 km"`
    pub fn length_label(&self) -> String {
        format!("{:.2} km", self.length_km)
    }
}

/// Count features per geometry kind
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn summarize(collection: &FeatureCollection) -> SummaryResult {
    let mut summary = SummaryResult::default();
    for feature in collection {
        summary.increment(feature.kind());
    }
    summary
}

/// Per-feature rows with kind and length, in collection order
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn detail(collection: &FeatureCollection) -> Vec<DetailRow> {
    collection
        .iter()
        .enumerate()
        .map(|(i, feature)| DetailRow {
            index: i + 1,
            kind: feature.kind(),
            length_km: feature.length_km(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Feature, Geometry};
    use geo::{LineString, MultiLineString, Point, Polygon};

    fn line_feature(coords: Vec<(f64, f64)>) -> Feature {
        Feature::new(Geometry::LineString(LineString::from(coords)))
    }

    fn point_feature(x: f64, y: f64) -> Feature {
        Feature::new(Geometry::Point(Point::new(x, y)))
    }

    fn create_test_collection() -> FeatureCollection {
        FeatureCollection::new(vec![
            line_feature(vec![(0.0, 0.0), (0.0, 1.0)]),
            line_feature(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            point_feature(3.0, 4.0),
        ])
    }

    #[test]
    fn test_summarize_counts_by_kind() {
        let summary = summarize(&create_test_collection());

        assert_eq!(summary.get(GeometryKind::LineString), 2);
        assert_eq!(summary.get(GeometryKind::Point), 1);
        assert_eq!(summary.get(GeometryKind::Polygon), 0);
        assert_eq!(summary.len(), 2);
    }

    #[test]
    fn test_summarize_first_occurrence_order() {
        let collection = FeatureCollection::new(vec![
            point_feature(0.0, 0.0),
            line_feature(vec![(0.0, 0.0), (0.0, 1.0)]),
            point_feature(1.0, 1.0),
            Feature::new(Geometry::Polygon(Polygon::new(
                LineString::from(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
                vec![],
            ))),
        ]);
        let entries: Vec<_> = summarize(&collection).iter().collect();

        assert_eq!(
            entries,
            vec![
                (GeometryKind::Point, 2),
                (GeometryKind::LineString, 1),
                (GeometryKind::Polygon, 1),
            ]
        );
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&FeatureCollection::default());
        assert!(summary.is_empty());
        assert_eq!(summary.get(GeometryKind::Point), 0);
    }

    #[test]
    fn test_detail_rows() {
        let rows = detail(&create_test_collection());

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(rows[0].kind, GeometryKind::LineString);
        assert_eq!(rows[0].length_label(), "111.19 km");
        assert_eq!(rows[1].kind, GeometryKind::LineString);
        assert_eq!(rows[1].length_label(), "222.39 km");
        assert_eq!(rows[2].kind, GeometryKind::Point);
        assert_eq!(rows[2].length_label(), "0.00 km");
    }

    #[test]
    fn test_detail_multi_line_string() {
        let geometry = Geometry::MultiLineString(MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.0), (0.0, 1.0)]),
            LineString::from(vec![(0.0, 1.0), (0.0, 2.0)]),
        ]));
        let rows = detail(&FeatureCollection::new(vec![Feature::new(geometry)]));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, GeometryKind::MultiLineString);
        assert_eq!(rows[0].length_label(), "222.39 km");
    }

    #[test]
    fn test_detail_empty() {
        assert!(detail(&FeatureCollection::default()).is_empty());
    }

    #[test]
    fn test_length_label_rounding() {
        let row = DetailRow {
            index: 1,
            kind: GeometryKind::LineString,
            length_km: 1.005_1,
        };
        assert_eq!(row.length_label(), "1.01 km");
    }
}
