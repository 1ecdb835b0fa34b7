//! Walkers plugin drawing the loaded features on the map view
//!
//! Points become dots, lines become polylines and polygons are drawn as closed rings.
//! The feature selected in the detail table is drawn on top with a highlight color.

use egui::{Color32, Pos2, Shape, Stroke};
use geo::{Coord, LineString, Polygon};
use kml_viewer_lib::{FeatureCollection, Geometry};
use std::sync::Arc;
use walkers::{Plugin, Projector};

const FEATURE_COLOR: Color32 = Color32::from_rgb(70, 130, 220);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 170, 0);

/// Plugin for rendering a feature collection on the map
pub struct FeaturePlugin {
    features: Arc<FeatureCollection>,
    /// Line width in pixels
    width: f32,
    /// Index of the highlighted feature
    selected: Option<usize>,
}

impl FeaturePlugin {
    pub fn new(features: Arc<FeatureCollection>, width: f32, selected: Option<usize>) -> Self {
        Self {
            features,
            width,
            selected,
        }
    }

    fn render_geometry(
        &self,
        geometry: &Geometry,
        stroke: Stroke,
        projector: &Projector,
        painter: &egui::Painter,
    ) {
        match geometry {
            Geometry::Point(p) => render_point(p.0, stroke, projector, painter),
            Geometry::MultiPoint(mp) => {
                for p in mp.iter() {
                    render_point(p.0, stroke, projector, painter);
                }
            }
            Geometry::LineString(ls) => render_line(ls, stroke, projector, painter),
            Geometry::MultiLineString(mls) => {
                for ls in mls.iter() {
                    render_line(ls, stroke, projector, painter);
                }
            }
            Geometry::Polygon(poly) => render_polygon(poly, stroke, projector, painter),
            Geometry::MultiPolygon(mpoly) => {
                for poly in mpoly.iter() {
                    render_polygon(poly, stroke, projector, painter);
                }
            }
            Geometry::GeometryCollection(children) => {
                for child in children {
                    self.render_geometry(child, stroke, projector, painter);
                }
            }
        }
    }
}

/// Convert a WGS84 coordinate to screen space
#[inline]
fn to_screen(coord: Coord<f64>, projector: &Projector) -> Pos2 {
    let screen_vec = projector.project(walkers::lat_lon(coord.y, coord.x));
    Pos2::new(screen_vec.x, screen_vec.y)
}

fn render_point(
    coord: Coord<f64>,
    stroke: Stroke,
    projector: &Projector,
    painter: &egui::Painter,
) {
    let radius = (stroke.width * 2.0).max(3.0);
    painter.circle(
        to_screen(coord, projector),
        radius,
        stroke.color,
        Stroke::new(1.0, Color32::from_black_alpha(200)),
    );
}

fn render_line(
    line: &LineString<f64>,
    stroke: Stroke,
    projector: &Projector,
    painter: &egui::Painter,
) {
    let screen_points: Vec<Pos2> = line.0.iter().map(|c| to_screen(*c, projector)).collect();
    if screen_points.len() >= 2 {
        painter.add(Shape::line(screen_points, stroke));
    }
}

fn render_polygon(
    polygon: &Polygon<f64>,
    stroke: Stroke,
    projector: &Projector,
    painter: &egui::Painter,
) {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        let screen_points: Vec<Pos2> = ring.0.iter().map(|c| to_screen(*c, projector)).collect();
        if screen_points.len() >= 3 {
            painter.add(Shape::closed_line(screen_points, stroke));
        }
    }
}

impl Plugin for FeaturePlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("FeaturePlugin::run");

        let painter = ui.painter();
        let stroke = Stroke::new(self.width, FEATURE_COLOR);

        for (index, feature) in self.features.iter().enumerate() {
            if Some(index) != self.selected {
                self.render_geometry(feature.geometry(), stroke, projector, painter);
            }
        }

        // Highlighted feature last so it stays visible
        if let Some(feature) = self.selected.and_then(|i| self.features.get(i)) {
            let highlight = Stroke::new(self.width + 2.0, HIGHLIGHT_COLOR);
            self.render_geometry(feature.geometry(), highlight, projector, painter);
        }
    }
}
