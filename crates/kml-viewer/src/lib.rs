//! KML Viewer - Application Library
//!
//! Integrates the KML data model from `kml-viewer-lib` with the cross-platform entry
//! points to build the map viewer application.

mod app;

pub use app::KmlViewerApp;

// Define all platform entry points using the unified macro
eframe_entrypoints::eframe_app!("KML Viewer", |cc| Box::new(KmlViewerApp::new(cc)));
