//! Application state management
//!
//! This module owns the document session, UI settings and the bookkeeping that connects
//! asynchronous file reads to the session.

use crate::app::settings::Settings;
use eframe_entrypoints::PickerEvent;
use kml_viewer_lib::{CollectionInfo, Session, UploadOutcome, UploadTicket, ViewMode, geojson};
use serde::{Deserialize, Serialize};

/// Main application state
pub struct AppState {
    /// Loaded document and the currently shown view
    pub session: Session,

    /// Current UI settings
    pub ui_settings: UiSettings,

    /// Statistics about the loaded document
    pub stats: CollectionInfo,

    /// Fit the map to the document on the next frame
    pub pending_fit_bounds: bool,

    /// Detail row highlighted on the map (0-based feature index)
    pub selected_feature: Option<usize>,
}

/// UI-specific settings that can be adjusted at runtime
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Feature line width in pixels
    pub line_width: f32,

    /// Map tiles provider
    pub tiles_provider: TilesProvider,

    /// Whether sidebar is open
    pub sidebar_open: bool,

    /// Current active tab in sidebar
    pub active_tab: SidebarTab,
}

/// Sidebar tabs
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SidebarTab {
    #[default]
    Document,
    Settings,
}

/// Available map tile providers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum TilesProvider {
    OpenStreetMap,
    #[default]
    CartoDark,
    OpenTopoMap,
}

impl TilesProvider {
    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::CartoDark => "© OpenStreetMap contributors © CARTO",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OpenStreetMap, Self::CartoDark, Self::OpenTopoMap]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::CartoDark => "CARTO Dark",
            Self::OpenTopoMap => "OpenTopoMap",
        }
    }
}

impl AppState {
    /// Create new application state from CLI settings
    pub fn new(settings: &Settings) -> Self {
        let mut ui_settings = UiSettings::default();
        ui_settings.apply_cli(settings);
        Self::with_ui_settings(ui_settings)
    }

    pub fn with_ui_settings(ui_settings: UiSettings) -> Self {
        Self {
            session: Session::new(),
            ui_settings,
            stats: CollectionInfo::default(),
            pending_fit_bounds: false,
            selected_feature: None,
        }
    }

    /// Open the file picker for a new upload, superseding any in-flight one
    pub fn request_upload(&mut self) {
        let ticket = self.session.begin_upload();
        eframe_entrypoints::open_file_picker(ticket.id(), "KML files", &["kml"]);
    }

    /// Read a KML file from disk as a new upload
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_path(&mut self, path: std::path::PathBuf) {
        tracing::info!("Loading {}", path.display());
        let ticket = self.session.begin_upload();
        eframe_entrypoints::file_picker::read_file(ticket.id(), path);
    }

    /// Start an upload from a file dropped on the window
    pub fn load_dropped(&mut self, file: &egui::DroppedFile) {
        if let Some(bytes) = &file.bytes {
            // Web provides the content directly
            let ticket = self.session.begin_upload();
            eframe_entrypoints::file_picker::enqueue(PickerEvent::Picked {
                request: ticket.id(),
                name: file.name.clone(),
                bytes: bytes.to_vec(),
            });
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            self.load_path(path.clone());
            return;
        }

        tracing::warn!("Dropped file {:?} has neither bytes nor path", file.name);
    }

    /// Apply all completed file reads; returns true if anything changed
    pub fn process_picker_events(&mut self) -> bool {
        let events = eframe_entrypoints::drain_events();
        let changed = !events.is_empty();
        for event in events {
            self.handle_event(event);
        }
        changed
    }

    /// Apply one completed file read to the session
    pub fn handle_event(&mut self, event: PickerEvent) {
        profiling::scope!("handle_picker_event");

        match event {
            PickerEvent::Picked {
                request,
                name,
                bytes,
            } => {
                let ticket = UploadTicket::from_id(request);
                match self.session.complete_upload(ticket, name, &bytes) {
                    UploadOutcome::Loaded { .. } => {
                        self.pending_fit_bounds = true;
                        self.selected_feature = None;
                        self.update_stats();
                    }
                    UploadOutcome::Failed(_) => {
                        self.selected_feature = None;
                        self.update_stats();
                    }
                    UploadOutcome::Stale => {}
                }
            }
            PickerEvent::Failed {
                request,
                name,
                error,
            } => {
                if self
                    .session
                    .fail_upload(UploadTicket::from_id(request), &name, error)
                {
                    self.selected_feature = None;
                    self.update_stats();
                }
            }
            PickerEvent::Cancelled { request } => {
                self.session.cancel_upload(UploadTicket::from_id(request));
            }
        }
    }

    /// Show the per-type counts
    pub fn show_summary(&mut self) {
        if self.session.show_summary() {
            self.selected_feature = None;
        }
    }

    /// Show the per-feature detail table
    pub fn show_details(&mut self) {
        self.session.show_details();
    }

    /// Toggle the highlighted feature of a detail row
    pub fn select_row(&mut self, feature_index: usize) {
        if self.selected_feature == Some(feature_index) {
            self.selected_feature = None;
        } else {
            self.selected_feature = Some(feature_index);
        }
    }

    /// Whether the detail table is the current view
    pub fn showing_details(&self) -> bool {
        matches!(self.session.view(), ViewMode::Detail(_))
    }

    /// Drop the loaded document
    pub fn clear_document(&mut self) {
        self.session.clear();
        self.selected_feature = None;
        self.stats = CollectionInfo::default();
    }

    /// GeoJSON text of the loaded document
    pub fn geojson_text(&self) -> Option<String> {
        let document = self.session.document()?;
        match geojson::to_geojson_string(&document.features, true) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to serialize GeoJSON: {e}");
                None
            }
        }
    }

    /// Update statistics from the loaded document
    pub fn update_stats(&mut self) {
        profiling::scope!("update_stats");

        self.stats = self
            .session
            .document()
            .map(|document| document.features.get_info())
            .unwrap_or_default();
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            tiles_provider: TilesProvider::default(),
            sidebar_open: true,
            active_tab: SidebarTab::Document,
        }
    }
}

impl UiSettings {
    /// Override with the flags given on the command line, absent flags keep the current value
    pub fn apply_cli(&mut self, settings: &Settings) {
        if let Some(line_width) = settings.line_width {
            self.line_width = line_width;
        }
        if let Some(tiles) = settings.tiles {
            self.tiles_provider = tiles;
        }
    }
}

/// Format a distance in kilometers as human-readable string
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{km:.2} km")
    } else {
        format!("{km:.0} km")
    }
}

/// Helper to format numbers with comma separators
pub fn format_number_with_commas(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use kml_viewer_lib::GeometryKind;

    const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <Placemark><LineString><coordinates>0,0 0,1</coordinates></LineString></Placemark>
  <Placemark><Point><coordinates>3,4</coordinates></Point></Placemark>
</Document></kml>"#;

    fn create_state() -> AppState {
        AppState::new(&Settings::try_parse_from(["kml-viewer"]).unwrap())
    }

    fn picked(request: u64, bytes: &[u8]) -> PickerEvent {
        PickerEvent::Picked {
            request,
            name: "test.kml".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_new_state_from_settings() {
        let settings = Settings::try_parse_from([
            "kml-viewer",
            "--line-width",
            "5",
            "--tiles",
            "open-street-map",
        ])
        .unwrap();
        let state = AppState::new(&settings);

        assert_eq!(state.ui_settings.line_width, 5.0);
        assert_eq!(state.ui_settings.tiles_provider, TilesProvider::OpenStreetMap);
        assert_eq!(create_state().ui_settings.tiles_provider, TilesProvider::CartoDark);
    }

    #[test]
    fn test_picked_event_loads_document() {
        let mut state = create_state();
        let ticket = state.session.begin_upload();
        state.handle_event(picked(ticket.id(), KML.as_bytes()));

        assert!(state.pending_fit_bounds);
        assert_eq!(state.stats.feature_count, 2);
        assert_eq!(state.stats.vertex_count, 3);
        assert_eq!(format_distance(state.stats.total_length_km), "111 km");
        assert!(state.geojson_text().unwrap().contains("\"LineString\""));
    }

    #[test]
    fn test_stale_event_is_ignored() {
        let mut state = create_state();
        let first = state.session.begin_upload();
        let _second = state.session.begin_upload();
        state.handle_event(picked(first.id(), KML.as_bytes()));

        assert!(state.session.document().is_none());
        assert!(state.session.is_loading());
        assert!(!state.pending_fit_bounds);
    }

    #[test]
    fn test_failed_events_clear_document() {
        let mut state = create_state();
        let ticket = state.session.begin_upload();
        state.handle_event(picked(ticket.id(), KML.as_bytes()));
        state.show_details();
        state.select_row(0);

        let ticket = state.session.begin_upload();
        state.handle_event(picked(ticket.id(), b"<html></html>"));
        assert!(state.session.document().is_none());
        assert!(state.session.last_error().is_some());
        assert_eq!(state.stats, CollectionInfo::default());
        assert_eq!(state.selected_feature, None);

        let ticket = state.session.begin_upload();
        state.handle_event(PickerEvent::Failed {
            request: ticket.id(),
            name: "gone.kml".to_string(),
            error: "not found".to_string(),
        });
        assert_eq!(state.session.last_error(), Some("gone.kml: not found"));
    }

    #[test]
    fn test_cancel_keeps_document() {
        let mut state = create_state();
        let ticket = state.session.begin_upload();
        state.handle_event(picked(ticket.id(), KML.as_bytes()));

        let ticket = state.session.begin_upload();
        state.handle_event(PickerEvent::Cancelled {
            request: ticket.id(),
        });
        assert!(!state.session.is_loading());
        assert_eq!(state.stats.feature_count, 2);
    }

    #[test]
    fn test_views_and_selection() {
        let mut state = create_state();
        state.show_summary();
        assert_eq!(state.session.view(), &ViewMode::None);

        let ticket = state.session.begin_upload();
        state.handle_event(picked(ticket.id(), KML.as_bytes()));

        state.show_details();
        assert!(state.showing_details());
        state.select_row(1);
        assert_eq!(state.selected_feature, Some(1));
        state.select_row(1);
        assert_eq!(state.selected_feature, None);
        state.select_row(0);

        state.show_summary();
        assert!(!state.showing_details());
        assert_eq!(state.selected_feature, None);
        match state.session.view() {
            ViewMode::Summary(summary) => assert_eq!(summary.get(GeometryKind::Point), 1),
            other => panic!("expected summary view, got {other:?}"),
        }

        state.clear_document();
        assert!(state.session.document().is_none());
        assert!(state.geojson_text().is_none());
    }

    #[test]
    fn test_ui_settings_persistence_roundtrip() {
        let settings = UiSettings {
            line_width: 3.5,
            tiles_provider: TilesProvider::OpenTopoMap,
            sidebar_open: false,
            active_tab: SidebarTab::Settings,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<UiSettings>(&json).unwrap(), settings);

        // Missing fields fall back to defaults
        let partial: UiSettings = serde_json::from_str(r#"{"line_width": 1.0}"#).unwrap();
        assert_eq!(partial.tiles_provider, TilesProvider::CartoDark);
        assert!(partial.sidebar_open);
    }

    #[test]
    fn test_stats_formatting() {
        assert_eq!(format_number_with_commas(1234), "1,234");
        assert_eq!(format_number_with_commas(1_234_567), "1,234,567");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_distance(0.25), "250 m");
        assert_eq!(format_distance(42.123), "42.12 km");
        assert_eq!(format_distance(1234.4), "1234 km");
    }

    #[test]
    fn test_cli_flags_override_persisted_settings() {
        let persisted = UiSettings {
            line_width: 4.0,
            tiles_provider: TilesProvider::OpenTopoMap,
            ..Default::default()
        };

        // An explicit flag wins even when it equals the default
        let settings =
            Settings::try_parse_from(["kml-viewer", "--line-width", "2.0"]).unwrap();
        let mut ui = persisted.clone();
        ui.apply_cli(&settings);
        assert_eq!(ui.line_width, 2.0);
        assert_eq!(ui.tiles_provider, TilesProvider::OpenTopoMap);

        // Absent flags keep the persisted values
        let mut ui = persisted.clone();
        ui.apply_cli(&Settings::try_parse_from(["kml-viewer"]).unwrap());
        assert_eq!(ui, persisted);
    }
}
