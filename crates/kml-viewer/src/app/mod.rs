//! Application module
//!
//! This module provides the main application structure:
//! - Full-screen map view with the loaded features
//! - Toggleable sidebar with tabs (Document and Settings)
//! - Summary and detail tables for the loaded KML document
//! - Drag-and-drop support for KML files
//! - Responsive layout (sidebar from bottom on portrait displays)

mod plugin;
pub(crate) mod settings;
mod state;
mod ui_panels;

use crate::app::plugin::FeaturePlugin;
use crate::app::settings::Settings;
use crate::app::state::{AppState, TilesProvider, UiSettings};
use eframe::egui;
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, OpenStreetMap, TileSource},
};

const PERSISTED_SETTINGS_KEY: &str = "persisted_settings";

/// Custom OpenTopoMap tile source
pub struct OpenTopoMap;

impl TileSource for OpenTopoMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.opentopomap.org/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenTopoMap (CC-BY-SA)",
            url: "https://opentopomap.org/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        17 // OpenTopoMap has max zoom of 17
    }
}

/// CARTO dark basemap
pub struct CartoDark;

impl TileSource for CartoDark {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://a.basemaps.cartocdn.com/dark_all/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        20
    }
}

/// Persisted settings (UI only, documents are never stored)
#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedSettings {
    ui: UiSettings,
}

/// Main application structure
pub struct KmlViewerApp {
    /// Application state (session, UI settings, etc.)
    state: AppState,

    /// Map tiles provider (OpenStreetMap)
    tiles_osm: HttpTiles,

    /// Map tiles provider (CARTO Dark)
    tiles_carto: HttpTiles,

    /// Map tiles provider (OpenTopoMap)
    tiles_otm: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Show help overlay
    show_help: bool,
}

impl KmlViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let cli_args = Settings::from_cli();

        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut state = match cc.storage {
            Some(storage) if !cli_args.ignore_persisted => {
                Self::load_persisted_settings(storage, &cli_args)
            }
            _ => {
                if cli_args.ignore_persisted {
                    tracing::info!("Ignoring persisted state (--ignore-persisted flag)");
                }
                AppState::new(&cli_args)
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &cli_args.kml_file {
            state.load_path(path.clone());
        }
        #[cfg(target_arch = "wasm32")]
        if cli_args.kml_file.is_some() {
            tracing::warn!("--kml-file is ignored on web, use the file picker instead");
        }

        // Create tiles providers
        let tiles_osm = HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone());
        let tiles_carto = HttpTiles::new(CartoDark, cc.egui_ctx.clone());
        let tiles_otm = HttpTiles::new(OpenTopoMap, cc.egui_ctx.clone());

        let mut map_memory = MapMemory::default();
        let _ = map_memory.set_zoom(2.0);

        Self {
            state,
            tiles_osm,
            tiles_carto,
            tiles_otm,
            map_memory,
            show_help: false,
        }
    }

    /// Load persisted settings from storage; CLI flags that were given win
    fn load_persisted_settings(storage: &dyn eframe::Storage, cli_args: &Settings) -> AppState {
        if let Some(json) = storage.get_string(PERSISTED_SETTINGS_KEY)
            && !json.is_empty()
            && let Ok(settings) = serde_json::from_str::<PersistedSettings>(&json)
        {
            tracing::info!("Restored UI settings");
            let mut ui = settings.ui;
            ui.apply_cli(cli_args);
            return AppState::with_ui_settings(ui);
        }

        tracing::info!("No persisted settings found, starting fresh");
        AppState::new(cli_args)
    }

    /// Fit the map view to the bounding box of the loaded document
    fn fit_to_bounds(&mut self) {
        let Some(document) = self.state.session.document() else {
            return;
        };

        if let (Some(rect), Some(center)) = (
            document.features.bounding_box_wgs84(),
            document.features.center_wgs84(),
        ) {
            let max_span = rect.width().abs().max(rect.height().abs());

            let zoom = if max_span > 0.0 {
                let zoom_estimate = (4.0 * 360.0 / max_span).log2();
                (zoom_estimate - 0.5).clamp(1.0, 18.0)
            } else {
                12.0
            };

            self.map_memory.center_at(walkers::lat_lon(center.y, center.x));
            let _ = self.map_memory.set_zoom(zoom);

            tracing::trace!(
                "Auto-zoomed to bounds: ({:.4}, {:.4}) - ({:.4}, {:.4}), zoom: {:.1}",
                rect.min().y,
                rect.min().x,
                rect.max().y,
                rect.max().x,
                zoom
            );
        }
    }
}

#[profiling::all_functions]
impl eframe::App for KmlViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if i.key_pressed(egui::Key::H) && i.modifiers.ctrl {
                self.show_help = !self.show_help;
            }
        });

        // Apply completed file reads
        if self.state.process_picker_events() {
            ctx.request_repaint();
        }
        if self.state.session.is_loading() {
            // Reads complete off the UI thread, keep polling the queue
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Auto-zoom to fit a freshly loaded document or on request
        if self.state.pending_fit_bounds {
            self.state.pending_fit_bounds = false;
            self.fit_to_bounds();
        }

        // Handle drag and drop
        ui_panels::handle_drag_and_drop(ctx, &mut self.state);

        // Show help overlay if enabled
        if self.show_help {
            ui_panels::help_overlay(ctx, &mut self.show_help);
        }

        // Render the main sidebar (responsive: side or bottom based on orientation)
        ui_panels::render_sidebar(ctx, &mut self.state);

        let line_width = self.state.ui_settings.line_width;
        let selected = self.state.selected_feature;
        let tiles_provider = self.state.ui_settings.tiles_provider;
        let features = self
            .state
            .session
            .document()
            .map(|document| document.features.clone());

        // Central panel: Map view (full screen)
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let tiles: &mut HttpTiles = match tiles_provider {
                    TilesProvider::OpenStreetMap => &mut self.tiles_osm,
                    TilesProvider::CartoDark => &mut self.tiles_carto,
                    TilesProvider::OpenTopoMap => &mut self.tiles_otm,
                };

                let mut map = Map::new(
                    Some(tiles),
                    &mut self.map_memory,
                    walkers::lat_lon(0.0, 0.0),
                );
                if let Some(features) = features {
                    map = map.with_plugin(FeaturePlugin::new(features, line_width, selected));
                }

                ui.add(map);

                ui_panels::sidebar_toggle_button(ui, &mut self.state);

                let painter = ui.painter();
                let screen_rect = ui.max_rect();
                painter.text(
                    screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                    egui::Align2::CENTER_BOTTOM,
                    tiles_provider.attribution(),
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_white_alpha(180),
                );
            });

        // Fit requested from the sidebar during this frame
        if self.state.pending_fit_bounds && self.state.session.document().is_some() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            ui: self.state.ui_settings.clone(),
        };

        match serde_json::to_string(&settings) {
            Ok(json) => {
                storage.set_string(PERSISTED_SETTINGS_KEY, json);
                tracing::debug!("Saved settings");
            }
            Err(e) => tracing::warn!("Failed to save settings: {e}"),
        }
    }
}
