//! UI panels for the application
//!
//! This module provides the sidebar with its tabs, the summary and detail tables,
//! the help overlay and drag-and-drop support.

use crate::app::state::{
    AppState, SidebarTab, TilesProvider, format_distance, format_number_with_commas,
};
use egui::{Color32, RichText, Ui};
use kml_viewer_lib::{DetailRow, SummaryResult, ViewMode};

/// Render the sidebar toggle button (overlaid on top-right of map)
pub fn sidebar_toggle_button(ui: &mut Ui, state: &mut AppState) {
    let button_size = egui::vec2(40.0, 40.0);
    let margin = 10.0;

    // Position button in top-right corner
    let rect = ui.max_rect();
    let button_pos = rect.right_top() + egui::vec2(-button_size.x - margin, margin);
    let button_rect = egui::Rect::from_min_size(button_pos, button_size);

    let response = ui.allocate_rect(button_rect, egui::Sense::click());

    if response.clicked() {
        state.ui_settings.sidebar_open = !state.ui_settings.sidebar_open;
    }

    let bg_color = if response.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };

    ui.painter().rect_filled(button_rect, 5.0, bg_color);

    let icon = if state.ui_settings.sidebar_open {
        "✕"
    } else {
        "☰"
    };

    ui.painter().text(
        button_rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(20.0),
        ui.visuals().text_color(),
    );
}

/// Render the main sidebar (responsive: side on landscape, bottom on portrait)
pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    if !state.ui_settings.sidebar_open {
        return;
    }

    let screen_size = ctx.viewport_rect().size();
    let is_portrait = screen_size.y > screen_size.x;

    if is_portrait {
        egui::TopBottomPanel::bottom("main_sidebar")
            .default_height(300.0)
            .min_height(180.0)
            .max_height(ctx.viewport_rect().height() * 0.6)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    } else {
        egui::SidePanel::right("main_sidebar")
            .default_width(320.0)
            .min_width(260.0)
            .max_width(480.0)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    }
}

/// Render the sidebar content (shared between portrait and landscape)
fn render_sidebar_content(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.selectable_value(
            &mut state.ui_settings.active_tab,
            SidebarTab::Document,
            "📂 Document",
        );
        ui.selectable_value(
            &mut state.ui_settings.active_tab,
            SidebarTab::Settings,
            "⚙ Settings",
        );
    });

    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| match state.ui_settings.active_tab {
            SidebarTab::Document => render_document_tab(ui, state),
            SidebarTab::Settings => render_settings_tab(ui, state),
        });
}

/// Render the Document tab
fn render_document_tab(ui: &mut Ui, state: &mut AppState) {
    let has_document = state.session.document().is_some();

    ui.horizontal_wrapped(|ui| {
        if ui.button("📂 Load KML File...").clicked() {
            state.request_upload();
        }
        if ui
            .add_enabled(has_document, egui::Button::new("📊 Summary"))
            .clicked()
        {
            state.show_summary();
        }
        if ui
            .add_enabled(has_document, egui::Button::new("📏 Details"))
            .clicked()
        {
            state.show_details();
        }
    });
    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(has_document, egui::Button::new("🎯 Fit to Bounds"))
            .clicked()
        {
            state.pending_fit_bounds = true;
        }
        if ui
            .add_enabled(has_document, egui::Button::new("📋 Copy GeoJSON"))
            .clicked()
            && let Some(text) = state.geojson_text()
        {
            ui.ctx().copy_text(text);
            tracing::info!("Copied GeoJSON to clipboard");
        }
        if ui
            .add_enabled(has_document, egui::Button::new("🗑 Clear"))
            .clicked()
        {
            state.clear_document();
        }
    });

    ui.add_space(8.0);

    if state.session.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                RichText::new("Loading file...")
                    .strong()
                    .color(ui.visuals().warn_fg_color),
            );
        });
        ui.add_space(8.0);
    }

    if let Some(error) = state.session.last_error().map(str::to_owned) {
        ui.separator();
        ui.label(RichText::new("⚠ Error").strong().color(Color32::RED));
        ui.label(RichText::new(error).small().color(Color32::RED));
        if ui.small_button("Dismiss").clicked() {
            state.session.clear_error();
        }
        ui.add_space(8.0);
    }

    ui.separator();

    let Some(name) = state.session.document().map(|d| d.name.clone()) else {
        ui.label(
            RichText::new("No document loaded. Pick a .kml file or drop one on the window.")
                .weak(),
        );
        return;
    };

    ui.label(RichText::new(format!("📄 {name}")).strong());
    ui.add_space(4.0);
    render_stats_section(ui, state);

    ui.add_space(8.0);
    ui.separator();

    let mut clicked_row = None;
    match state.session.view() {
        ViewMode::None => {
            ui.label(
                RichText::new("Choose Summary or Details to inspect the features.").weak(),
            );
        }
        ViewMode::Summary(summary) => render_summary_table(ui, summary),
        ViewMode::Detail(rows) => {
            clicked_row = render_detail_table(ui, rows, state.selected_feature);
        }
    }
    if let Some(index) = clicked_row {
        state.select_row(index);
    }
}

/// Render statistics section (used in Document tab)
fn render_stats_section(ui: &mut Ui, state: &AppState) {
    egui::Grid::new("stats_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Features:");
            ui.label(RichText::new(format_number_with_commas(state.stats.feature_count)).strong());
            ui.end_row();

            ui.label("Vertices:");
            ui.label(RichText::new(format_number_with_commas(state.stats.vertex_count)).strong());
            ui.end_row();

            ui.label("Line length:");
            ui.label(RichText::new(format_distance(state.stats.total_length_km)).strong());
            ui.end_row();
        });
}

/// Two-column table: element type and count
fn render_summary_table(ui: &mut Ui, summary: &SummaryResult) {
    ui.label(RichText::new("Summary").strong());
    ui.add_space(4.0);

    egui::Grid::new("summary_table")
        .num_columns(2)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Element Type").strong());
            ui.label(RichText::new("Count").strong());
            ui.end_row();

            for (kind, count) in summary.iter() {
                ui.label(kind.name());
                ui.label(count.to_string());
                ui.end_row();
            }
        });
}

/// Three-column table: position, element type and length
///
/// Returns the 0-based feature index of a clicked row.
fn render_detail_table(
    ui: &mut Ui,
    rows: &[DetailRow],
    selected: Option<usize>,
) -> Option<usize> {
    ui.label(RichText::new("Details").strong());
    ui.label(
        RichText::new("Click a row to highlight the feature on the map")
            .small()
            .weak(),
    );
    ui.add_space(4.0);

    let mut clicked = None;
    egui::Grid::new("detail_table")
        .num_columns(3)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.label(RichText::new("#").strong());
            ui.label(RichText::new("Element Type").strong());
            ui.label(RichText::new("Total Length").strong());
            ui.end_row();

            for row in rows {
                let feature_index = row.index - 1;
                let is_selected = selected == Some(feature_index);
                if ui
                    .selectable_label(is_selected, row.index.to_string())
                    .clicked()
                {
                    clicked = Some(feature_index);
                }
                ui.label(row.kind.name());
                ui.label(row.length_label());
                ui.end_row();
            }
        });
    clicked
}

/// Render the Settings tab
fn render_settings_tab(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🎨 Feature Appearance").strong());
    ui.add_space(6.0);

    egui::Grid::new("appearance_grid")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Line Width:");
            ui.add(
                egui::Slider::new(&mut state.ui_settings.line_width, 0.5..=8.0)
                    .suffix(" px")
                    .step_by(0.5),
            );
            ui.end_row();
        });

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("🗺 Map Tiles").strong());
    ui.add_space(6.0);

    for provider in TilesProvider::all() {
        let selected = state.ui_settings.tiles_provider == *provider;
        if ui.selectable_label(selected, provider.name()).clicked() {
            state.ui_settings.tiles_provider = *provider;
        }
    }

    ui.add_space(4.0);
    ui.label(
        RichText::new(state.ui_settings.tiles_provider.attribution())
            .small()
            .italics()
            .weak(),
    );

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("ℹ About").strong());
    ui.add_space(4.0);
    ui.label(RichText::new(eframe_entrypoints::short_version_info("KML Viewer")).small());
    ui.label(
        RichText::new("Lengths are great-circle distances on a 6371 km sphere")
            .small()
            .weak(),
    );
    ui.add_space(4.0);
    ui.label(RichText::new("Keyboard shortcuts:").small());
    ui.label(RichText::new("  F1 / Ctrl+H - Toggle help").small().weak());
    egui::warn_if_debug_build(ui);
}

/// Help overlay
pub fn help_overlay(ctx: &egui::Context, show_help: &mut bool) {
    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading("KML Viewer");
            ui.add_space(8.0);

            ui.label("Inspect the geometry of a KML file on a map.");
            ui.add_space(12.0);

            ui.label(RichText::new("Loading a Document").strong());
            ui.label("• Click 'Load KML File...' in the sidebar");
            ui.label("• Or drag and drop a KML file onto the window");
            ui.label("• A new file replaces the current document");
            ui.add_space(8.0);

            ui.label(RichText::new("Inspecting").strong());
            ui.label("• 'Summary' counts the features per element type");
            ui.label("• 'Details' lists every feature with its length");
            ui.label("• Click a detail row to highlight it on the map");
            ui.add_space(8.0);

            ui.label(RichText::new("Navigation").strong());
            ui.label("• Scroll or pinch to zoom, drag to pan");
            ui.label("• 'Fit to Bounds' to see the whole document");
            ui.add_space(8.0);

            ui.label(RichText::new("Keyboard Shortcuts").strong());
            ui.label("• F1 or Ctrl+H - Toggle this help");
            ui.add_space(12.0);

            if ui.button("Close").clicked() {
                *show_help = false;
            }
        });
}

/// Whether a dropped file looks like KML
fn is_kml_file(file: &egui::DroppedFile) -> bool {
    let name = match &file.path {
        Some(path) => path.to_string_lossy().to_string(),
        None => file.name.clone(),
    };
    name.to_lowercase().ends_with(".kml")
}

/// Handle drag and drop of KML files
pub fn handle_drag_and_drop(ctx: &egui::Context, state: &mut AppState) {
    // Only read input state inside ctx.input
    let hovered_files = ctx.input(|i| !i.raw.hovered_files.is_empty());
    let dropped_files: Vec<_> = ctx.input(|i| i.raw.dropped_files.clone());

    if hovered_files {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drop_preview"),
        ));
        let screen_rect = ctx.content_rect();
        let bg_size = egui::vec2(340.0, 80.0);
        let bg_rect = egui::Rect::from_center_size(screen_rect.center(), bg_size);
        painter.rect_filled(bg_rect, 16.0, egui::Color32::from_black_alpha(180));
        painter.text(
            screen_rect.center(),
            egui::Align2::CENTER_CENTER,
            "📂 Drop a KML file here",
            egui::FontId::proportional(32.0),
            egui::Color32::WHITE,
        );
    }

    // Only one document is shown at a time, so the last KML file wins
    match dropped_files.iter().rev().find(|f| is_kml_file(f)) {
        Some(file) => state.load_dropped(file),
        None if !dropped_files.is_empty() => {
            tracing::warn!("Ignoring dropped files without .kml extension");
        }
        None => {}
    }
}
