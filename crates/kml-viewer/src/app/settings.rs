use crate::app::state::TilesProvider;
use clap::Parser;
use eframe_entrypoints::parse_args;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// KML Viewer - Inspect the geometry of a KML file on a map
pub struct Settings {
    /// KML file to load on startup (native only)
    #[clap(short, long, value_name = "FILE")]
    pub kml_file: Option<PathBuf>,

    /// Feature line width in pixels (overrides the persisted value)
    #[clap(long)]
    pub line_width: Option<f32>,

    /// Map tiles provider (overrides the persisted choice)
    #[clap(long, value_enum)]
    pub tiles: Option<TilesProvider>,

    /// Ignore previously persisted state and start fresh
    #[clap(long, default_value = "false")]
    pub ignore_persisted: bool,
}

impl Settings {
    /// Parse settings from argv (native) or GET parameters (web)
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                e.exit();
                #[cfg(target_arch = "wasm32")]
                {
                    let user_msg = format!(
                        "Error parsing CLI:\n{e}\n
    You should change the GET params, using the cli prefix.\n
    Starting anyway without args."
                    );
                    if let Some(window) = web_sys::window() {
                        window.alert_with_message(&user_msg).unwrap_or(());
                    } else {
                        tracing::error!(user_msg);
                    }
                    Settings::parse_from(["kml-viewer"]) // Default args on web if parsing fails
                }
            }
        }
    }
}
