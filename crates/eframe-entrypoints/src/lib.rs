//! Cross-platform entry points for egui/eframe applications
//!
//! This crate provides reusable entry points for native (desktop) and web platforms,
//! along with utilities for CLI parsing, logging, async file picking and metadata display.
//!
//! # Usage
//!
//! In your application's `lib.rs`, use the `eframe_app!` macro to define all entry points:
//!
//! ```ignore
//! eframe_entrypoints::eframe_app!(
//!     "My App Name",
//!     |cc| Box::new(MyApp::new(cc))
//! );
//! ```
//!
//! This generates:
//! - Web: `create_egui_app` plus a `#[wasm_bindgen(start)]` hook registering it
//! - Native: `run_native()` function to call from `main.rs`
//!
//! In your `main.rs`:
//!
//! ```ignore
//! fn main() -> std::io::Result<()> {
//!     my_app::run_native()
//! }
//! ```

pub mod async_runtime;
pub mod cli;
pub mod file_picker;
pub mod logging;

// Re-export commonly used types
pub use cli::{get_env, parse_args};
pub use file_picker::{PickerEvent, drain_events, open_file_picker};

mod metadata;
pub use metadata::{log_version_info, short_version_info};

#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebHandle;

// Re-export eframe types commonly needed for app creation
pub use eframe;
pub use eframe::CreationContext;
#[doc(hidden)]
pub use tokio;

/// Unified macro to define all platform entry points for an eframe application.
///
/// # Arguments
///
/// * `$app_name` - A string literal with the application name (used for window title, logging, etc.)
/// * `$app_creator` - A closure that takes `&CreationContext` and returns `Box<dyn eframe::App>`
///
/// # Generated Code
///
/// For **Web (WASM)** targets, generates:
/// ```ignore
/// pub fn create_egui_app(cc: &eframe::CreationContext<'_>) -> Box<dyn eframe::App> { ... }
/// #[wasm_bindgen(start)]
/// pub fn register_egui_app() { ... }
/// ```
///
/// For **native** targets, generates:
/// ```ignore
/// pub fn run_native() -> std::io::Result<()> { ... }  // Call this from main.rs
/// ```
///
/// The web hook needs `wasm-bindgen` as a direct dependency of the application crate.
#[macro_export]
macro_rules! eframe_app {
    ($app_name:expr, $app_creator:expr) => {
        // ==========================================
        // Web (WASM) entry point
        // ==========================================
        #[cfg(target_arch = "wasm32")]
        pub fn create_egui_app(
            cc: &$crate::eframe::CreationContext<'_>,
        ) -> Box<dyn $crate::eframe::App> {
            let creator: fn(&$crate::eframe::CreationContext<'_>) -> Box<dyn $crate::eframe::App> =
                $app_creator;
            creator(cc)
        }

        /// Registers the app creator before JavaScript constructs a `WebHandle`.
        #[cfg(target_arch = "wasm32")]
        #[::wasm_bindgen::prelude::wasm_bindgen(start)]
        pub fn register_egui_app() {
            $crate::web::set_app_creator(create_egui_app);
        }

        // ==========================================
        // Native entry point (called from main.rs)
        // ==========================================
        /// Run the application on native (desktop) platforms.
        #[cfg(not(target_arch = "wasm32"))]
        pub fn run_native() -> std::io::Result<()> {
            let rt = $crate::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            rt.block_on(async {
                $crate::native_main_impl($app_name, $app_creator).await;
            });
            Ok(())
        }
    };
}

/// Internal implementation for native (desktop) entry point.
/// Use the `eframe_app!` macro instead of calling this directly.
#[cfg(not(target_arch = "wasm32"))]
#[doc(hidden)]
pub async fn native_main_impl(
    app_name: &str,
    app_creator: impl FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>,
) {
    // Must run before any other logging
    logging::setup_logging();

    log_version_info(app_name);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(app_name)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        app_name,
        native_options,
        Box::new(move |cc| Ok(app_creator(cc))),
    ) {
        tracing::error!("{app_name} exited with an error: {e}");
    }
}
