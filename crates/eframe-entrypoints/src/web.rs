//! Web entry point for egui/eframe applications
//!
//! JavaScript constructs a [`WebHandle`] and calls `start(canvas)`. The application
//! crate registers its creator beforehand through the `eframe_app!` macro.

use std::sync::atomic::{AtomicUsize, Ordering};
use wasm_bindgen::prelude::*;

type AppCreator = fn(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>;

/// Function pointer storage for the app creator.
/// Stored as a usize so we can set it once at runtime.
static APP_CREATOR_PTR: AtomicUsize = AtomicUsize::new(0);

pub fn set_app_creator(creator: AppCreator) {
    let ptr = creator as usize;
    if let Err(existing) =
        APP_CREATOR_PTR.compare_exchange(0, ptr, Ordering::SeqCst, Ordering::SeqCst)
    {
        if existing != ptr {
            tracing::warn!("app_creator already set to a different function; ignoring");
        }
    }
}

fn get_app_creator() -> Option<AppCreator> {
    let ptr = APP_CREATOR_PTR.load(Ordering::SeqCst);
    if ptr == 0 {
        None
    } else {
        // SAFETY: only function pointers of type `AppCreator` are stored, and ptr != 0
        Some(unsafe { std::mem::transmute::<usize, AppCreator>(ptr) })
    }
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_wasm::WASMLayerConfigBuilder;

    let default_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let max_level = crate::cli::get_env::<String>("LOG_LEVEL")
        .and_then(|level| crate::logging::parse_level(&level))
        .unwrap_or(default_level);

    let mut builder = WASMLayerConfigBuilder::new();
    builder.set_max_level(max_level);
    let _ = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(builder.build()))
        .try_init();
}

/// Handle to the web app from JavaScript.
#[derive(Clone)]
#[wasm_bindgen]
pub struct WebHandle {
    runner: eframe::WebRunner,
}

#[wasm_bindgen]
impl WebHandle {
    /// Installs logging and a panic hook, then returns.
    #[allow(clippy::new_without_default)]
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Environment overrides must be known before the log level is chosen
        crate::cli::parse_env();
        init_logging();
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self {
            runner: eframe::WebRunner::new(),
        }
    }

    /// Call this once from JavaScript to start your app.
    #[wasm_bindgen]
    pub async fn start(&self, canvas: web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
        let Some(creator) = get_app_creator() else {
            return Err(JsValue::from_str("app_creator not set"));
        };

        self.runner
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |cc| Ok(creator(cc))),
            )
            .await
    }

    /// Destroys the app and frees resources.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.runner.destroy();
    }

    /// The JavaScript can check whether or not your app has crashed.
    #[wasm_bindgen]
    pub fn has_panicked(&self) -> bool {
        self.runner.has_panicked()
    }

    /// Returns the panic message if the app has panicked.
    #[wasm_bindgen]
    pub fn panic_message(&self) -> Option<String> {
        self.runner.panic_summary().map(|s| s.message())
    }

    /// Returns the panic callstack if the app has panicked.
    #[wasm_bindgen]
    pub fn panic_callstack(&self) -> Option<String> {
        self.runner.panic_summary().map(|s| s.callstack())
    }
}
