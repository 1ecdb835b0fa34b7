#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    kml_viewer::run_native()
}

// Web builds start through `WebHandle` instead
#[cfg(target_arch = "wasm32")]
fn main() {}
