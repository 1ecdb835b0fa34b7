//! Cross-platform async file picker
//!
//! [`open_file_picker`] shows the `rfd` async dialog on both native and web targets and
//! reads the chosen file into memory off the UI thread. Results are pushed as
//! [`PickerEvent`]s into a shared queue (`once_cell::sync::Lazy` + `Mutex`) that the UI
//! drains once per frame with [`drain_events`].
//!
//! Every event carries the `request` id given by the caller, so a UI that started
//! several requests can tell which completion belongs to which one.

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Completion of a file request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// A file was chosen and read
    Picked {
        request: u64,
        name: String,
        bytes: Vec<u8>,
    },
    /// The file could not be read
    Failed {
        request: u64,
        name: String,
        error: String,
    },
    /// The dialog was dismissed without a selection
    Cancelled { request: u64 },
}

static QUEUE: Lazy<Mutex<Vec<PickerEvent>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Push an event for the UI to pick up, e.g. bytes of a file dropped on the window
pub fn enqueue(event: PickerEvent) {
    let mut guard = match QUEUE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("File picker queue mutex poisoned; recovering");
            poisoned.into_inner()
        }
    };
    guard.push(event);
}

/// Drain the shared queue and return all pending events in completion order.
pub fn drain_events() -> Vec<PickerEvent> {
    let mut guard = match QUEUE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.drain(..).collect()
}

/// Show the file picker for the given extensions (without dot, e.g. `["kml"]`).
///
/// Returns immediately; the outcome arrives as a [`PickerEvent`] tagged with `request`.
pub fn open_file_picker(request: u64, filter_name: &str, extensions: &[&str]) {
    let filter_name = filter_name.to_string();
    let extensions: Vec<String> = extensions.iter().map(|e| e.to_string()).collect();

    crate::async_runtime::spawn(async move {
        let mut dialog = rfd::AsyncFileDialog::new();
        if !extensions.is_empty() {
            dialog = dialog.add_filter(filter_name, &extensions);
        }

        let event = match dialog.pick_file().await {
            Some(handle) => {
                let name = handle.file_name();
                let bytes = handle.read().await;
                tracing::debug!("Picked {name} ({} bytes) for request #{request}", bytes.len());
                PickerEvent::Picked {
                    request,
                    name,
                    bytes,
                }
            }
            None => {
                tracing::debug!("File picker for request #{request} was cancelled");
                PickerEvent::Cancelled { request }
            }
        };
        enqueue(event);
    });
}

/// Read a file from disk without blocking the UI thread (native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn read_file(request: u64, path: std::path::PathBuf) {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    crate::async_runtime::spawn(async move {
        let event = match tokio::fs::read(&path).await {
            Ok(bytes) => PickerEvent::Picked {
                request,
                name,
                bytes,
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                PickerEvent::Failed {
                    request,
                    name,
                    error: e.to_string(),
                }
            }
        };
        enqueue(event);
    });
}
