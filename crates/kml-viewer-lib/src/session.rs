//! Current document and view state
//!
//! The UI owns exactly one [`Session`]. Uploads are numbered with a monotonic sequence so a
//! completion that arrives after a newer upload started is discarded instead of
//! overwriting fresher state. The displayed projection is a single [`ViewMode`] slot, so a
//! summary and a detail table can never be shown together.

use crate::{DataError, DetailRow, FeatureCollection, SummaryResult, convert, summary};
use std::sync::Arc;

/// Identifies one upload; only the latest ticket may complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    /// Rebuild a ticket from an id carried across an async boundary
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The currently displayed projection of the loaded document
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewMode {
    #[default]
    None,
    Summary(SummaryResult),
    Detail(Vec<DetailRow>),
}

/// A successfully converted upload
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name as reported by the picker
    pub name: String,
    pub features: Arc<FeatureCollection>,
}

/// Result of completing an upload
#[derive(Debug)]
pub enum UploadOutcome {
    /// Document replaced the previous state
    Loaded { feature_count: usize },
    /// A newer upload was started, the bytes were discarded
    Stale,
    /// Conversion failed, the previous state was cleared
    Failed(DataError),
}

/// Single-slot application state
#[derive(Debug, Default)]
pub struct Session {
    /// Sequence number of the most recent upload
    latest_upload: u64,
    /// Whether the latest upload is still in flight
    loading: bool,
    document: Option<LoadedDocument>,
    view: ViewMode,
    last_error: Option<String>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload, superseding any in-flight one
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.latest_upload += 1;
        self.loading = true;
        tracing::debug!("Upload #{} started", self.latest_upload);
        UploadTicket(self.latest_upload)
    }

    /// Finish an upload with the bytes that were read
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        name: impl Into<String>,
        bytes: &[u8],
    ) -> UploadOutcome {
        let name = name.into();
        if !self.is_latest(ticket) {
            tracing::debug!(
                "Discarding stale upload #{} ({name}), latest is #{}",
                ticket.0,
                self.latest_upload
            );
            return UploadOutcome::Stale;
        }
        self.loading = false;

        match convert::parse_kml_bytes(bytes) {
            Ok(features) => {
                let feature_count = features.len();
                tracing::info!("Loaded {name}: {feature_count} features");
                self.document = Some(LoadedDocument {
                    name,
                    features: Arc::new(features),
                });
                self.view = ViewMode::None;
                self.last_error = None;
                UploadOutcome::Loaded { feature_count }
            }
            Err(e) => {
                tracing::warn!("Failed to convert {name}: {e}");
                self.document = None;
                self.view = ViewMode::None;
                self.last_error = Some(format!("{name}: {e}"));
                UploadOutcome::Failed(e)
            }
        }
    }

    /// The bytes of the latest upload could not be read; clears state like a failed conversion
    pub fn fail_upload(
        &mut self,
        ticket: UploadTicket,
        name: &str,
        error: impl std::fmt::Display,
    ) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        tracing::warn!("Failed to read {name}: {error}");
        self.loading = false;
        self.document = None;
        self.view = ViewMode::None;
        self.last_error = Some(format!("{name}: {error}"));
        true
    }

    /// The picker was dismissed without a file
    pub fn cancel_upload(&mut self, ticket: UploadTicket) {
        if self.is_latest(ticket) {
            self.loading = false;
        }
    }

    /// Show the per-kind counts; no-op without a loaded document
    pub fn show_summary(&mut self) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        self.view = ViewMode::Summary(summary::summarize(&document.features));
        true
    }

    /// Show the per-feature rows; no-op without a loaded document
    pub fn show_details(&mut self) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        self.view = ViewMode::Detail(summary::detail(&document.features));
        true
    }

    /// Drop the document, the view and any error
    pub fn clear(&mut self) {
        self.document = None;
        self.view = ViewMode::None;
        self.last_error = None;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    #[inline]
    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    #[inline]
    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    #[inline]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[inline]
    fn is_latest(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.latest_upload
    }
}
