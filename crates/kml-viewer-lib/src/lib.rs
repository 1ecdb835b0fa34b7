//! KML Viewer Library - Core Data Structures for KML Geometry Summaries
//!
//! This library converts KML documents into an ordered feature collection and derives
//! display-ready projections from it: a per-type count summary and per-feature line
//! lengths measured along great circles.
//!
//! # Architecture
//!
//! - **[`FeatureCollection`]**: Ordered, immutable features produced by one upload
//! - **[`Geometry`]**: Closed tagged union of the supported geometry kinds
//! - **[`convert`]**: KML text to [`FeatureCollection`] conversion
//! - **[`measure`]**: Great-circle length of polylines
//! - **[`summary`]**: Type counts and per-feature detail rows
//! - **[`Session`]**: The single current document / view slot driven by the UI
//!
//! # Accuracy
//!
//! Lengths treat the Earth as a sphere with a mean radius of 6371 km
//! ([`measure::EARTH_RADIUS_M`]). Expect errors up to ~0.5% against geodesic distances.

pub mod convert;
mod geometry;
pub mod measure;
mod session;
pub mod summary;

#[cfg(feature = "serde")]
pub mod geojson;

// Public API exports
pub use convert::{parse_kml, parse_kml_bytes};
pub use geometry::{CollectionInfo, Feature, FeatureCollection, Geometry, GeometryKind};
pub use measure::{length_of_geometry, length_of_line};
pub use session::{LoadedDocument, Session, UploadOutcome, UploadTicket, ViewMode};
pub use summary::{DetailRow, SummaryResult, detail, summarize};

/// Error types for the data module
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("KML parsing error: {0}")]
    KmlParse(#[from] kml::Error),

    #[error("Document contains no supported geometry")]
    EmptyDocument,

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
