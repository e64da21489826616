#![forbid(unsafe_code)]

//! Writers for a scanned floor plan: CSV report, annotated SVG, Konva and Fabric scene JSON.
//!
//! All writers share one object identifier scheme, `{category-slug}-{index}`, so rows in the
//! report line up with groups on either canvas.

pub mod annotate;
pub mod color;
pub mod fabric;
pub mod konva;
pub mod report;
pub mod scene;

pub use annotate::write_annotated_svg;
pub use color::normalize_color;
pub use fabric::{FabricDocument, fabric_document};
pub use konva::{KonvaDocument, konva_document};
pub use report::{Report, build_report};

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn to_json_string(value: &impl Serialize, pretty: bool) -> Result<String> {
    let mut s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    s.push('\n');
    tracing::debug!(bytes = s.len(), pretty, "serialized JSON");
    Ok(s)
}
