//! Error types raised by a layout invocation.
//!
//! Every error is returned to the caller as-is; the engine never produces a
//! partial layout.

use crate::ir::ValidationError;
use thiserror::Error;

/// The stream graph cannot be laid out as described.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("No cooling-water stream is fed by the cooling tower")]
    NoTowerSource,
    #[error("Destination cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("Stream {stream} sends water to {cooler}, but no stream starts there")]
    DanglingDestination { stream: String, cooler: String },
    #[error("Stream {0} cannot be reached from the cooling tower")]
    Unreachable(String),
    #[error("No free column left for cooler {cooler}")]
    ColumnsExhausted { cooler: String },
    #[error("No free column left of x={reference_x} for cooler {cooler}")]
    NoColumnLeftOf { cooler: String, reference_x: f64 },
    #[error("No free lane left for stream {0}")]
    LanesExhausted(String),
}

/// Numbers that cannot produce a drawable layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Stream {0} passes no cooler, so it has no end point")]
    EmptyStream(String),
    #[error("Cannot space {0} lanes")]
    NoLanes(usize),
    #[error("Cannot space {0} columns")]
    NoColumns(usize),
    #[error("Layout setting {0} is not finite")]
    NonFinite(&'static str),
    #[error("Available {axis} is {available}, must be positive")]
    NonPositiveExtent { axis: &'static str, available: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
    #[error("Degenerate geometry: {0}")]
    Geometry(#[from] GeometryError),
}

/// Errors of the JSON-in, JSON-out entry points.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
