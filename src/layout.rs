//! 2D schematic layout of a cooling-water network.
//!
//! Phases run in order, each a pure function of the network and the config:
//! spacing, cold-stream topology, then hot rows and connector routing.

mod config;
mod engine;
mod resolver;
mod routing;
mod spacing;
mod types;

pub use config::{BoxSize, LayoutConfig, Margin};
pub use engine::LayoutEngine;
pub use resolver::{ResolvedStreams, nearest, nearest_left, resolve_streams};
pub use routing::{build_hot_rows, route_connectors};
pub use spacing::{SpacingPlan, column_spacing, lane_spacing, plan_spacing};
pub use types::{
    ArrowAt, Connector, ConnectorKind, Direction, HotRow, LayoutResult, Placement, Point,
    StreamLayout,
};
