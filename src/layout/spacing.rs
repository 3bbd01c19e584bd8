//! Lane and column spacing over the canvas.

use crate::error::GeometryError;

use super::config::LayoutConfig;
use super::types::Point;

/// Everything the resolver and router need to know about the canvas grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacingPlan {
    pub lane_spacing: f64,
    pub column_spacing: f64,
    /// Hot stream rows, top to bottom
    pub hot_rows: Vec<f64>,
    /// Candidate cold-stream lanes, top to bottom
    pub lane_pool: Vec<f64>,
    /// Candidate cooler columns, right to left
    pub column_pool: Vec<f64>,
    pub tower_anchor: Point,
    pub source_point: Point,
    pub sink_point: Point,
}

/// Vertical distance between stream lanes.
pub fn lane_spacing(config: &LayoutConfig, stream_count: usize) -> Result<f64, GeometryError> {
    if stream_count == 0 {
        return Err(GeometryError::NoLanes(stream_count));
    }
    let available = config.height - config.margin.top - config.margin.bottom - config.tower.height;
    if !available.is_finite() {
        return Err(GeometryError::NonFinite("height"));
    }
    if available <= 0.0 {
        return Err(GeometryError::NonPositiveExtent {
            axis: "height",
            available,
        });
    }
    Ok(available / (stream_count + 1) as f64)
}

/// Horizontal distance between cooler columns. Three extra sections stay free
/// for the source and sink connectors.
pub fn column_spacing(config: &LayoutConfig, cooler_count: usize) -> Result<f64, GeometryError> {
    if cooler_count == 0 {
        return Err(GeometryError::NoColumns(cooler_count));
    }
    let available = config.width - config.margin.left - config.margin.right - config.column_padding;
    if !available.is_finite() {
        return Err(GeometryError::NonFinite("width"));
    }
    if available <= 0.0 {
        return Err(GeometryError::NonPositiveExtent {
            axis: "width",
            available,
        });
    }
    Ok(available / (cooler_count + 3) as f64)
}

pub fn plan_spacing(
    config: &LayoutConfig,
    hot_count: usize,
    cold_count: usize,
    cooler_count: usize,
) -> Result<SpacingPlan, GeometryError> {
    config.check_finite()?;
    if cold_count == 0 {
        return Err(GeometryError::NoLanes(cold_count));
    }
    let lane_spacing = lane_spacing(config, hot_count + cold_count)?;
    let column_spacing = column_spacing(config, cooler_count)?;

    let hot_rows: Vec<f64> = (0..hot_count)
        .map(|i| config.margin.top + i as f64 * lane_spacing)
        .collect();

    // With no hot streams this sits one lane above the top margin, so the
    // first cold lane lands on the margin itself.
    let last_hot_y = config.margin.top + (hot_count as f64 - 1.0) * lane_spacing;
    let lane_pool: Vec<f64> = (0..cold_count)
        .map(|i| last_hot_y + (i + 1) as f64 * lane_spacing)
        .collect();

    let right_edge = config.width - config.margin.right;
    let column_pool: Vec<f64> = (1..=cooler_count)
        .map(|i| right_edge - i as f64 * column_spacing)
        .collect();

    let tower_anchor = Point::new(config.width / 2.0, config.height - config.margin.bottom);
    let tower_top = tower_anchor.y - config.tower.height / 2.0;
    let source_y = (last_hot_y + tower_top) / 2.0;

    Ok(SpacingPlan {
        lane_spacing,
        column_spacing,
        hot_rows,
        lane_pool,
        column_pool,
        tower_anchor,
        source_point: Point::new(right_edge, source_y),
        sink_point: Point::new(config.margin.left, source_y),
    })
}
