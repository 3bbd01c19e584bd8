//! Data structures for layout computation.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One appearance of a cooler on a lane or hot row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A cooling-water stream resolved onto its lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLayout {
    pub start_point: Point,
    pub end_point: Point,
    pub lane_y: f64,
    pub nodes: Vec<Placement>,
}

/// A hot stream drawn as a horizontal row across the top block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotRow {
    pub name: String,
    pub y: f64,
    pub start_x: f64,
    pub end_x: f64,
    pub inlet_temp: f64,
    pub outlet_temp: f64,
    pub coolers: Vec<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Water flow; solid line.
    Flow,
    /// Same cooler seen on a hot row and a cold lane; no flow.
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowAt {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A routed polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub points: Vec<Point>,
    pub arrow_at: Option<ArrowAt>,
    pub kind: ConnectorKind,
}

impl Connector {
    pub fn flow(points: Vec<Point>) -> Self {
        Self {
            points,
            arrow_at: Some(ArrowAt::End),
            kind: ConnectorKind::Flow,
        }
    }

    pub fn dashed(points: Vec<Point>) -> Self {
        Self {
            points,
            arrow_at: None,
            kind: ConnectorKind::Dashed,
        }
    }

    /// Direction the arrowhead points, derived from the final segment.
    ///
    /// Vertical movement wins over horizontal; a path with fewer than two
    /// distinct trailing points points right.
    pub fn arrow_direction(&self) -> Direction {
        let [.., prev, last] = self.points.as_slice() else {
            return Direction::Right;
        };
        if last.y > prev.y {
            Direction::Down
        } else if last.y < prev.y {
            Direction::Up
        } else if last.x < prev.x {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// The complete layout result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub tower_anchor: Point,
    pub source_point: Point,
    pub sink_point: Point,
    pub lane_spacing: f64,
    pub column_spacing: f64,
    /// Cooler name -> column X
    pub columns: BTreeMap<String, f64>,
    pub hot_rows: Vec<HotRow>,
    pub streams: BTreeMap<String, StreamLayout>,
    /// Stream names in the order the resolver reached them
    pub draw_order: Vec<String>,
    pub connectors: Vec<Connector>,
}

impl LayoutResult {
    pub fn stream(&self, name: &str) -> Option<&StreamLayout> {
        self.streams.get(name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
