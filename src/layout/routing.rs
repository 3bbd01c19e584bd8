//! Connector routing and waypoint generation.

use crate::ir::NetworkIR;
use std::collections::HashSet;
use tracing::debug;

use super::config::LayoutConfig;
use super::resolver::ResolvedStreams;
use super::spacing::SpacingPlan;
use super::types::{Connector, HotRow, Placement, Point, StreamLayout};

/// Drop consecutive duplicate points so zero-length segments never reach the renderer.
fn polyline(points: impl IntoIterator<Item = Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::new();
    for p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Supply pipe: tower to the right canvas edge, then along the edge to the source anchor.
pub fn route_tower_supply(plan: &SpacingPlan, config: &LayoutConfig) -> [Connector; 2] {
    let tower = plan.tower_anchor;
    let port_y = tower.y - config.tower.height / 2.0 + config.tower_port_drop;
    let edge = Point::new(plan.source_point.x, port_y);

    [
        Connector::flow(polyline([
            Point::new(tower.x + config.tower.width / 2.0, port_y),
            edge,
        ])),
        Connector::flow(polyline([edge, plan.source_point])),
    ]
}

/// Source anchor down (or up) to a tower-fed lane, then left to the stream start.
pub fn route_source_to_stream(source: Point, start: Point) -> Connector {
    Connector::flow(polyline([source, Point::new(source.x, start.y), start]))
}

/// The stream's own lane segment.
pub fn route_stream_line(layout: &StreamLayout) -> Connector {
    Connector::flow(polyline([layout.start_point, layout.end_point]))
}

/// Parent end to child start: horizontal first, then vertical.
pub fn route_stream_link(from_end: Point, to_start: Point) -> Connector {
    Connector::flow(polyline([
        from_end,
        Point::new(to_start.x, from_end.y),
        to_start,
    ]))
}

/// Stream end to the sink anchor: horizontal first, then vertical.
pub fn route_stream_to_sink(end: Point, sink: Point) -> Connector {
    Connector::flow(polyline([end, Point::new(sink.x, end.y), sink]))
}

/// Return pipe: sink anchor down to the tower base line, then into the tower's left face.
pub fn route_sink_to_tower(plan: &SpacingPlan, config: &LayoutConfig) -> Connector {
    let sink = plan.sink_point;
    let tower = plan.tower_anchor;
    Connector::flow(polyline([
        sink,
        Point::new(sink.x, tower.y),
        Point::new(tower.x - config.tower.width / 2.0, tower.y),
    ]))
}

/// Dashed link from a cooler on a cold lane up to the same cooler on its hot row.
pub fn route_cooler_link(node: &Placement, hot_y: f64) -> Connector {
    Connector::dashed(vec![Point::new(node.x, node.y), Point::new(node.x, hot_y)])
}

/// Hot stream rows, with each cooler drawn at its resolved column.
pub fn build_hot_rows(
    ir: &NetworkIR,
    plan: &SpacingPlan,
    resolved: &ResolvedStreams,
    config: &LayoutConfig,
) -> Vec<HotRow> {
    ir.hot_streams
        .iter()
        .zip(&plan.hot_rows)
        .map(|(stream, &y)| HotRow {
            name: stream.name.clone(),
            y,
            start_x: config.margin.left,
            end_x: config.width - config.margin.right,
            inlet_temp: stream.inlet_temp,
            outlet_temp: stream.outlet_temp,
            coolers: stream
                .coolers
                .iter()
                .filter_map(|name| {
                    resolved.columns.get(name).map(|&x| Placement {
                        name: name.clone(),
                        x,
                        y,
                    })
                })
                .collect(),
        })
        .collect()
}

/// Route every connector of the schematic, in draw order.
pub fn route_connectors(
    ir: &NetworkIR,
    plan: &SpacingPlan,
    resolved: &ResolvedStreams,
    config: &LayoutConfig,
) -> Vec<Connector> {
    let mut connectors: Vec<Connector> = route_tower_supply(plan, config).into();

    for name in &resolved.order {
        let (Some(stream), Some(layout)) = (ir.cold_stream(name), resolved.streams.get(name)) else {
            continue;
        };

        if stream.is_initial() {
            connectors.push(route_source_to_stream(plan.source_point, layout.start_point));
        }
        connectors.push(route_stream_line(layout));

        let mut linked = HashSet::new();
        for cooler in stream.destination_coolers() {
            let Some(next) = ir.find_stream_starting_at(cooler) else {
                continue;
            };
            if !linked.insert(next.name.as_str()) {
                continue;
            }
            if let Some(next_layout) = resolved.streams.get(&next.name) {
                connectors.push(route_stream_link(layout.end_point, next_layout.start_point));
            }
        }
        if stream.returns_to_tower() {
            connectors.push(route_stream_to_sink(layout.end_point, plan.sink_point));
        }
    }

    connectors.push(route_sink_to_tower(plan, config));

    for name in &resolved.order {
        let Some(layout) = resolved.streams.get(name) else {
            continue;
        };
        for node in &layout.nodes {
            if let Some((row, _)) = ir.hot_stream_through(&node.name) {
                connectors.push(route_cooler_link(node, plan.hot_rows[row]));
            }
        }
    }

    debug!(connectors = connectors.len(), "routed connectors");
    connectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{ArrowAt, ConnectorKind, Direction};

    #[test]
    fn test_polyline_drops_repeats() {
        let pts = polyline([
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
        ]);
        assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
    }

    #[test]
    fn test_stream_link_horizontal_then_vertical() {
        let link = route_stream_link(Point::new(500.0, 300.0), Point::new(480.0, 200.0));
        assert_eq!(
            link.points,
            vec![
                Point::new(500.0, 300.0),
                Point::new(480.0, 300.0),
                Point::new(480.0, 200.0),
            ]
        );
        assert_eq!(link.arrow_direction(), Direction::Up);
        assert_eq!(link.arrow_at, Some(ArrowAt::End));
    }

    #[test]
    fn test_stream_link_same_lane_points_left() {
        let link = route_stream_link(Point::new(500.0, 300.0), Point::new(480.0, 300.0));
        assert_eq!(link.points.len(), 2);
        assert_eq!(link.arrow_direction(), Direction::Left);
    }

    #[test]
    fn test_sink_and_return() {
        let config = LayoutConfig::default();
        let plan = crate::layout::spacing::plan_spacing(&config, 1, 1, 1).unwrap();

        let to_sink = route_stream_to_sink(Point::new(400.0, 180.0), plan.sink_point);
        assert_eq!(to_sink.points[1], Point::new(100.0, 180.0));
        assert_eq!(to_sink.arrow_direction(), Direction::Down);

        let back = route_sink_to_tower(&plan, &config);
        assert_eq!(back.points.last(), Some(&Point::new(570.0, 650.0)));
        assert_eq!(back.arrow_direction(), Direction::Right);
    }

    #[test]
    fn test_tower_supply() {
        let config = LayoutConfig::default();
        let plan = crate::layout::spacing::plan_spacing(&config, 1, 1, 1).unwrap();
        let [out, up] = route_tower_supply(&plan, &config);

        assert_eq!(out.points, vec![Point::new(630.0, 620.0), Point::new(1000.0, 620.0)]);
        assert_eq!(out.arrow_direction(), Direction::Right);
        assert_eq!(up.points.last(), Some(&plan.source_point));
        assert_eq!(up.arrow_direction(), Direction::Up);
    }

    #[test]
    fn test_cooler_link_is_dashed() {
        let node = Placement {
            name: "E1".into(),
            x: 700.0,
            y: 310.0,
        };
        let link = route_cooler_link(&node, 50.0);
        assert_eq!(link.kind, ConnectorKind::Dashed);
        assert_eq!(link.arrow_at, None);
        assert_eq!(link.points, vec![Point::new(700.0, 310.0), Point::new(700.0, 50.0)]);
    }
}
