//! Layout engine core implementation.

use crate::error::LayoutError;
use crate::ir::NetworkIR;
use tracing::debug;

use super::config::LayoutConfig;
use super::resolver::resolve_streams;
use super::routing::{build_hot_rows, route_connectors};
use super::spacing::plan_spacing;
use super::types::LayoutResult;

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute layout for the given network.
    pub fn layout(&self, ir: &NetworkIR) -> Result<LayoutResult, LayoutError> {
        // Phase 1: Spacing
        let cooler_count = ir.all_equipment_nodes().len();
        let plan = plan_spacing(
            &self.config,
            ir.hot_streams.len(),
            ir.cold_streams.len(),
            cooler_count,
        )?;
        debug!(
            lane_spacing = plan.lane_spacing,
            column_spacing = plan.column_spacing,
            coolers = cooler_count,
            "planned spacing"
        );

        // Phase 2: Cold-stream topology
        let resolved = resolve_streams(ir, &plan, &self.config)?;

        // Phase 3: Hot rows and connectors
        let hot_rows = build_hot_rows(ir, &plan, &resolved, &self.config);
        let connectors = route_connectors(ir, &plan, &resolved, &self.config);

        Ok(LayoutResult {
            tower_anchor: plan.tower_anchor,
            source_point: plan.source_point,
            sink_point: plan.sink_point,
            lane_spacing: plan.lane_spacing,
            column_spacing: plan.column_spacing,
            columns: resolved.columns,
            hot_rows,
            streams: resolved.streams,
            draw_order: resolved.order,
            connectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::ConnectorKind;
    use crate::network::{CoolFlow, HotFlow, NetworkDescription};

    fn network() -> NetworkIR {
        let desc = NetworkDescription {
            hot_flows: vec![
                HotFlow::new("H1", 120.0, 60.0, &["E1", "E2"]),
                HotFlow::new("H2", 95.0, 45.0, &["E3"]),
            ],
            cool_flows: vec![
                CoolFlow::new("W1", &["TOWER"], &["E1", "E2"], &["E3"]),
                CoolFlow::new("W2", &["E3"], &[], &["TOWER"]),
            ],
            coolers: vec![],
        };
        NetworkIR::from_description(&desc).unwrap()
    }

    #[test]
    fn test_basic_layout() {
        let layout = LayoutEngine::default().layout(&network()).unwrap();

        assert_eq!(layout.streams.len(), 2);
        assert_eq!(layout.columns.len(), 3);
        assert_eq!(layout.hot_rows.len(), 2);
        assert_eq!(layout.draw_order, vec!["W1", "W2"]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let engine = LayoutEngine::default();
        let ir = network();
        assert_eq!(engine.layout(&ir).unwrap(), engine.layout(&ir).unwrap());
    }

    #[test]
    fn test_layout_connectors() {
        let layout = LayoutEngine::default().layout(&network()).unwrap();

        // supply x2, source->W1, W1 line, W1->W2, W2 line, W2->sink, sink->tower
        let flows = layout
            .connectors
            .iter()
            .filter(|c| c.kind == ConnectorKind::Flow)
            .count();
        assert_eq!(flows, 8);

        // One dashed link per cooler appearance that a hot stream passes through.
        let dashed = layout
            .connectors
            .iter()
            .filter(|c| c.kind == ConnectorKind::Dashed)
            .count();
        assert_eq!(dashed, 3);
    }

    #[test]
    fn test_hot_rows_use_cooler_columns() {
        let layout = LayoutEngine::default().layout(&network()).unwrap();
        let h1 = &layout.hot_rows[0];

        assert_eq!(h1.y, 50.0);
        assert_eq!(h1.coolers.len(), 2);
        assert_eq!(h1.coolers[0].x, layout.columns["E1"]);
        assert_eq!(h1.coolers[1].x, layout.columns["E2"]);
        assert_eq!(layout.hot_rows[1].y, 50.0 + layout.lane_spacing);
    }

    #[test]
    fn test_custom_canvas() {
        let config = LayoutConfig::default().with_canvas(1600.0, 1000.0);
        let layout = LayoutEngine::new(config).layout(&network()).unwrap();
        assert_eq!(layout.tower_anchor.x, 800.0);
        assert_eq!(layout.source_point.x, 1400.0);
    }
}
