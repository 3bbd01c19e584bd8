//! Canvas bounds and drawing constants the layout depends on.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 200.0,
            bottom: 150.0,
            left: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

/// Layout configuration. Every field has a default, so partial JSON is accepted.
///
/// A downstream stream starts `cooler.width / 2 + end_gap + branch_offset`
/// left of its parent's last cooler (45px with defaults). When the column
/// spacing drops below that distance, which happens past about 16 coolers on
/// the default 1200px canvas, the free column next to the parent's last cooler
/// sits right of the child's start and is skipped, and the layout fails with
/// `TopologyError::NoColumnLeftOf` while columns remain. Widen the canvas or
/// shrink these three values for dense networks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub tower: BoxSize,
    pub cooler: BoxSize,
    /// Width trimmed from the column area before dividing it.
    pub column_padding: f64,
    /// Gap between a stream's end point and the face of its last cooler.
    pub end_gap: f64,
    /// How far left of the parent's end point a downstream stream starts.
    pub branch_offset: f64,
    /// How far left of the source anchor a tower-fed stream starts.
    pub source_inset: f64,
    /// Supply pipe height below the tower's top face.
    pub tower_port_drop: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: Margin::default(),
            tower: BoxSize {
                width: 60.0,
                height: 80.0,
            },
            cooler: BoxSize {
                width: 30.0,
                height: 20.0,
            },
            column_padding: 10.0,
            end_gap: 10.0,
            branch_offset: 20.0,
            source_inset: 10.0,
            tower_port_drop: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn check_finite(&self) -> Result<(), GeometryError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
            ("tower.width", self.tower.width),
            ("tower.height", self.tower.height),
            ("cooler.width", self.cooler.width),
            ("cooler.height", self.cooler.height),
            ("columnPadding", self.column_padding),
            ("endGap", self.end_gap),
            ("branchOffset", self.branch_offset),
            ("sourceInset", self.source_inset),
            ("towerPortDrop", self.tower_port_drop),
        ];
        match fields.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(GeometryError::NonFinite(name)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = LayoutConfig::from_json(r#"{ "width": 1600, "margin": { "top": 80 } }"#).unwrap();
        assert_eq!(config.width, 1600.0);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.margin.top, 80.0);
        assert_eq!(config.margin.right, 200.0);
        assert_eq!(config.branch_offset, 20.0);
    }

    #[test]
    fn test_check_finite() {
        assert_eq!(LayoutConfig::default().check_finite(), Ok(()));

        let config = LayoutConfig {
            end_gap: f64::INFINITY,
            ..LayoutConfig::default()
        };
        assert_eq!(config.check_finite(), Err(GeometryError::NonFinite("endGap")));
    }
}
