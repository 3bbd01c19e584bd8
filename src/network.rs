//! Network description as supplied by the host application.
//!
//! This is the raw, unvalidated input. [`crate::ir::NetworkIR`] is built from it
//! and is what the layout engine actually consumes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire marker for the cooling tower in `sources` / `destinations`.
pub const TOWER: &str = "TOWER";

/// Tower label written by older hosts.
const TOWER_LEGACY: &str = "冷却塔";

/// Where a cooling-water stream comes from or goes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Tower,
    Cooler(String),
}

impl Endpoint {
    pub fn parse(s: &str) -> Self {
        match s {
            TOWER | TOWER_LEGACY => Self::Tower,
            name => Self::Cooler(name.to_string()),
        }
    }

    pub fn is_tower(&self) -> bool {
        matches!(self, Self::Tower)
    }

    /// Cooler name, or `None` for the tower.
    pub fn cooler(&self) -> Option<&str> {
        match self {
            Self::Tower => None,
            Self::Cooler(name) => Some(name),
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Tower => serializer.serialize_str(TOWER),
            Self::Cooler(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescription {
    #[serde(default)]
    pub hot_flows: Vec<HotFlow>,
    #[serde(default)]
    pub cool_flows: Vec<CoolFlow>,
    /// Explicit cooler table. When empty, the coolers named by hot flows are
    /// taken as the equipment set.
    #[serde(default)]
    pub coolers: Vec<Cooler>,
}

impl NetworkDescription {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// A process stream that rejects heat through a sequence of coolers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotFlow {
    pub name: String,
    pub inlet_temp: f64,
    pub outlet_temp: f64,
    /// Mass flow times heat capacity, kJ/(°C·h).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f64>,
    #[serde(default)]
    pub coolers: Vec<String>,
}

impl HotFlow {
    pub fn new(name: &str, inlet_temp: f64, outlet_temp: f64, coolers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            inlet_temp,
            outlet_temp,
            mcp: None,
            flow_rate: None,
            coolers: coolers.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_mcp(mut self, mcp: f64) -> Self {
        self.mcp = Some(mcp);
        self
    }
}

/// A cooling-water circuit segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolFlow {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<Endpoint>,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub destinations: Vec<Endpoint>,
}

impl CoolFlow {
    /// Build a flow from plain names; `TOWER` marks the tower.
    pub fn new(name: &str, sources: &[&str], path: &[&str], destinations: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            sources: sources.iter().map(|s| Endpoint::parse(s)).collect(),
            path: path.iter().map(|p| p.to_string()).collect(),
            destinations: destinations.iter().map(|d| Endpoint::parse(d)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cooler {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_temp: Option<f64>,
    /// Placement in the 3D scene; carried through, not used by the 2D layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position3>,
}

impl Cooler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            in_temp: None,
            out_temp: None,
            position: None,
        }
    }

    pub fn with_temps(mut self, in_temp: f64, out_temp: f64) -> Self {
        self.in_temp = Some(in_temp);
        self.out_temp = Some(out_temp);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
