use crate::network::{Endpoint, NetworkDescription};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty {0} name")]
    EmptyName(&'static str),
    #[error("Duplicate cooler: {0}")]
    DuplicateCooler(String),
    #[error("Duplicate stream: {0}")]
    DuplicateStream(String),
    #[error("Stream {stream} references unknown cooler {cooler}")]
    UnknownCooler { stream: String, cooler: String },
    #[error("Stream {0} has no sources")]
    NoSources(String),
    #[error("Stream {0} has no destinations")]
    NoDestinations(String),
    #[error("Stream {0} lists the cooling tower inside its path")]
    TowerInPath(String),
    #[error("Cooler {cooler} is a source of both {first} and {second}")]
    SharedSource {
        cooler: String,
        first: String,
        second: String,
    },
    #[error("Non-finite {field} on {owner}")]
    NonFinite { owner: String, field: &'static str },
}

/// Validated network: every name resolves, every number is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkIR {
    pub coolers: Vec<CoolerNode>,
    pub hot_streams: Vec<HotStream>,
    pub cold_streams: Vec<ColdStream>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoolerNode {
    pub name: String,
    pub in_temp: Option<f64>,
    pub out_temp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotStream {
    pub name: String,
    pub inlet_temp: f64,
    pub outlet_temp: f64,
    pub mcp: Option<f64>,
    pub flow_rate: Option<f64>,
    pub coolers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColdStream {
    pub name: String,
    pub sources: Vec<Endpoint>,
    pub path: Vec<String>,
    pub destinations: Vec<Endpoint>,
}

impl ColdStream {
    /// Fed directly by the cooling tower.
    pub fn is_initial(&self) -> bool {
        self.sources.iter().any(Endpoint::is_tower)
    }

    pub fn returns_to_tower(&self) -> bool {
        self.destinations.iter().any(Endpoint::is_tower)
    }

    /// Coolers on this stream's lane: source coolers then path, first occurrence wins.
    pub fn coolers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .filter_map(Endpoint::cooler)
            .chain(self.path.iter().map(String::as_str))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn destination_coolers(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().filter_map(Endpoint::cooler)
    }

    fn has_destination(&self, cooler: &str) -> bool {
        self.destination_coolers().any(|d| d == cooler)
    }
}

impl NetworkIR {
    pub fn from_description(desc: &NetworkDescription) -> Result<Self, ValidationError> {
        let coolers = collect_coolers(desc)?;
        let known: HashSet<&str> = coolers.iter().map(|c| c.name.as_str()).collect();

        let mut hot_names = HashSet::new();
        let mut hot_streams = Vec::with_capacity(desc.hot_flows.len());
        for flow in &desc.hot_flows {
            if flow.name.is_empty() {
                return Err(ValidationError::EmptyName("hot stream"));
            }
            if !hot_names.insert(flow.name.as_str()) {
                return Err(ValidationError::DuplicateStream(flow.name.clone()));
            }
            check_finite(&flow.name, "inletTemp", Some(flow.inlet_temp))?;
            check_finite(&flow.name, "outletTemp", Some(flow.outlet_temp))?;
            check_finite(&flow.name, "mcp", flow.mcp)?;
            check_finite(&flow.name, "flowRate", flow.flow_rate)?;
            for cooler in &flow.coolers {
                if !known.contains(cooler.as_str()) {
                    return Err(ValidationError::UnknownCooler {
                        stream: flow.name.clone(),
                        cooler: cooler.clone(),
                    });
                }
            }
            hot_streams.push(HotStream {
                name: flow.name.clone(),
                inlet_temp: flow.inlet_temp,
                outlet_temp: flow.outlet_temp,
                mcp: flow.mcp,
                flow_rate: flow.flow_rate,
                coolers: flow.coolers.clone(),
            });
        }

        let mut cold_names = HashSet::new();
        let mut source_owner: HashMap<&str, &str> = HashMap::new();
        let mut cold_streams = Vec::with_capacity(desc.cool_flows.len());
        for flow in &desc.cool_flows {
            if flow.name.is_empty() {
                return Err(ValidationError::EmptyName("cooling-water stream"));
            }
            if !cold_names.insert(flow.name.as_str()) {
                return Err(ValidationError::DuplicateStream(flow.name.clone()));
            }
            if flow.sources.is_empty() {
                return Err(ValidationError::NoSources(flow.name.clone()));
            }
            if flow.destinations.is_empty() {
                return Err(ValidationError::NoDestinations(flow.name.clone()));
            }
            if flow.path.iter().any(|p| Endpoint::parse(p).is_tower()) {
                return Err(ValidationError::TowerInPath(flow.name.clone()));
            }

            let referenced = flow
                .sources
                .iter()
                .chain(flow.destinations.iter())
                .filter_map(Endpoint::cooler)
                .chain(flow.path.iter().map(String::as_str));
            for cooler in referenced {
                if !known.contains(cooler) {
                    return Err(ValidationError::UnknownCooler {
                        stream: flow.name.clone(),
                        cooler: cooler.to_string(),
                    });
                }
            }

            for cooler in flow.sources.iter().filter_map(Endpoint::cooler) {
                if let Some(first) = source_owner.insert(cooler, flow.name.as_str()) {
                    if first != flow.name {
                        return Err(ValidationError::SharedSource {
                            cooler: cooler.to_string(),
                            first: first.to_string(),
                            second: flow.name.clone(),
                        });
                    }
                }
            }

            cold_streams.push(ColdStream {
                name: flow.name.clone(),
                sources: flow.sources.clone(),
                path: flow.path.clone(),
                destinations: flow.destinations.clone(),
            });
        }

        Ok(NetworkIR {
            coolers,
            hot_streams,
            cold_streams,
        })
    }

    pub fn cooler(&self, name: &str) -> Option<&CoolerNode> {
        self.coolers.iter().find(|c| c.name == name)
    }

    pub fn cold_stream(&self, name: &str) -> Option<&ColdStream> {
        self.cold_streams.iter().find(|s| s.name == name)
    }

    /// The cold stream whose sources include `cooler`.
    pub fn find_stream_starting_at(&self, cooler: &str) -> Option<&ColdStream> {
        self.cold_streams
            .iter()
            .find(|s| s.sources.iter().any(|e| e.cooler() == Some(cooler)))
    }

    /// Other cold streams with at least one destination cooler in common with `stream`.
    pub fn streams_sharing_destination(&self, stream: &ColdStream) -> Vec<&ColdStream> {
        self.cold_streams
            .iter()
            .filter(|other| other.name != stream.name)
            .filter(|other| stream.destination_coolers().any(|d| other.has_destination(d)))
            .collect()
    }

    /// Every cooler on some cold-stream lane, in first-seen order.
    pub fn all_equipment_nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.cold_streams
            .iter()
            .flat_map(|s| s.coolers())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// First hot stream passing through `cooler`, with its row index.
    pub fn hot_stream_through(&self, cooler: &str) -> Option<(usize, &HotStream)> {
        self.hot_streams
            .iter()
            .enumerate()
            .find(|(_, s)| s.coolers.iter().any(|c| c == cooler))
    }
}

fn collect_coolers(desc: &NetworkDescription) -> Result<Vec<CoolerNode>, ValidationError> {
    if desc.coolers.is_empty() {
        let mut seen = HashSet::new();
        let mut coolers = Vec::new();
        for name in desc.hot_flows.iter().flat_map(|f| f.coolers.iter()) {
            if name.is_empty() {
                return Err(ValidationError::EmptyName("cooler"));
            }
            if seen.insert(name.as_str()) {
                coolers.push(CoolerNode {
                    name: name.clone(),
                    in_temp: None,
                    out_temp: None,
                });
            }
        }
        return Ok(coolers);
    }

    let mut seen = HashSet::new();
    let mut coolers = Vec::with_capacity(desc.coolers.len());
    for cooler in &desc.coolers {
        if cooler.name.is_empty() {
            return Err(ValidationError::EmptyName("cooler"));
        }
        if !seen.insert(cooler.name.as_str()) {
            return Err(ValidationError::DuplicateCooler(cooler.name.clone()));
        }
        check_finite(&cooler.name, "inTemp", cooler.in_temp)?;
        check_finite(&cooler.name, "outTemp", cooler.out_temp)?;
        if let Some(p) = cooler.position {
            check_finite(&cooler.name, "position.x", Some(p.x))?;
            check_finite(&cooler.name, "position.y", Some(p.y))?;
            check_finite(&cooler.name, "position.z", Some(p.z))?;
        }
        coolers.push(CoolerNode {
            name: cooler.name.clone(),
            in_temp: cooler.in_temp,
            out_temp: cooler.out_temp,
        });
    }
    Ok(coolers)
}

fn check_finite(owner: &str, field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NonFinite {
            owner: owner.to_string(),
            field,
        }),
        _ => Ok(()),
    }
}
