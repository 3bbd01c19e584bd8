//! Thermal duty of a network: heat removed per hot stream, cooler loads and
//! the cooling water each cooler needs.
//!
//! Units follow the host application: temperatures in °C, `mcp` in
//! kJ/(°C·h), heat in kJ/h, water flow in kg/h.

use crate::ir::{CoolerNode, HotStream, NetworkIR};
use serde::Serialize;
use std::collections::BTreeMap;

/// Specific heat of cooling water, kJ/(kg·°C).
pub const WATER_SPECIFIC_HEAT: f64 = 4.186;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyReport {
    pub hot_flows: BTreeMap<String, HotDuty>,
    pub coolers: BTreeMap<String, CoolerDuty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotDuty {
    /// `None` when the stream has no `mcp`.
    pub heat_exchange: Option<f64>,
    /// Cooler name -> efficiency in percent
    pub efficiencies: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolerDuty {
    pub total_heat_load: f64,
    pub water_flow_rate: Option<f64>,
}

/// Heat given up by a hot stream: `mcp * (inlet - outlet)`.
pub fn heat_exchange(hot: &HotStream) -> Option<f64> {
    hot.mcp.map(|mcp| mcp * (hot.inlet_temp - hot.outlet_temp))
}

/// `(th_in - th_out) / (th_in - tc_in)` as a percentage.
pub fn efficiency(hot: &HotStream, cooler: &CoolerNode) -> Option<f64> {
    let cold_inlet = cooler.in_temp?;
    let approach = hot.inlet_temp - cold_inlet;
    if approach == 0.0 {
        return None;
    }
    Some((hot.inlet_temp - hot.outlet_temp) / approach * 100.0)
}

/// Water needed to carry `heat_load` across the cooler's temperature rise.
pub fn water_flow_rate(cooler: &CoolerNode, heat_load: f64) -> Option<f64> {
    let rise = cooler.out_temp? - cooler.in_temp?;
    if rise == 0.0 {
        return None;
    }
    Some(heat_load / (WATER_SPECIFIC_HEAT * rise))
}

pub fn compute(ir: &NetworkIR) -> DutyReport {
    let hot_flows = ir
        .hot_streams
        .iter()
        .map(|hot| {
            let efficiencies = hot
                .coolers
                .iter()
                .filter_map(|name| {
                    let cooler = ir.cooler(name)?;
                    efficiency(hot, cooler).map(|e| (name.clone(), e))
                })
                .collect();
            (
                hot.name.clone(),
                HotDuty {
                    heat_exchange: heat_exchange(hot),
                    efficiencies,
                },
            )
        })
        .collect();

    // A hot stream's heat is split evenly over the coolers it passes.
    let coolers = ir
        .coolers
        .iter()
        .map(|cooler| {
            let total_heat_load: f64 = ir
                .hot_streams
                .iter()
                .filter(|hot| hot.coolers.iter().any(|c| *c == cooler.name))
                .filter_map(|hot| heat_exchange(hot).map(|q| q / hot.coolers.len() as f64))
                .sum();
            (
                cooler.name.clone(),
                CoolerDuty {
                    total_heat_load,
                    water_flow_rate: water_flow_rate(cooler, total_heat_load),
                },
            )
        })
        .collect();

    DutyReport { hot_flows, coolers }
}
