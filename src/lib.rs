pub mod duty;
pub mod error;
pub mod ir;
pub mod layout;
pub mod network;

use wasm_bindgen::prelude::*;

use error::{LayoutError, NetworkError};
use ir::NetworkIR;
use layout::{LayoutConfig, LayoutEngine, LayoutResult};
use network::NetworkDescription;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Validate `desc` and lay it out on the canvas described by `config`.
pub fn layout_network(
    desc: &NetworkDescription,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    let ir = NetworkIR::from_description(desc)?;
    LayoutEngine::new(*config).layout(&ir)
}

/// JSON in, pretty JSON out.
pub fn layout_network_json(input: &str, config: Option<&str>) -> Result<String, NetworkError> {
    let desc = NetworkDescription::from_json(input)?;
    let config = match config {
        Some(c) => LayoutConfig::from_json(c)?,
        None => LayoutConfig::default(),
    };
    let layout = layout_network(&desc, &config)?;
    Ok(layout.to_json()?)
}

pub fn network_duty_json(input: &str) -> Result<String, NetworkError> {
    let desc = NetworkDescription::from_json(input)?;
    let ir = NetworkIR::from_description(&desc).map_err(LayoutError::from)?;
    Ok(serde_json::to_string_pretty(&duty::compute(&ir))?)
}

/// Lay out a network description given as JSON
#[wasm_bindgen(js_name = "layoutNetwork")]
pub fn layout_network_js(input: &str, config: Option<String>) -> Result<String, JsValue> {
    layout_network_json(input, config.as_deref())
        .map_err(|e| js_sys::Error::new(&e.to_string()).into())
}

/// Thermal duty report for a network description given as JSON
#[wasm_bindgen(js_name = "networkDuty")]
pub fn network_duty_js(input: &str) -> Result<String, JsValue> {
    network_duty_json(input).map_err(|e| js_sys::Error::new(&e.to_string()).into())
}
