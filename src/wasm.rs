//! WASM bindings for Ratiograph Core.
//!
//! This module exposes a [`Session`] to a browser UI. Structured results are
//! returned as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmRatioGraph } from 'ratiograph_core';
//!
//! await init();
//!
//! const graph = new WasmRatioGraph();
//! graph.apply_chain("2a.3b");
//! graph.apply_chain("b.c,d");
//! graph.set_root_quantity("10");
//!
//! // { "a": "10", "b": "15", "c": "15", "d": "15" }
//! const quantities = JSON.parse(graph.compute_quantities());
//!
//! // Persist through localStorage instead of the file system
//! localStorage.setItem("graph", graph.to_config());
//! ```

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::quantity::format_quantity;
use crate::session::Session;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible ratio graph session.
#[wasm_bindgen]
pub struct WasmRatioGraph {
    session: Session,
}

#[wasm_bindgen]
impl WasmRatioGraph {
    /// Create an empty graph with root quantity 1.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmRatioGraph {
        WasmRatioGraph {
            session: Session::new(),
        }
    }

    /// Add the edges of a chain expression.
    ///
    /// # Returns
    /// The number of edges written, or an error message for malformed input.
    #[wasm_bindgen]
    pub fn apply_chain(&mut self, text: &str) -> Result<usize, JsValue> {
        self.session.apply_chain_text(text).map_err(js_error)
    }

    /// Set the root quantity from text such as `10`, `3/2` or `2.5`.
    #[wasm_bindgen]
    pub fn set_root_quantity(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.set_root_quantity_text(text).map_err(js_error)
    }

    /// Propagate and return `{ node: "p/q" }` as JSON.
    #[wasm_bindgen]
    pub fn compute_quantities(&mut self) -> Result<String, JsValue> {
        let quantities: BTreeMap<String, String> = self
            .session
            .compute_quantities()
            .iter()
            .map(|(name, value)| (name.clone(), format_quantity(value)))
            .collect();
        serde_json::to_string(&quantities).map_err(js_error)
    }

    /// Every edge record, sorted, as a JSON array.
    #[wasm_bindgen]
    pub fn edge_list(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.export_edge_list()).map_err(js_error)
    }

    /// Sorted node names as a JSON array.
    #[wasm_bindgen]
    pub fn node_names(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.node_names()).map_err(js_error)
    }

    /// Remove every node and edge.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Encode the graph as a config record.
    #[wasm_bindgen]
    pub fn to_config(&self) -> Result<String, JsValue> {
        self.session.to_config_string().map_err(js_error)
    }

    /// Replace the graph with a config record.
    #[wasm_bindgen]
    pub fn load_config(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.load_config_str(text).map_err(js_error)
    }

    /// Number of nodes.
    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> usize {
        self.session.summary().nodes
    }

    /// Number of edges.
    #[wasm_bindgen(getter)]
    pub fn edge_count(&self) -> usize {
        self.session.summary().edges
    }
}

impl Default for WasmRatioGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
