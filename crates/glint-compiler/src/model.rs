//! Author-facing node/wire graph model.
//!
//! This is the JSON shape designers write. Nothing here is validated; see
//! [`resolve`](crate::resolve) for the checked form.
//!
//! ```json
//! {
//!   "name": "bass pulse",
//!   "palette": "sunset",
//!   "nodes": [
//!     { "id": "bass", "type": "spectrum-bin", "parameters": { "bin": 2 } },
//!     { "id": "paint", "type": "palette-interpolate" }
//!   ],
//!   "wires": [ { "from": "bass", "to": "paint" } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// A parameter value: designers may write numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// JSON number.
    Number(f64),
    /// JSON string, parsed as a number on use.
    Text(String),
}

impl ParamValue {
    /// Numeric value, parsing trimmed strings. `None` if not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// One node as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique node id.
    pub id: String,
    /// Node kind id (e.g. `"clamp"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Construction-time parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParamValue>,
    /// Upstream node ids in operand order. Empty means "use wires".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeSpec {
    /// Creates a node with no parameters or inputs.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            parameters: BTreeMap::new(),
            inputs: Vec::new(),
            description: None,
        }
    }

    /// Builder: sets a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Builder: appends an explicit input.
    pub fn input(mut self, id: impl Into<String>) -> Self {
        self.inputs.push(id.into());
        self
    }
}

/// A directed wire between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpec {
    /// Upstream node id.
    pub from: String,
    /// Downstream node id.
    pub to: String,
    /// Provenance note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WireSpec {
    /// Creates a wire without a description.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            description: None,
        }
    }
}

/// A complete effect as authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectGraph {
    /// Effect name, used in the generated header comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Built-in palette name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Inline keyframes `[pos, r, g, b]`; wins over `palette`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_data: Option<Vec<[f64; 4]>>,
    /// Nodes in declaration order.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// Wires in declaration order.
    #[serde(default)]
    pub wires: Vec<WireSpec>,
}

impl EffectGraph {
    /// Parses an effect from JSON.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the effect to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder: adds a node.
    pub fn node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    /// Builder: adds a wire.
    pub fn wire(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.wires.push(WireSpec::new(from, to));
        self
    }

    /// Builder: selects a built-in palette.
    pub fn with_palette(mut self, name: impl Into<String>) -> Self {
        self.palette = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let graph = EffectGraph::from_json(
            r#"{
                "name": "pulse",
                "palette_data": [[0, 0, 0, 0], [1, 255, 128, 0]],
                "nodes": [
                    {"id": "b", "type": "spectrum-bin", "parameters": {"bin": "4"}},
                    {"id": "p", "type": "palette-interpolate", "description": "paint"}
                ],
                "wires": [{"from": "b", "to": "p", "description": "bass drives position"}]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.name.as_deref(), Some("pulse"));
        assert_eq!(graph.nodes[0].kind, "spectrum-bin");
        assert_eq!(graph.nodes[0].parameters["bin"].as_f64(), Some(4.0));
        assert_eq!(graph.palette_data.as_ref().unwrap()[1], [1.0, 255.0, 128.0, 0.0]);
        assert_eq!(graph.wires[0].description.as_deref(), Some("bass drives position"));
    }

    #[test]
    fn optional_sections_default() {
        let graph = EffectGraph::from_json(r#"{"nodes": []}"#).unwrap();
        assert!(graph.wires.is_empty());
        assert!(graph.palette.is_none());
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(ParamValue::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(ParamValue::from("fast").as_f64(), None);
        assert_eq!(ParamValue::from(3.0).as_f64(), Some(3.0));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(
            EffectGraph::from_json(r#"{"nodes": [{"id": 1}]}"#),
            Err(CompileError::Json(_))
        ));
    }
}
