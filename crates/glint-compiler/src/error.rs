//! Compilation errors.
//!
//! Every semantic variant names the offending node id and its kind. There is
//! no partial compilation: the first error aborts the whole graph.

use glint_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while validating or lowering an effect graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The node's `type` is not a known kind.
    #[error("node '{node}': unknown node type '{kind}'")]
    UnknownNodeType {
        /// Offending node id.
        node: String,
        /// The unrecognized type string.
        kind: String,
    },

    /// Two nodes share an id.
    #[error("duplicate node id '{node}'")]
    DuplicateNode {
        /// The repeated id.
        node: String,
    },

    /// An input id does not name a node in the graph.
    #[error("node '{node}' ({kind}): input '{input}' does not exist")]
    MissingInput {
        /// Offending node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// The unresolved input id.
        input: String,
    },

    /// Wrong number of inputs.
    #[error("node '{node}' ({kind}): expected {min}..={max} inputs, got {actual}")]
    Arity {
        /// Offending node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// Fewest accepted inputs.
        min: usize,
        /// Most accepted inputs.
        max: usize,
        /// Inputs supplied.
        actual: usize,
    },

    /// A parameter lies outside its declared range.
    #[error("node '{node}' ({kind}): parameter '{param}'={value} is outside [{min}, {max}]")]
    ParameterRange {
        /// Offending node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// Parameter name.
        param: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// A parameter is missing, non-numeric, fractional where an integer is
    /// required, or inconsistent with another parameter.
    #[error("node '{node}' ({kind}): parameter '{param}': {reason}")]
    InvalidParameter {
        /// Offending node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// Parameter name.
        param: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The kind declares no parameter with this name.
    #[error("node '{node}' ({kind}): unknown parameter '{param}'")]
    UnknownParameter {
        /// Offending node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// The unrecognized name.
        param: String,
    },

    /// A sink's value feeds something other than `output`.
    #[error("node '{node}' ({kind}): sink '{input}' cannot be used as a value input")]
    SinkInput {
        /// Consuming node id.
        node: String,
        /// Its kind.
        kind: &'static str,
        /// The sink used as input.
        input: String,
    },

    /// A wire names a node that does not exist.
    #[error("wire {from} -> {to}: node '{missing}' does not exist")]
    DanglingWire {
        /// Wire source id.
        from: String,
        /// Wire target id.
        to: String,
        /// Whichever end is missing.
        missing: String,
    },

    /// The dependency graph has a cycle.
    #[error("node '{node}' ({kind}) is part of a dependency cycle")]
    Cycle {
        /// Lowest-declared node on the cycle.
        node: String,
        /// Its kind.
        kind: &'static str,
    },

    /// No node writes the output buffer.
    #[error("graph has no sink node (palette-interpolate or output)")]
    NoSink,

    /// `palette` names no built-in palette.
    #[error("unknown palette '{name}'")]
    UnknownPalette {
        /// The requested name.
        name: String,
    },

    /// `palette_data` is malformed.
    #[error("invalid palette: {reason}")]
    InvalidPalette {
        /// What is wrong with it.
        reason: String,
    },

    /// Building or sorting the dependency view failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The input document is not valid effect JSON.
    #[error("invalid effect JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CompileError {
    fn from(err: serde_json::Error) -> Self {
        CompileError::Json(err.to_string())
    }
}

impl CompileError {
    /// Id of the node the error is attributed to, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            CompileError::UnknownNodeType { node, .. }
            | CompileError::DuplicateNode { node }
            | CompileError::MissingInput { node, .. }
            | CompileError::Arity { node, .. }
            | CompileError::ParameterRange { node, .. }
            | CompileError::InvalidParameter { node, .. }
            | CompileError::UnknownParameter { node, .. }
            | CompileError::SinkInput { node, .. }
            | CompileError::Cycle { node, .. } => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_names_node_and_kind() {
        let err = CompileError::ParameterRange {
            node: "bass".into(),
            kind: "spectrum-bin",
            param: "bin",
            value: 64.0,
            min: 0.0,
            max: 63.0,
        };
        assert_eq!(
            err.to_string(),
            "node 'bass' (spectrum-bin): parameter 'bin'=64 is outside [0, 63]"
        );
        assert_eq!(err.node(), Some("bass"));
    }

    #[test]
    fn graph_level_errors_have_no_node() {
        assert_eq!(CompileError::NoSink.node(), None);
    }
}
