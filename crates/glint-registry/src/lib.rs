//! Node catalog for glint effect graphs.
//!
//! This crate is the single source of truth for which node kinds exist, how
//! many inputs each accepts, and which construction-time parameters it takes.
//! The compiler validates graphs against it; the CLI lists it.
//!
//! # Features
//!
//! - **Node Discovery**: List all available node kinds with metadata
//! - **Category System**: Kinds organized by role (generator, combinator, audio, sink)
//! - **Parameter Schema**: Ranges, defaults and integrality per parameter
//!
//! # Example
//!
//! ```rust
//! use glint_registry::{NodeCategory, NodeKind, NodeRegistry};
//!
//! let registry = NodeRegistry::new();
//! for node in registry.nodes_in_category(NodeCategory::Sink) {
//!     println!("{}: {}", node.id, node.description);
//! }
//!
//! let bin = registry.get("spectrum-bin").unwrap();
//! assert_eq!(bin.kind, NodeKind::SpectrumBin);
//! assert!(bin.params[0].resolve(64.0).is_err());
//! ```

mod kind;
mod param;

pub use kind::{
    AUTO_TEMPO_BIN, NUM_CHROMA, NUM_FREQS, NUM_TEMPI, NodeCategory, NodeKind, UnknownKind,
};
pub use param::{OutOfRange, ParamSpec, ParamViolation};

use serde::Serialize;

/// Describes a node kind in the registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// The `type` string (e.g. `"spectrum-bin"`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Kind this descriptor belongs to.
    pub kind: NodeKind,
    /// Category for organization.
    pub category: NodeCategory,
    /// Fewest accepted inputs.
    pub min_inputs: usize,
    /// Most accepted inputs.
    pub max_inputs: usize,
    /// Parameter schema.
    pub params: &'static [ParamSpec],
}

impl From<NodeKind> for NodeDescriptor {
    fn from(kind: NodeKind) -> Self {
        Self {
            id: kind.id(),
            name: kind.name(),
            description: kind.description(),
            kind,
            category: kind.category(),
            min_inputs: kind.min_inputs(),
            max_inputs: kind.max_inputs(),
            params: kind.params(),
        }
    }
}

/// Registry of all node kinds.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    entries: Vec<NodeDescriptor>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Create a registry holding every built-in kind.
    pub fn new() -> Self {
        Self {
            entries: NodeKind::ALL.into_iter().map(NodeDescriptor::from).collect(),
        }
    }

    /// Returns descriptors for all kinds in catalog order.
    pub fn all_nodes(&self) -> &[NodeDescriptor] {
        &self.entries
    }

    /// Returns descriptors for kinds in a specific category.
    pub fn nodes_in_category(&self, category: NodeCategory) -> Vec<&NodeDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Get a descriptor by `type` string.
    pub fn get(&self, id: &str) -> Option<&NodeDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = NodeRegistry::new();
        assert_eq!(registry.len(), 19);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_node() {
        let registry = NodeRegistry::new();
        let clamp = registry.get("clamp").unwrap();
        assert_eq!(clamp.name, "Clamp");
        assert_eq!(clamp.params.len(), 2);
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_nodes_by_category() {
        let registry = NodeRegistry::new();
        assert_eq!(registry.nodes_in_category(NodeCategory::Generator).len(), 4);
        assert_eq!(registry.nodes_in_category(NodeCategory::Combinator).len(), 6);
        assert_eq!(registry.nodes_in_category(NodeCategory::AudioReactive).len(), 7);
        assert_eq!(registry.nodes_in_category(NodeCategory::Sink).len(), 2);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(NodeCategory::AudioReactive.name(), "Audio-Reactive");
        assert_eq!(NodeCategory::Sink.name(), "Sink");
    }

    #[test]
    fn test_descriptor_serializes() {
        let registry = NodeRegistry::new();
        let json = serde_json::to_value(registry.get("beat").unwrap()).unwrap();
        assert_eq!(json["id"], "beat");
        assert_eq!(json["category"], "audio-reactive");
        assert_eq!(json["params"][0]["name"], "tempoBin");
        assert_eq!(json["params"][0]["outOfRange"], "reject");
    }
}
