//! Per-node-kind cost coefficients and the cost model table.
//!
//! A [`CostModel`] maps node-kind keys (e.g. `"clamp"`, `"spectrum-bin"`) to
//! [`Coefficients`]. Kinds missing from the table resolve to
//! [`DEFAULT_COEFFICIENTS`] through an explicit fallback branch in
//! [`CostModel::coefficients_for`], so an unknown kind yields a pessimistic
//! estimate instead of an error.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "clamp": { "ops": 512, "memReads": 0, "memWrites": 0, "ioCalls": 0 },
//!   "output": { "ops": 256, "memReads": 0, "memWrites": 384, "ioCalls": 1 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CostError;

/// Per-frame cost of one node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficients {
    /// Abstract operations per frame.
    pub ops: u64,
    /// Memory reads per frame (4-byte words).
    pub mem_reads: u32,
    /// Memory writes per frame (4-byte words).
    pub mem_writes: u32,
    /// Calls that leave the render function (buffer pushes, peripherals).
    pub io_calls: u32,
}

impl Coefficients {
    /// Creates a coefficient set.
    pub const fn new(ops: u64, mem_reads: u32, mem_writes: u32, io_calls: u32) -> Self {
        Self {
            ops,
            mem_reads,
            mem_writes,
            io_calls,
        }
    }
}

/// Conservative coefficients used for any kind missing from a model.
pub const DEFAULT_COEFFICIENTS: Coefficients = Coefficients::new(100, 16, 8, 0);

/// Hand-authored defaults, sized for a strip of roughly 128 pixels.
///
/// Per-pixel kinds carry the whole loop's cost; frame-constant reads are
/// a handful of ops.
const BUILTIN: &[(&str, Coefficients)] = &[
    ("constant", Coefficients::new(2, 0, 0, 0)),
    ("gradient", Coefficients::new(768, 0, 0, 0)),
    ("position-gradient", Coefficients::new(512, 0, 0, 0)),
    ("time", Coefficients::new(12, 1, 0, 0)),
    ("add", Coefficients::new(384, 0, 0, 0)),
    ("multiply", Coefficients::new(256, 0, 0, 0)),
    ("clamp", Coefficients::new(512, 0, 0, 0)),
    ("modulo", Coefficients::new(640, 0, 0, 0)),
    ("scale", Coefficients::new(256, 0, 0, 0)),
    ("sin", Coefficients::new(2560, 0, 0, 0)),
    ("spectrum-bin", Coefficients::new(4, 1, 0, 0)),
    ("spectrum-range", Coefficients::new(192, 64, 0, 0)),
    ("spectrum-interpolate", Coefficients::new(2048, 256, 0, 0)),
    ("audio-level", Coefficients::new(2, 1, 0, 0)),
    ("beat", Coefficients::new(300, 192, 0, 0)),
    ("chromagram", Coefficients::new(4, 1, 0, 0)),
    ("tempo-confidence", Coefficients::new(2, 1, 0, 0)),
    ("palette-interpolate", Coefficients::new(6144, 768, 384, 0)),
    ("output", Coefficients::new(256, 0, 384, 1)),
];

/// Where a looked-up coefficient set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientSource {
    /// The kind has an entry in the model.
    Model,
    /// The kind is unknown to the model; [`DEFAULT_COEFFICIENTS`] were used.
    Fallback,
}

/// Result of [`CostModel::coefficients_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// Coefficients to charge for the node.
    pub coefficients: Coefficients,
    /// Whether they came from the model or the fallback.
    pub source: CoefficientSource,
}

/// Mapping of node-kind key to [`Coefficients`].
///
/// Backed by a `BTreeMap` so serialization and iteration are ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostModel {
    entries: BTreeMap<String, Coefficients>,
}

impl CostModel {
    /// Creates an empty model (every kind falls back).
    pub fn new() -> Self {
        Self::default()
    }

    /// The hand-authored default model covering every built-in node kind.
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|&(kind, c)| (kind.to_string(), c))
            .collect()
    }

    /// Sets the coefficients for `kind`, returning the previous entry.
    pub fn insert(
        &mut self,
        kind: impl Into<String>,
        coefficients: Coefficients,
    ) -> Option<Coefficients> {
        self.entries.insert(kind.into(), coefficients)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, kind: impl Into<String>, coefficients: Coefficients) -> Self {
        self.insert(kind, coefficients);
        self
    }

    /// Returns the entry for `kind` without falling back.
    pub fn get(&self, kind: &str) -> Option<&Coefficients> {
        self.entries.get(kind)
    }

    /// Resolves `kind`, falling back to [`DEFAULT_COEFFICIENTS`] when absent.
    pub fn coefficients_for(&self, kind: &str) -> Lookup {
        match self.entries.get(kind) {
            Some(&coefficients) => Lookup {
                coefficients,
                source: CoefficientSource::Model,
            },
            None => Lookup {
                coefficients: DEFAULT_COEFFICIENTS,
                source: CoefficientSource::Fallback,
            },
        }
    }

    /// Number of kinds with explicit coefficients.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the model has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coefficients)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` onto this model; entries in `other` win.
    pub fn merge(&mut self, other: &CostModel) {
        for (kind, c) in &other.entries {
            self.entries.insert(kind.clone(), *c);
        }
    }

    /// Parses a model from JSON.
    pub fn from_json(json: &str) -> Result<Self, CostError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the model to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CostError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a model from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CostError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CostError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Save the model to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CostError> {
        let path = path.as_ref();
        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| CostError::write_file(path, e))
    }
}

impl FromIterator<(String, Coefficients)> for CostModel {
    fn from_iter<I: IntoIterator<Item = (String, Coefficients)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
