//! Whole-graph runtime estimation against a frame budget.
//!
//! This is a host-side analytical model: it sums per-kind coefficients and
//! converts abstract ops to wall-clock time with a single ops-per-millisecond
//! constant. It is a fast pre-flight check ("is this graph anywhere near the
//! frame budget?"), not a substitute for on-device benchmarking.

use std::collections::BTreeMap;

use glint_graph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::CostError;
use crate::model::{CoefficientSource, CostModel};

/// Abstract operations the target executes per millisecond.
pub const OPS_PER_MS: f64 = 240_000.0;

/// Frame budget for 60 FPS rendering, in milliseconds.
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

/// Bytes per memory access counted by the coefficients.
const WORD_BYTES: f64 = 4.0;

/// Accumulated cost of all nodes of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCost {
    /// Number of nodes of this kind.
    pub count: usize,
    /// Total ops charged for them.
    pub ops: u64,
}

/// Runtime estimate for a whole graph.
///
/// Derived data, never persisted by the toolchain itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Sum of per-node ops.
    pub total_ops: u64,
    /// `total_ops / ops_per_ms`.
    pub ms: f64,
    /// `min(100, ms / frame_budget_ms * 100)`.
    pub cpu_pct: f64,
    /// Memory traffic per frame in KiB (`(reads + writes) * 4 / 1024`).
    #[serde(rename = "memKB")]
    pub mem_kb: f64,
    /// Sum of per-node IO calls.
    pub io_calls: u64,
    /// Sum of per-node memory reads.
    pub mem_reads: u64,
    /// Sum of per-node memory writes.
    pub mem_writes: u64,
    /// Frame budget the percentage is relative to.
    pub frame_budget_ms: f64,
    /// Kinds that were charged the fallback coefficients, sorted.
    pub fallback_kinds: Vec<String>,
    /// Per-kind node counts and ops.
    pub breakdown: BTreeMap<String, KindCost>,
}

impl Estimate {
    /// Returns true if the predicted frame time fits the budget.
    pub fn within_budget(&self) -> bool {
        self.ms <= self.frame_budget_ms
    }

    /// Budget left over (negative when over budget).
    pub fn headroom_ms(&self) -> f64 {
        self.frame_budget_ms - self.ms
    }
}

/// Estimation constants: ops-to-time conversion and frame budget.
///
/// Estimation and calibration share `ops_per_ms`, so calibrated models stay
/// commensurable with hand-authored ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    ops_per_ms: f64,
    frame_budget_ms: f64,
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            ops_per_ms: OPS_PER_MS,
            frame_budget_ms: FRAME_BUDGET_MS,
        }
    }
}

impl Estimator {
    /// Creates an estimator for a specific target.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::InvalidSetting`] unless both values are positive
    /// and finite.
    pub fn new(ops_per_ms: f64, frame_budget_ms: f64) -> Result<Self, CostError> {
        for (name, value) in [("ops_per_ms", ops_per_ms), ("frame_budget_ms", frame_budget_ms)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CostError::InvalidSetting { name, value });
            }
        }
        Ok(Self {
            ops_per_ms,
            frame_budget_ms,
        })
    }

    /// Abstract ops per millisecond.
    pub fn ops_per_ms(&self) -> f64 {
        self.ops_per_ms
    }

    /// Frame budget in milliseconds.
    pub fn frame_budget_ms(&self) -> f64 {
        self.frame_budget_ms
    }

    /// Converts an ops count to milliseconds.
    pub fn ops_to_ms(&self, ops: u64) -> f64 {
        ops as f64 / self.ops_per_ms
    }

    /// Estimates the per-frame cost of `graph`.
    ///
    /// `node_kinds[i]` is the cost-model key of node `i`.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::ShapeMismatch`] if `node_kinds` does not have
    /// exactly one entry per node.
    pub fn estimate<S: AsRef<str>>(
        &self,
        graph: &Graph,
        node_kinds: &[S],
        model: &CostModel,
    ) -> Result<Estimate, CostError> {
        if node_kinds.len() != graph.node_count() {
            return Err(CostError::ShapeMismatch {
                expected: graph.node_count(),
                actual: node_kinds.len(),
            });
        }

        let mut total_ops = 0u64;
        let mut mem_reads = 0u64;
        let mut mem_writes = 0u64;
        let mut io_calls = 0u64;
        let mut breakdown: BTreeMap<String, KindCost> = BTreeMap::new();
        let mut fallback_kinds: Vec<String> = Vec::new();

        for kind in node_kinds {
            let kind = kind.as_ref();
            let lookup = model.coefficients_for(kind);
            if lookup.source == CoefficientSource::Fallback
                && !fallback_kinds.iter().any(|k| k == kind)
            {
                tracing::warn!(kind, "no cost coefficients for node kind, using conservative default");
                fallback_kinds.push(kind.to_string());
            }

            let c = lookup.coefficients;
            // Totals saturate at u64::MAX.
            total_ops = total_ops.saturating_add(c.ops);
            mem_reads = mem_reads.saturating_add(u64::from(c.mem_reads));
            mem_writes = mem_writes.saturating_add(u64::from(c.mem_writes));
            io_calls = io_calls.saturating_add(u64::from(c.io_calls));

            let entry = breakdown.entry(kind.to_string()).or_default();
            entry.count += 1;
            entry.ops = entry.ops.saturating_add(c.ops);
        }
        fallback_kinds.sort();

        let ms = self.ops_to_ms(total_ops);
        let cpu_pct = (ms / self.frame_budget_ms * 100.0).min(100.0);
        let mem_kb = (mem_reads as f64 + mem_writes as f64) * WORD_BYTES / 1024.0;

        tracing::debug!(total_ops, ms, cpu_pct, "estimate");

        Ok(Estimate {
            total_ops,
            ms,
            cpu_pct,
            mem_kb,
            io_calls,
            mem_reads,
            mem_writes,
            frame_budget_ms: self.frame_budget_ms,
            fallback_kinds,
            breakdown,
        })
    }
}

/// Estimates `graph` with the default [`Estimator`] (60 FPS budget).
pub fn estimate_runtime<S: AsRef<str>>(
    graph: &Graph,
    node_kinds: &[S],
    model: &CostModel,
) -> Result<Estimate, CostError> {
    Estimator::default().estimate(graph, node_kinds, model)
}
