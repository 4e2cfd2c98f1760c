//! Learning cost coefficients from measured node timings.
//!
//! Samples are grouped by kind, averaged, and converted back to ops with the
//! estimator's own ops-per-millisecond constant. Timings carry no signal
//! about memory or IO, so those coefficients are never calibrated.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CostError;
use crate::estimate::Estimator;
use crate::model::{Coefficients, CostModel, DEFAULT_COEFFICIENTS};

/// One measured execution of a node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    /// Cost-model key of the measured node.
    #[serde(rename = "nodeKind")]
    pub node_kind: String,
    /// Observed per-frame time in microseconds.
    pub us: f64,
}

impl CalibrationSample {
    /// Creates a sample.
    pub fn new(node_kind: impl Into<String>, us: f64) -> Self {
        Self {
            node_kind: node_kind.into(),
            us,
        }
    }
}

/// Parses a JSON array of samples.
pub fn samples_from_json(json: &str) -> Result<Vec<CalibrationSample>, CostError> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a JSON array of samples from a file.
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<CalibrationSample>, CostError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CostError::read_file(path, e))?;
    samples_from_json(&content)
}

impl Estimator {
    /// Builds a model from samples alone.
    ///
    /// Each sampled kind gets `ops = round(avg_us / 1000 * ops_per_ms)`;
    /// memory and IO coefficients take the fixed defaults.
    pub fn calibrate(&self, samples: &[CalibrationSample]) -> Result<CostModel, CostError> {
        self.calibrate_onto(&CostModel::new(), samples)
    }

    /// Recalibrates `base` from samples.
    ///
    /// Sampled kinds get new ops and keep `base`'s memory/IO values when it
    /// has them. Unsampled kinds are carried over unchanged.
    pub fn calibrate_onto(
        &self,
        base: &CostModel,
        samples: &[CalibrationSample],
    ) -> Result<CostModel, CostError> {
        // kind -> (sum_us, count)
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (index, sample) in samples.iter().enumerate() {
            if !sample.us.is_finite() || sample.us < 0.0 {
                return Err(CostError::InvalidSample {
                    index,
                    kind: sample.node_kind.clone(),
                    us: sample.us,
                });
            }
            let group = groups.entry(sample.node_kind.as_str()).or_insert((0.0, 0));
            group.0 += sample.us;
            group.1 += 1;
        }

        let mut model = base.clone();
        for (kind, (sum_us, count)) in groups {
            let avg_us = sum_us / count as f64;
            let ops = (avg_us / 1000.0 * self.ops_per_ms()).round() as u64;
            let template = base.get(kind).copied().unwrap_or(DEFAULT_COEFFICIENTS);
            tracing::debug!(kind, samples = count, avg_us, ops, "calibrated");
            model.insert(
                kind,
                Coefficients {
                    ops,
                    ..template
                },
            );
        }

        Ok(model)
    }
}

/// Calibrates with the default [`Estimator`].
pub fn calibrate(samples: &[CalibrationSample]) -> Result<CostModel, CostError> {
    Estimator::default().calibrate(samples)
}
