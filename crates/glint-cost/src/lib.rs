//! Glint Cost - frame-budget estimation for effect graphs.
//!
//! Translates a graph plus a per-node kind classification into a runtime
//! estimate, and learns coefficients from measured timings.
//!
//! # Features
//!
//! - **Cost Models**: [`CostModel`] tables of per-kind [`Coefficients`], loadable from JSON
//! - **Fallback**: unknown kinds are charged [`DEFAULT_COEFFICIENTS`] instead of failing
//! - **Estimation**: [`estimate_runtime`] / [`Estimator::estimate`] produce an [`Estimate`]
//! - **Calibration**: [`calibrate`] / [`Estimator::calibrate_onto`] from [`CalibrationSample`]s
//!
//! # Example
//!
//! ```rust
//! use glint_cost::{CostModel, estimate_runtime};
//! use glint_graph::Graph;
//!
//! let graph = Graph::from_edges(2, &[(0, 1)])?;
//! let estimate = estimate_runtime(&graph, &["spectrum-bin", "palette-interpolate"], &CostModel::builtin())?;
//! assert!(estimate.within_budget());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod calibrate;
mod error;
mod estimate;
mod model;

pub use calibrate::{CalibrationSample, calibrate, load_samples, samples_from_json};
pub use error::CostError;
pub use estimate::{Estimate, Estimator, FRAME_BUDGET_MS, KindCost, OPS_PER_MS, estimate_runtime};
pub use model::{CoefficientSource, Coefficients, CostModel, DEFAULT_COEFFICIENTS, Lookup};
