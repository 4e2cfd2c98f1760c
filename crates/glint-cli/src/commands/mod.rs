//! CLI command implementations.

pub mod analyze;
pub mod calibrate;
pub mod check;
pub mod common;
pub mod compile;
pub mod estimate;
pub mod nodes;
pub mod report;
