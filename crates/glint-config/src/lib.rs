//! Toolchain configuration for glint.
//!
//! A single TOML file tunes the frame budget, the symbol names generated code
//! references on the device, and an optional calibrated cost model.
//!
//! # Features
//!
//! - **Toolchain config**: [`ToolchainConfig`] with `[budget]`, `[target]` and
//!   `[cost]` sections, all defaulted
//! - **Paths**: user config directory and project-file lookup
//! - **Validation**: positive budgets and C-identifier target symbols
//!
//! # Example
//!
//! ```rust,no_run
//! use glint_config::ToolchainConfig;
//!
//! let (config, source) = ToolchainConfig::discover(None).unwrap();
//! config.validate().unwrap();
//! let estimator = config.estimator().unwrap();
//! println!("{:?}: {} ms budget", source, estimator.frame_budget_ms());
//! ```

mod error;
mod toolchain;

/// Platform-specific config paths and lookup.
pub mod paths;

pub use error::ConfigError;
pub use paths::{PROJECT_CONFIG_FILE, find_config, user_config_dir, user_config_path};
pub use toolchain::{BudgetConfig, CostConfig, ToolchainConfig};
