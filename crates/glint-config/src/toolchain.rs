//! Toolchain configuration file format and operations.

use std::path::{Path, PathBuf};

use glint_compiler::TargetProfile;
use glint_cost::{CostModel, Estimator, FRAME_BUDGET_MS, OPS_PER_MS};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;

/// Toolchain settings shared by every `glint` command.
///
/// Every section and key is optional; missing values take the built-in
/// defaults.
///
/// # TOML Format
///
/// ```toml
/// [budget]
/// frame_budget_ms = 8.0
/// ops_per_ms = 160000.0
///
/// [target]
/// leds = "strip"
/// num_leds = "STRIP_LEN"
///
/// [cost]
/// model = "calibrated.json"
/// ```
///
/// A relative `cost.model` path is resolved against the directory of the
/// file it was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Device throughput and frame budget.
    pub budget: BudgetConfig,
    /// Symbol names used by generated code.
    pub target: TargetProfile,
    /// Cost model overrides.
    pub cost: CostConfig,
}

/// `[budget]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Wall-clock budget per frame in milliseconds.
    pub frame_budget_ms: f64,
    /// Abstract operations the device executes per millisecond.
    pub ops_per_ms: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: FRAME_BUDGET_MS,
            ops_per_ms: OPS_PER_MS,
        }
    }
}

/// `[cost]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Cost model JSON merged over the built-in coefficients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
}

impl ToolchainConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let mut config = Self::from_toml(&content)?;

        if let Some(model) = &config.cost.model
            && model.is_relative()
            && let Some(dir) = path.parent()
        {
            config.cost.model = Some(dir.join(model));
        }

        tracing::debug!(path = %path.display(), "loaded toolchain config");
        Ok(config)
    }

    /// Locates and loads the configuration per [`paths::find_config`].
    ///
    /// Returns the defaults and `None` when no file is found.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths::find_config(explicit) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => {
                tracing::debug!("no config file found; using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Parses a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Converts the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Checks budget values and target symbols.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("frame_budget_ms", self.budget.frame_budget_ms),
            ("ops_per_ms", self.budget.ops_per_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidBudget { name, value });
            }
        }

        if let Some((field, value)) = self.target.invalid_symbol() {
            return Err(ConfigError::InvalidSymbol {
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }

    /// Estimator using the configured budget.
    pub fn estimator(&self) -> Result<Estimator, ConfigError> {
        Ok(Estimator::new(
            self.budget.ops_per_ms,
            self.budget.frame_budget_ms,
        )?)
    }

    /// Target profile for the compiler.
    pub fn target_profile(&self) -> TargetProfile {
        self.target.clone()
    }

    /// Built-in coefficients, overridden by `cost.model` when set.
    pub fn cost_model(&self) -> Result<CostModel, ConfigError> {
        let mut model = CostModel::builtin();
        if let Some(path) = &self.cost.model {
            let loaded = CostModel::load(path)?;
            tracing::debug!(path = %path.display(), kinds = loaded.len(), "merged cost model");
            model.merge(&loaded);
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = ToolchainConfig::from_toml("").unwrap();
        assert_eq!(config, ToolchainConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = ToolchainConfig::from_toml(
            r#"
            [budget]
            frame_budget_ms = 8.0

            [target]
            num_leds = "STRIP_LEN"
            "#,
        )
        .unwrap();
        assert_eq!(config.budget.frame_budget_ms, 8.0);
        assert_eq!(config.budget.ops_per_ms, OPS_PER_MS);
        assert_eq!(config.target.num_leds, "STRIP_LEN");
        assert_eq!(config.target.leds, "leds");
        assert_eq!(config.cost.model, None);
    }

    #[test]
    fn validate_rejects_bad_budget() {
        let mut config = ToolchainConfig::default();
        config.budget.ops_per_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBudget { name: "ops_per_ms", .. })
        ));

        config.budget.ops_per_ms = OPS_PER_MS;
        config.budget.frame_budget_ms = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBudget { name: "frame_budget_ms", .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_symbol() {
        let mut config = ToolchainConfig::default();
        config.target.tempi = "tempi[0]".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSymbol { field: "tempi", .. })
        ));
    }

    #[test]
    fn estimator_uses_budget() {
        let mut config = ToolchainConfig::default();
        config.budget.frame_budget_ms = 5.0;
        config.budget.ops_per_ms = 1000.0;
        let estimator = config.estimator().unwrap();
        assert_eq!(estimator.frame_budget_ms(), 5.0);
        assert_eq!(estimator.ops_to_ms(2000), 2.0);
    }

    #[test]
    fn cost_model_without_file_is_builtin() {
        let model = ToolchainConfig::default().cost_model().unwrap();
        assert_eq!(model, CostModel::builtin());
    }

    #[test]
    fn mistyped_values_are_rejected() {
        assert!(ToolchainConfig::from_toml("[budget]\nframe_budget_ms = \"fast\"").is_err());
    }
}
