//! Platform-specific configuration paths and lookup.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/glint/config.toml` (Linux),
//!   `~/Library/Application Support/glint/config.toml` (macOS),
//!   `%APPDATA%\glint\config.toml` (Windows)
//! - **Project config**: `./glint.toml`
//!
//! # Example
//!
//! ```rust,no_run
//! use glint_config::paths;
//!
//! match paths::find_config(None) {
//!     Some(path) => println!("using {}", path.display()),
//!     None => println!("using built-in defaults"),
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "glint";

/// File name inside the user config directory.
const CONFIG_FILE: &str = "config.toml";

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "glint.toml";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/glint/`
/// - macOS: `~/Library/Application Support/glint/`
/// - Windows: `%APPDATA%\glint\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user config file.
pub fn user_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Finds the configuration file to use.
///
/// Resolution order:
/// 1. `explicit`, returned as-is even if it does not exist so that loading
///    reports the missing file
/// 2. `./glint.toml`
/// 3. the user config file
///
/// Returns `None` when only the built-in defaults apply.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_config_in(explicit, &cwd, &user_config_path())
}

/// [`find_config`] with the working directory and user config file given.
pub fn find_config_in(explicit: Option<&Path>, cwd: &Path, user_config: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }

    user_config.is_file().then(|| user_config.to_path_buf())
}
