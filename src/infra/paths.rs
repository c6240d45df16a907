// src/infra/paths.rs — Config file location
//
// SHOPREC_HOME overrides the config directory. When unset, ~/.shoprec/ is used.

use std::path::PathBuf;

/// Returns the SHOPREC_HOME override, if set.
fn shoprec_home() -> Option<PathBuf> {
    std::env::var_os("SHOPREC_HOME").map(PathBuf::from)
}

/// Configuration directory: $SHOPREC_HOME/ or ~/.shoprec/
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = shoprec_home() {
        return Some(home);
    }
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".shoprec"))
}

/// Config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
