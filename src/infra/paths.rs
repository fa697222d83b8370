// src/infra/paths.rs — Config path management
//
// All paths respect the WAVECTL_HOME environment variable for isolation.
// When unset, config lives under ~/.wavectl/.

use std::path::PathBuf;

/// Returns the WAVECTL_HOME override, if set.
fn wavectl_home() -> Option<PathBuf> {
    std::env::var_os("WAVECTL_HOME").map(PathBuf::from)
}

/// Configuration directory: $WAVECTL_HOME/ or ~/.wavectl/
pub fn config_dir() -> PathBuf {
    if let Some(home) = wavectl_home() {
        return home;
    }
    dirs_home().join(".wavectl")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
