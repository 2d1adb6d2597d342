//! Module for searching for elanpad config files

use std::path::PathBuf;

use crate::constants::{CONFIG_FILE, PREFIX, SYSTEM_CONFIG_DIR};

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/usr/share/elanpad";

/// Returns the base path for shared data
pub fn get_base_path() -> PathBuf {
    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix(PREFIX) else {
        log::warn!("Unable to determine config base path. Using fallback path.");
        return PathBuf::from(FALLBACK_BASE_PATH);
    };

    // Get the data directories in preference order
    let data_dirs = base_dirs.get_data_dirs();
    for dir in data_dirs {
        if dir.exists() {
            return dir;
        }
    }

    log::warn!("Config base path not found. Using fallback path.");
    PathBuf::from(FALLBACK_BASE_PATH)
}

/// Returns a list of config file paths in load order.
/// E.g. ["/etc/elanpad/config.yaml", "/usr/share/elanpad/config.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_DIR).join(CONFIG_FILE)];
    if let Ok(base_dirs) = xdg::BaseDirectories::with_prefix(PREFIX) {
        paths.extend(base_dirs.find_config_files(CONFIG_FILE));
        paths.extend(base_dirs.find_data_files(CONFIG_FILE));
    }
    paths.push(get_base_path().join(CONFIG_FILE));

    paths
}

/// Returns the first config file that exists
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking for config file: {path:?}");
        path.is_file()
    })
}

/// Returns the directory for bundled capture files
/// (e.g. "/usr/share/elanpad/captures")
pub fn get_captures_path() -> PathBuf {
    let rel_path = PathBuf::from("./rootfs/usr/share/elanpad/captures");
    if rel_path.exists() && rel_path.is_dir() {
        return rel_path;
    }
    let base_path = get_base_path();
    base_path.join("captures")
}
