/// Prefix used for configuration and data directories
pub const PREFIX: &str = "elanpad";
/// Name of the driver configuration file
pub const CONFIG_FILE: &str = "config.yaml";
/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/elanpad";
