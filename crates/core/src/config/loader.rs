//! Config path resolution

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "PSL1GHT_CONFIG";

/// Config file name, looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "psl1ght.toml";

/// Returns the config file path.
///
/// `$PSL1GHT_CONFIG` if set and non-empty, otherwise `psl1ght.toml` in the
/// directory of the running executable (the `.self` on the console).
pub fn config_path() -> ConfigResult<PathBuf> {
    resolve(std::env::var_os(CONFIG_ENV).map(PathBuf::from), || {
        std::env::current_exe().map_err(ConfigError::IoError)
    })
}

fn resolve(
    overridden: Option<PathBuf>,
    exe: impl FnOnce() -> ConfigResult<PathBuf>,
) -> ConfigResult<PathBuf> {
    if let Some(path) = overridden.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    exe()?
        .parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}
