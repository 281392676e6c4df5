use std::path::PathBuf;
use directories::{BaseDirs, ProjectDirs};
use crate::error::{Error, Result};

/// Directory under the home directory holding the synchronized dataset.
pub const CACHE_DIR_NAME: &str = ".dhub";
/// File name of the configuration inside the global config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub fn get_home_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(Error::HomeDirUnavailable)?;
    Ok(base_dirs.home_dir().to_path_buf())
}

/// Returns `<home>/.dhub`, the default cache root.
pub fn get_default_cache_root() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(CACHE_DIR_NAME))
}

pub fn get_global_config_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "dhub", "dhub")
        .ok_or(Error::HomeDirUnavailable)?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

pub fn get_default_config_file() -> Result<PathBuf> {
    Ok(get_global_config_dir()?.join(CONFIG_FILE_NAME))
}
