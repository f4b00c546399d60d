use std::path::Path;

use crate::error::{RedeployError, Result};

use super::types::Config;

/// Name of the config file picked up from the working directory.
pub const CONFIG_FILE: &str = ".redeploy.yml";

/// Load config from a `.redeploy.yml` file in the given directory.
///
/// Returns `Ok(None)` when the directory has no config file.
pub fn load(dir: &Path) -> Result<Option<Config>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_file(&path).map(Some)
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|source| RedeployError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file deserializes as null, which serde_yaml rejects for a struct.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| RedeployError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
