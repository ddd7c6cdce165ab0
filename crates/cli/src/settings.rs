//! Config file resolution.
//!
//! Order: `--config` (or `QUOTEMERGE_CONFIG`), then
//! `<config dir>/quotemerge/quotemerge.toml` if it exists, then built-in
//! defaults. An explicit path that does not exist is an error; a missing
//! default file is not.

use std::path::{Path, PathBuf};

use quotemerge_recon::PipelineConfig;

use crate::CliError;

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quotemerge").join("quotemerge.toml"))
}

pub fn load(explicit: Option<&Path>) -> Result<PipelineConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.is_file() => path,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(PipelineConfig::default());
            }
        },
    };
    load_from(&path)
}

fn load_from(path: &Path) -> Result<PipelineConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {}", path.display(), e)))?;
    let config = PipelineConfig::from_toml(&text).map_err(|e| {
        CliError::config(e.to_string()).with_hint(format!("in {}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
