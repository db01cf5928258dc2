//! Loading project configuration from disk.

use super::Project;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a project configuration file.
pub fn load_project(path: &Path) -> Result<Project> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    debug!(path = %path.display(), "loaded project config");

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Parse a project configuration from TOML.
pub fn parse_project(content: &str) -> Result<Project> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}
