//! Project configuration consumed by pipes

mod storage;

pub use storage::{load_project, parse_project};

use crate::types::ProviderToken;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Release-automation project configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Project {
    /// Project name, exposed to templates as `.ProjectName`
    pub project_name: String,
    /// Raw `KEY=VALUE` declarations; values may be templates
    pub env: Vec<String>,
    /// Token file overrides
    pub env_files: EnvFiles,
    /// Release settings
    pub release: Release,
}

impl Project {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        parse_project(content)
    }
}

/// Per-provider token file paths
///
/// Paths may start with `~`, expanded when the file is opened.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvFiles {
    /// GitHub token file
    pub github_token: Option<PathBuf>,
    /// GitLab token file
    pub gitlab_token: Option<PathBuf>,
    /// Gitea token file
    pub gitea_token: Option<PathBuf>,
}

impl EnvFiles {
    /// Configured path for a provider; empty paths count as unset
    pub fn get(&self, provider: ProviderToken) -> Option<&Path> {
        let path = match provider {
            ProviderToken::GitHub => self.github_token.as_deref(),
            ProviderToken::GitLab => self.gitlab_token.as_deref(),
            ProviderToken::Gitea => self.gitea_token.as_deref(),
        };
        path.filter(|p| !p.as_os_str().is_empty())
    }

    /// Set the path for a provider
    pub fn set(&mut self, provider: ProviderToken, path: impl Into<PathBuf>) {
        let slot = match provider {
            ProviderToken::GitHub => &mut self.github_token,
            ProviderToken::GitLab => &mut self.gitlab_token,
            ProviderToken::Gitea => &mut self.gitea_token,
        };
        *slot = Some(path.into());
    }
}

/// Fill unset token file paths with `~/.config/shipr/<provider>_token`
///
/// Explicit paths are left untouched.
pub fn set_default_token_files(files: &mut EnvFiles) {
    for provider in ProviderToken::ALL {
        if files.get(provider).is_none() {
            files.set(provider, provider.default_token_file());
        }
    }
}

/// Release settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Release {
    /// Disable expression; publishing is off when it renders to `"true"`
    #[serde(deserialize_with = "bool_or_string")]
    pub disable: String,
}

/// Accept `disable = true` as well as `disable = "{{ ... }}"`
fn bool_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    Ok(match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => b.to_string(),
        BoolOrString::String(s) => s,
    })
}
