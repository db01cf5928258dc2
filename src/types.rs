//! Core types for shipr

use serde::{Deserialize, Serialize};

/// Application directory name under `~/.config`
pub const APP_NAME: &str = "shipr";

/// Hosting platform a publishing token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderToken {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
    /// Gitea or Forgejo
    Gitea,
}

impl ProviderToken {
    /// All providers, in the order they are checked and reported
    pub const ALL: [Self; 3] = [Self::GitHub, Self::GitLab, Self::Gitea];

    /// Environment variable holding the token
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::GitHub => "GITHUB_TOKEN",
            Self::GitLab => "GITLAB_TOKEN",
            Self::Gitea => "GITEA_TOKEN",
        }
    }

    /// File name of the token file in the config directory
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::GitHub => "github_token",
            Self::GitLab => "gitlab_token",
            Self::Gitea => "gitea_token",
        }
    }

    /// Lowercase label used in error messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Gitea => "gitea",
        }
    }

    /// Default token file path, with an unexpanded `~`
    pub fn default_token_file(self) -> String {
        format!("~/.config/{APP_NAME}/{}", self.file_name())
    }
}

impl std::fmt::Display for ProviderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
            Self::Gitea => write!(f, "Gitea"),
        }
    }
}

/// Where a token candidate was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Token from environment variable
    EnvVar,
    /// Token from a token file
    File,
}

/// The single publishing credential of a run
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    /// Token value
    pub value: String,
    /// Provider the token belongs to
    pub kind: ProviderToken,
}

// Keep token values out of logs and panic messages
impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("value", &"<redacted>")
            .field("kind", &self.kind)
            .finish()
    }
}
