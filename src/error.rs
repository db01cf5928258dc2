//! Error types for shipr

use crate::template::TemplateError;
use crate::types::ProviderToken;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by pipes and configuration loading
#[derive(Debug, Error)]
pub enum Error {
    /// A template in an env declaration or the release-disable flag failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A token file exists but could not be opened or read
    #[error("failed to load {} token: open {}: {source}", .provider.label(), .path.display())]
    FileRead {
        /// Provider whose token file failed
        provider: ProviderToken,
        /// Path after `~` expansion
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Publishing needs a credential and none could be resolved
    #[error(
        "missing GITHUB_TOKEN, GITLAB_TOKEN and GITEA_TOKEN\n\nLearn more at https://shipr.dev/errors/missing-token\n"
    )]
    MissingToken,

    /// More than one provider credential was found
    #[error(
        "multiple tokens found, but only one is allowed: {}\n\nLearn more at https://shipr.dev/errors/multiple-tokens\n",
        .0.join(", ")
    )]
    MultipleTokens(Vec<String>),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
