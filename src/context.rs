//! Per-run state shared by pipes
//!
//! A `RunContext` is created by the pipeline driver, mutated in place by each
//! pipe and discarded when the run ends.

use crate::config::Project;
use crate::env::{EnvProvider, EnvironmentMap, ProcessEnv};
use crate::template::TemplateData;
use crate::types::{ProviderToken, ResolvedCredential};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// State of a single release run
#[derive(Clone)]
pub struct RunContext {
    /// Project configuration
    pub config: Project,
    /// Environment visible to templates and later pipes
    pub env: EnvironmentMap,
    /// Publishing credential, set by the env pipe
    pub credential: Option<ResolvedCredential>,
    /// Publishing is skipped for this run
    pub skip_publish: bool,
    /// Do not require a credential even when publishing
    pub skip_token_check: bool,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

// Env values often hold secrets, so only variable names are printed.
impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("config", &self.config)
            .field("env", &self.env.keys().collect::<BTreeSet<_>>())
            .field("credential", &self.credential)
            .field("skip_publish", &self.skip_publish)
            .field("skip_token_check", &self.skip_token_check)
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl RunContext {
    /// Create a context whose environment is seeded from `env`
    pub fn new(config: Project, env: &dyn EnvProvider) -> Self {
        Self {
            config,
            env: env.vars().into_iter().collect(),
            credential: None,
            skip_publish: false,
            skip_token_check: false,
            started_at: Utc::now(),
        }
    }

    /// Create a context seeded from the process environment
    pub fn from_process_env(config: Project) -> Self {
        Self::new(config, &ProcessEnv::new())
    }

    /// Resolved token value, if any
    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.value.as_str())
    }

    /// Provider of the resolved token, if any
    pub fn token_type(&self) -> Option<ProviderToken> {
        self.credential.as_ref().map(|c| c.kind)
    }

    /// Template data for this run
    ///
    /// Exposes `.Env`, `.ProjectName`, `.Date` (RFC 3339) and `.Timestamp`
    /// (Unix seconds).
    pub fn template_data(&self) -> TemplateData<'_> {
        TemplateData::new(&self.env)
            .with_field("ProjectName", self.config.project_name.clone())
            .with_field("Date", self.started_at.to_rfc3339())
            .with_field("Timestamp", self.started_at.timestamp().to_string())
    }
}
