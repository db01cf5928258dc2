//! Env pipe: environment expansion and publishing-credential resolution
//!
//! Two steps, always in this order:
//! 1. Expand - render the project's `KEY=VALUE` declarations into the run env
//! 2. Resolve - find exactly one of `GITHUB_TOKEN`, `GITLAB_TOKEN`,
//!    `GITEA_TOKEN` (or their token files)
//!
//! Expansion runs first so the release-disable flag can reference declared
//! variables.

mod expand;
mod token;

pub use expand::expand_env;
pub use token::{expand_home, read_token_file, resolve_credential};

use super::Pipe;
use crate::context::RunContext;
use crate::env::{EnvProvider, ProcessEnv};
use crate::error::Result;
use crate::template::{TemplateEngine, TextTemplate};

/// Loads the run environment and the publishing token
pub struct EnvPipe {
    env: Box<dyn EnvProvider>,
    engine: Box<dyn TemplateEngine>,
}

impl EnvPipe {
    /// Pipe reading the process environment
    pub fn new() -> Self {
        Self::with_env(ProcessEnv::new())
    }

    /// Pipe reading tokens from a custom environment provider
    pub fn with_env(env: impl EnvProvider + 'static) -> Self {
        Self {
            env: Box::new(env),
            engine: Box::new(TextTemplate),
        }
    }

    /// Replace the template engine
    #[must_use]
    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }
}

impl Default for EnvPipe {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipe for EnvPipe {
    fn description(&self) -> &'static str {
        "loading environment variables"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        expand_env(ctx, self.engine.as_ref())?;
        resolve_credential(ctx, self.env.as_ref(), self.engine.as_ref())
    }
}
