//! Pipeline steps
//!
//! Each release step implements [`Pipe`]; the driver runs them in order
//! against one [`RunContext`] and stops at the first failure.

mod env;

pub use env::{EnvPipe, expand_env, expand_home, read_token_file, resolve_credential};

use crate::context::RunContext;
use crate::error::Result;
use tracing::{info, warn};

/// A single pipeline step
///
/// Pipes mutate the context in place. Errors are terminal for the run; pipes
/// never retry.
pub trait Pipe {
    /// Short human description, logged when the pipe starts
    fn description(&self) -> &'static str;

    /// Run the step
    fn run(&self, ctx: &mut RunContext) -> Result<()>;
}

/// Run pipes in order, returning the first error
pub fn run_pipes(pipes: &[&dyn Pipe], ctx: &mut RunContext) -> Result<()> {
    for pipe in pipes {
        info!("{}", pipe.description());
        pipe.run(ctx).inspect_err(|e| {
            warn!(pipe = pipe.description(), error = %e, "pipe failed");
        })?;
    }
    Ok(())
}
