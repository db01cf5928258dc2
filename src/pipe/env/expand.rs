//! Rendering `KEY=VALUE` declarations into the run environment

use crate::context::RunContext;
use crate::env::split_declaration;
use crate::error::Result;
use crate::template::TemplateEngine;
use tracing::{debug, warn};

/// Render every declaration of `ctx.config.env` into `ctx.env`
///
/// Declarations are applied in order, so later values can reference earlier
/// ones through `.Env`. Existing keys are overwritten. The first template
/// error aborts; values assigned before it are kept.
pub fn expand_env(ctx: &mut RunContext, engine: &dyn TemplateEngine) -> Result<()> {
    for decl in &ctx.config.env {
        let Some((key, raw)) = split_declaration(decl) else {
            warn!(declaration = %decl, "ignoring env declaration not in KEY=VALUE form");
            continue;
        };

        let value = engine.render(raw, &ctx.template_data())?;
        debug!(key, "set env");
        ctx.env.insert(key.to_string(), value);
    }
    Ok(())
}
