//! Publishing token discovery
//!
//! Each provider is checked independently: its environment variable first,
//! then its token file. Exactly one provider may yield a token.

use crate::config::set_default_token_files;
use crate::context::RunContext;
use crate::env::EnvProvider;
use crate::error::{Error, Result};
use crate::template::TemplateEngine;
use crate::types::{ProviderToken, ResolvedCredential, TokenSource};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A non-empty token found for one provider
struct Candidate {
    kind: ProviderToken,
    value: String,
    source: TokenSource,
    /// Token file the value came from, after `~` expansion
    path: Option<PathBuf>,
}

/// Resolve the run's publishing credential into `ctx.credential`
///
/// Fails with [`Error::MultipleTokens`] when more than one provider has a
/// token, and with [`Error::MissingToken`] when none has one and publishing
/// is neither skipped nor disabled by `release.disable`.
pub fn resolve_credential(
    ctx: &mut RunContext,
    env: &dyn EnvProvider,
    engine: &dyn TemplateEngine,
) -> Result<()> {
    set_default_token_files(&mut ctx.config.env_files);

    let mut candidates = Vec::new();
    for provider in ProviderToken::ALL {
        let file = ctx.config.env_files.get(provider);
        if let Some(candidate) = find_candidate(env, provider, file)? {
            debug!(provider = %provider, source = ?candidate.source, "found token");
            candidates.push(candidate);
        }
    }

    if candidates.len() > 1 {
        return Err(Error::MultipleTokens(conflicting_names(&candidates)));
    }

    if let Some(candidate) = candidates.pop() {
        info!(provider = %candidate.kind, "using {} token", candidate.kind);
        ctx.credential = Some(ResolvedCredential {
            value: candidate.value,
            kind: candidate.kind,
        });
        return Ok(());
    }

    if token_required(ctx, engine)? {
        return Err(Error::MissingToken);
    }
    debug!("no token found, publishing does not need one");
    Ok(())
}

/// Names reported for conflicting candidates, in provider order
///
/// Env-sourced tokens are named by their variable. When every candidate came
/// from a file, the token file paths are listed instead.
fn conflicting_names(candidates: &[Candidate]) -> Vec<String> {
    let names: Vec<String> = candidates
        .iter()
        .filter(|c| c.source == TokenSource::EnvVar)
        .map(|c| c.kind.env_var().to_string())
        .collect();
    if !names.is_empty() {
        return names;
    }
    candidates
        .iter()
        .filter_map(|c| c.path.as_ref())
        .map(|path| path.display().to_string())
        .collect()
}

/// Whether this run must have a credential
fn token_required(ctx: &RunContext, engine: &dyn TemplateEngine) -> Result<bool> {
    if ctx.skip_publish || ctx.skip_token_check {
        return Ok(false);
    }
    let disable = engine.render(&ctx.config.release.disable, &ctx.template_data())?;
    Ok(disable != "true")
}

fn find_candidate(
    env: &dyn EnvProvider,
    provider: ProviderToken,
    file: Option<&Path>,
) -> Result<Option<Candidate>> {
    if let Some(value) = env.get(provider.env_var()).filter(|v| !v.is_empty()) {
        return Ok(Some(Candidate {
            kind: provider,
            value,
            source: TokenSource::EnvVar,
            path: None,
        }));
    }

    let Some(file) = file else {
        return Ok(None);
    };
    let path = expand_home(file).map_err(|source| Error::FileRead {
        provider,
        path: file.to_path_buf(),
        source,
    })?;

    let value = read_token_file(&path).map_err(|source| Error::FileRead {
        provider,
        path: path.clone(),
        source,
    })?;

    Ok(value.map(|value| Candidate {
        kind: provider,
        value,
        source: TokenSource::File,
        path: Some(path),
    }))
}

/// Expand a leading `~` component to the home directory
pub fn expand_home(path: &Path) -> io::Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::other("cannot expand ~: home directory not found"))?;
    Ok(home.join(rest))
}

/// Read a token file
///
/// Returns `None` when the file does not exist or holds nothing but a line
/// terminator. Exactly one trailing `\n` (or `\r\n`) is stripped; other
/// whitespace is part of the token.
pub fn read_token_file(path: &Path) -> io::Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let token = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(&content);
    Ok((!token.is_empty()).then(|| token.to_string()))
}
