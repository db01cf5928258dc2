//! Shared fixtures for shipr tests
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use shipr::config::Project;
use shipr::context::RunContext;
use shipr::env::{EnvProvider, MapEnv};
use shipr::error::Result;
use shipr::pipe::{EnvPipe, Pipe};
use shipr::types::ProviderToken;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A project whose token files all point at missing files in `dir`
///
/// Keeps tests away from the real `~/.config/shipr` token files.
pub fn isolated_project(dir: &TempDir) -> Project {
    let mut project = Project::default();
    for provider in ProviderToken::ALL {
        project
            .env_files
            .set(provider, dir.path().join(format!("missing_{}", provider.file_name())));
    }
    project
}

/// Write `content` to `dir/name`
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Context whose `.Env` is seeded from `env`
pub fn context(project: Project, env: &dyn EnvProvider) -> RunContext {
    RunContext::new(project, env)
}

/// Run the env pipe against `ctx`, probing tokens from `env`
pub fn run_env_pipe(ctx: &mut RunContext, env: MapEnv) -> Result<()> {
    EnvPipe::with_env(env).run(ctx)
}

/// Seed a context from `env` and run the env pipe on it
pub fn run(project: Project, env: MapEnv) -> (RunContext, Result<()>) {
    let mut ctx = context(project, &env);
    let result = run_env_pipe(&mut ctx, env);
    (ctx, result)
}
