//! Integration tests against the real process environment
//!
//! Token variables are shadowed through `ProcessEnv` overrides, so a token
//! exported by the surrounding shell never leaks into a test.

mod common;

use common::isolated_project;
use shipr::context::RunContext;
use shipr::env::{EnvProvider, ProcessEnv};
use shipr::error::Error;
use shipr::pipe::{EnvPipe, Pipe, run_pipes};
use shipr::types::ProviderToken;
use tempfile::TempDir;

/// Process environment with every provider token unset
fn process_env_without_tokens() -> ProcessEnv {
    let mut env = ProcessEnv::new();
    for provider in ProviderToken::ALL {
        env.unset(provider.env_var());
    }
    env
}

#[test]
fn test_process_env_token() {
    let temp = TempDir::new().unwrap();
    let mut env = process_env_without_tokens();
    env.set("GITLAB_TOKEN", "qwertz");

    let mut ctx = RunContext::new(isolated_project(&temp), &env);
    EnvPipe::with_env(env).run(&mut ctx).unwrap();

    assert_eq!(ctx.token(), Some("qwertz"));
    assert_eq!(ctx.token_type(), Some(ProviderToken::GitLab));
    assert!(!std::env::var("GITLAB_TOKEN").is_ok_and(|v| v == "qwertz"));
}

#[test]
fn test_process_env_multiple_tokens() {
    let temp = TempDir::new().unwrap();
    let mut env = process_env_without_tokens();
    env.set("GITHUB_TOKEN", "asdf");
    env.set("GITEA_TOKEN", "token");

    let mut ctx = RunContext::new(isolated_project(&temp), &env);
    let result = EnvPipe::with_env(env).run(&mut ctx);

    match result {
        Err(Error::MultipleTokens(names)) => assert_eq!(names, ["GITHUB_TOKEN", "GITEA_TOKEN"]),
        other => panic!("Expected MultipleTokens error, got: {other:?}"),
    }
}

#[test]
fn test_process_env_visible_to_templates() {
    let temp = TempDir::new().unwrap();
    let mut env = process_env_without_tokens();
    env.set("SHIPR_IT_BAR", "lebar");

    let mut project = isolated_project(&temp);
    project.env = vec!["SHIPR_IT_FOO=FOO_{{ .Env.SHIPR_IT_BAR }}".to_string()];
    let mut ctx = RunContext::new(project, &env);
    ctx.skip_publish = true;

    let pipe = EnvPipe::with_env(env.clone());
    run_pipes(&[&pipe], &mut ctx).unwrap();

    assert_eq!(ctx.env["SHIPR_IT_FOO"], "FOO_lebar");
    assert!(ctx.token().is_none());
    // expansion only touches the run environment
    assert!(env.get("SHIPR_IT_FOO").is_none());
}

#[test]
fn test_real_process_variables_reach_templates() {
    let Some((name, value)) = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .find(|(k, _)| {
            k.starts_with(|c: char| c.is_ascii_alphabetic())
                && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && ProviderToken::ALL.iter().all(|p| p.env_var() != k)
        })
    else {
        return;
    };

    let temp = TempDir::new().unwrap();
    let env = process_env_without_tokens();
    let mut project = isolated_project(&temp);
    project.env = vec![format!("SHIPR_IT_COPY={{{{ .Env.{name} }}}}")];
    let mut ctx = RunContext::new(project, &env);
    ctx.skip_publish = true;

    EnvPipe::with_env(env).run(&mut ctx).unwrap();

    assert_eq!(ctx.env["SHIPR_IT_COPY"], value);
}

#[test]
fn test_process_env_missing_token() {
    let temp = TempDir::new().unwrap();
    let env = process_env_without_tokens();

    let mut ctx = RunContext::new(isolated_project(&temp), &env);
    let result = EnvPipe::with_env(env).run(&mut ctx);

    assert!(matches!(result, Err(Error::MissingToken)));
}

#[test]
fn test_description() {
    assert_eq!(EnvPipe::new().description(), "loading environment variables");
}
