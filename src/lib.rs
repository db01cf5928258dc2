//! shipr - environment and publishing-credential resolution for release
//! pipelines
//!
//! The env pipe renders the project's `KEY=VALUE` declarations into the run
//! environment and resolves exactly one publishing token (GitHub, GitLab or
//! Gitea) from environment variables or token files.
//!
//! ```no_run
//! use shipr::config::load_project;
//! use shipr::context::RunContext;
//! use shipr::pipe::{EnvPipe, Pipe};
//! use std::path::Path;
//!
//! # fn main() -> shipr::error::Result<()> {
//! let project = load_project(Path::new("shipr.toml"))?;
//! let mut ctx = RunContext::from_process_env(project);
//! EnvPipe::new().run(&mut ctx)?;
//! println!("publishing with {:?}", ctx.token_type());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod pipe;
pub mod template;
pub mod types;

pub use context::RunContext;
pub use error::{Error, Result};
pub use types::{ProviderToken, ResolvedCredential, TokenSource};
