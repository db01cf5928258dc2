//! Environment providers
//!
//! Process environment access goes through [`EnvProvider`] so pipes can run
//! against an isolated, in-memory environment.

use std::collections::HashMap;

/// Environment variables available to later pipeline stages
pub type EnvironmentMap = HashMap<String, String>;

/// Read/write access to a set of environment variables
pub trait EnvProvider {
    /// Get a variable, `None` if unset
    fn get(&self, name: &str) -> Option<String>;

    /// Set a variable
    fn set(&mut self, name: &str, value: &str);

    /// Remove a variable
    fn unset(&mut self, name: &str);

    /// Snapshot of every variable
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real process environment, with local overrides
///
/// `set` and `unset` never touch the process itself. They record overrides
/// that later `get` and `vars` calls on this value see, so the process
/// environment stays read-only.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    overrides: HashMap<String, Option<String>>,
}

impl ProcessEnv {
    /// Read the process environment with no overrides
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnvProvider for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        match self.overrides.get(name) {
            Some(value) => value.clone(),
            None => std::env::var(name).ok(),
        }
    }

    fn set(&mut self, name: &str, value: &str) {
        self.overrides
            .insert(name.to_string(), Some(value.to_string()));
    }

    fn unset(&mut self, name: &str) {
        self.overrides.insert(name.to_string(), None);
    }

    fn vars(&self) -> Vec<(String, String)> {
        let mut vars: EnvironmentMap = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        for (name, value) in &self.overrides {
            match value {
                Some(value) => vars.insert(name.clone(), value.clone()),
                None => vars.remove(name),
            };
        }
        vars.into_iter().collect()
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: EnvironmentMap,
}

impl MapEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvProvider for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn unset(&mut self, name: &str) {
        self.vars.remove(name);
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Split a `KEY=VALUE` declaration at the first `=`
///
/// Returns `None` when there is no `=` or the key is empty.
pub fn split_declaration(decl: &str) -> Option<(&str, &str)> {
    match decl.split_once('=') {
        Some((key, value)) if !key.is_empty() => Some((key, value)),
        _ => None,
    }
}
