//! Template rendering for env declarations and config flags
//!
//! The syntax is the Go `text/template` subset release configs use:
//! `{{ .Env.NAME }}`, `{{ .ProjectName }}`, string literals, `{{-`/`-}}`
//! whitespace trimming and pipelines through a few string functions.
//!
//! Two phases, mirroring the rest of the crate:
//! 1. Parse - `parse::parse` turns text into nodes (pure)
//! 2. Execute - `exec::execute` evaluates nodes against [`TemplateData`]

mod exec;
mod parse;

use crate::env::EnvironmentMap;
use std::collections::BTreeMap;
use thiserror::Error;

/// Template parse or execution failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Malformed template text
    #[error("template: tmpl:{line}: {message}")]
    Parse {
        /// Line of the failing action (1-based)
        line: usize,
        /// Parser diagnostic
        message: String,
    },

    /// Well-formed template that failed while rendering
    #[error("template: tmpl:{line}:{column}: executing \"tmpl\" at <{action}>: {message}")]
    Exec {
        /// Line of the failing action (1-based)
        line: usize,
        /// Column of the failing command (1-based)
        column: usize,
        /// Source text of the failing command
        action: String,
        /// Evaluation diagnostic
        message: String,
    },
}

/// Values a template can reference
///
/// `.Env.NAME` reads from the environment map, every other `.Name` reads a
/// flat field.
#[derive(Debug, Clone)]
pub struct TemplateData<'a> {
    env: &'a EnvironmentMap,
    fields: BTreeMap<&'static str, String>,
}

impl<'a> TemplateData<'a> {
    /// Data exposing only `.Env`
    pub const fn new(env: &'a EnvironmentMap) -> Self {
        Self {
            env,
            fields: BTreeMap::new(),
        }
    }

    /// Add a flat field, e.g. `ProjectName`
    #[must_use]
    pub fn with_field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.insert(name, value.into());
        self
    }

    /// Look up `.Env.<key>`
    pub fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Look up a flat field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Template engine used by pipes
///
/// Pipes only depend on this trait, so embedders can plug in another
/// implementation.
pub trait TemplateEngine {
    /// Render `text` against `data`
    fn render(&self, text: &str, data: &TemplateData<'_>) -> Result<String, TemplateError>;
}

/// Default engine for the Go-style template subset
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTemplate;

impl TemplateEngine for TextTemplate {
    fn render(&self, text: &str, data: &TemplateData<'_>) -> Result<String, TemplateError> {
        // Plain values are by far the most common declaration
        if !text.contains("{{") {
            return Ok(text.to_string());
        }
        let nodes = parse::parse(text)?;
        exec::execute(&nodes, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvironmentMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn render(text: &str, env: &EnvironmentMap) -> Result<String, TemplateError> {
        let data = TemplateData::new(env).with_field("ProjectName", "foobar");
        TextTemplate.render(text, &data)
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("just text", &env(&[])).unwrap(), "just text");
        assert_eq!(render("", &env(&[])).unwrap(), "");
    }

    #[test]
    fn test_env_and_field_lookup() {
        let env = env(&[("BAR", "lebar")]);
        assert_eq!(render("FOO_{{ .Env.BAR }}", &env).unwrap(), "FOO_lebar");
        assert_eq!(render("{{.ProjectName}}", &env).unwrap(), "foobar");
        assert_eq!(
            render("{{ .ProjectName }}-{{ .Env.BAR }}", &env).unwrap(),
            "foobar-lebar"
        );
    }

    #[test]
    fn test_unclosed_brace_is_parse_error() {
        let err = render("{{ .Asss }", &env(&[])).unwrap_err();
        assert_eq!(err.to_string(), r#"template: tmpl:1: unexpected "}" in operand"#);
    }

    #[test]
    fn test_unclosed_action() {
        let err = render("abc {{ .Env.FOO", &env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "template: tmpl:1: unclosed action");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = render("first\nsecond {{ .X }", &env(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_env_key_is_exec_error() {
        let err = render("{{ .Env.FOO }}", &env(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"template: tmpl:1:4: executing "tmpl" at <.Env.FOO>: map has no entry for key "FOO""#
        );
    }

    #[test]
    fn test_unknown_field_is_exec_error() {
        let err = render("{{ .Nope }}", &env(&[])).unwrap_err();
        assert!(err.to_string().ends_with(r#"map has no entry for key "Nope""#));
    }

    #[test]
    fn test_trim_markers() {
        let env = env(&[("A", "x")]);
        assert_eq!(render("a   {{- .Env.A -}}   b", &env).unwrap(), "axb");
        assert_eq!(render("a {{ .Env.A }} b", &env).unwrap(), "a x b");
    }

    #[test]
    fn test_pipelines_and_functions() {
        let env = env(&[("NAME", "  MixedCase  ")]);
        assert_eq!(
            render("{{ .Env.NAME | trim | tolower }}", &env).unwrap(),
            "mixedcase"
        );
        assert_eq!(render(r#"{{ toupper "abc" }}"#, &env).unwrap(), "ABC");
        assert_eq!(
            render(r#"{{ trimprefix "v1.2.3" "v" }}"#, &env).unwrap(),
            "1.2.3"
        );
        assert_eq!(
            render(r#"{{ trimsuffix "name.tar" ".tar" }}"#, &env).unwrap(),
            "name"
        );
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(
            render(r#"{{ "say \"hi\"\t!" }}"#, &env(&[])).unwrap(),
            "say \"hi\"\t!"
        );
        let err = render(r#"{{ "open }}"#, &env(&[])).unwrap_err();
        assert!(err.to_string().contains("unterminated quoted string"));
    }

    #[test]
    fn test_unknown_function() {
        let err = render("{{ shout .ProjectName }}", &env(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"template: tmpl:1: function "shout" not defined"#
        );
    }

    #[test]
    fn test_wrong_arg_count() {
        let err = render(r#"{{ tolower "a" "b" }}"#, &env(&[])).unwrap_err();
        assert!(
            err.to_string()
                .ends_with("wrong number of args for tolower: want 1 got 2")
        );
    }

    #[test]
    fn test_empty_action() {
        let err = render("{{ }}", &env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "template: tmpl:1: missing value for command");
        let err = render("{{ .ProjectName | }}", &env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "template: tmpl:1: missing value for command");
    }

    #[test]
    fn test_argument_to_non_function() {
        let err = render("{{ .ProjectName .ProjectName }}", &env(&[])).unwrap_err();
        assert!(
            err.to_string()
                .contains("can't give argument to non-function .ProjectName")
        );
    }

    #[test]
    fn test_nested_field_on_string() {
        let env = env(&[("A", "x")]);
        let err = render("{{ .Env.A.B }}", &env).unwrap_err();
        assert!(err.to_string().ends_with("can't evaluate field B in type string"));
    }
}
