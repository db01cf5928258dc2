//! Template execution - nodes and data in, text out

use super::parse::{Action, CommandKind, Node, Operand};
use super::{TemplateData, TemplateError};

/// Render parsed nodes against `data`
pub(super) fn execute(nodes: &[Node], data: &TemplateData<'_>) -> Result<String, TemplateError> {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(action) => out.push_str(&eval_action(action, data)?),
        }
    }
    Ok(out)
}

fn eval_action(action: &Action, data: &TemplateData<'_>) -> Result<String, TemplateError> {
    let mut value: Option<String> = None;

    for cmd in &action.commands {
        let fail = |message: String| TemplateError::Exec {
            line: action.line,
            column: cmd.column,
            action: cmd.source.clone(),
            message,
        };

        let result = match &cmd.kind {
            CommandKind::Operand(op) => eval_operand(op, data).map_err(&fail)?,
            CommandKind::Call { func, args } => {
                let mut values = args
                    .iter()
                    .map(|arg| eval_operand(arg, data))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(&fail)?;
                values.extend(value.take());
                if values.len() != func.arity() {
                    return Err(fail(format!(
                        "wrong number of args for {}: want {} got {}",
                        func.name(),
                        func.arity(),
                        values.len()
                    )));
                }
                func.apply(&values)
            }
        };
        value = Some(result);
    }

    Ok(value.unwrap_or_default())
}

fn eval_operand(op: &Operand, data: &TemplateData<'_>) -> Result<String, String> {
    let path = match op {
        Operand::Str(s) => return Ok(s.clone()),
        Operand::Field(path) => path.as_slice(),
    };

    let (value, rest) = match path {
        [] => return Err("can't print the data context".to_string()),
        [env] if env == "Env" => return Err("can't print map .Env".to_string()),
        [env, key, rest @ ..] if env == "Env" => (data.env(key), (key, rest)),
        [name, rest @ ..] => (data.field(name), (name, rest)),
    };

    let (key, rest) = rest;
    let value = value.ok_or_else(|| format!("map has no entry for key {key:?}"))?;
    match rest.first() {
        Some(field) => Err(format!("can't evaluate field {field} in type string")),
        None => Ok(value.to_string()),
    }
}
