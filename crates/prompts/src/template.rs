//! `{name}` placeholder substitution.

use crate::{PromptError, Result};
use std::collections::HashMap;

/// Render `template`, replacing each `{name}` with `vars[name]`.
///
/// Substituted values are inserted verbatim and never re-scanned, so content
/// containing braces is safe. `{{` and `}}` produce literal braces. Braces
/// that do not enclose an identifier are copied through unchanged.
pub fn render(action: &str, template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        match placeholder(tail) {
            Some(name) => {
                let value = vars.get(name).ok_or_else(|| PromptError::MissingVariable {
                    action: action.to_string(),
                    variable: name.to_string(),
                })?;
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Placeholder names used by `template`, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            rest = &tail[2..];
            continue;
        }
        match placeholder(tail) {
            Some(name) => {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                rest = &tail[name.len() + 2..];
            }
            None => rest = &tail[1..],
        }
    }
    names
}

/// `tail` starts with `{`; returns the identifier if it is `{ident}`.
fn placeholder(tail: &str) -> Option<&str> {
    let close = tail.find('}')?;
    let name = &tail[1..close];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}
