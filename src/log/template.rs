//! Positional `{}` templates.
//!
//! A template is a literal with `{}` placeholders filled in order. `{{` and
//! `}}` stand for literal braces; any other brace is malformed. The scanning
//! functions are `const` so the logging macros can reject a mismatched
//! literal at compile time.

use std::fmt::{Display, Write};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unmatched brace at byte {offset} in template {template:?}")]
    Malformed {
        template: &'static str,
        offset: usize,
    },
    #[error("template {template:?} has {placeholders} placeholder(s) but {arguments} argument(s) were supplied")]
    ArgumentCount {
        template: &'static str,
        placeholders: usize,
        arguments: usize,
    },
}

/// Walks the template. `Ok(n)` is the number of `{}`; `Err(offset)` points
/// at the first stray brace.
const fn scan(template: &str) -> Result<usize, usize> {
    let b = template.as_bytes();
    let mut i = 0;
    let mut n = 0;
    while i < b.len() {
        let next = if i + 1 < b.len() { b[i + 1] } else { 0 };
        match b[i] {
            b'{' if next == b'{' => i += 2,
            b'{' if next == b'}' => {
                n += 1;
                i += 2;
            }
            b'}' if next == b'}' => i += 2,
            b'{' | b'}' => return Err(i),
            _ => i += 1,
        }
    }
    Ok(n)
}

/// Number of `{}` placeholders; zero for a malformed template.
#[must_use]
pub const fn placeholder_count(template: &str) -> usize {
    match scan(template) {
        Ok(n) => n,
        Err(_) => 0,
    }
}

#[must_use]
pub const fn is_well_formed(template: &str) -> bool {
    scan(template).is_ok()
}

/// Checks that `template` is well formed and takes exactly `arguments` values.
///
/// Both surplus and missing arguments are rejected; nothing is truncated.
pub fn validate(template: &'static str, arguments: usize) -> Result<(), TemplateError> {
    let placeholders =
        scan(template).map_err(|offset| TemplateError::Malformed { template, offset })?;
    if placeholders != arguments {
        return Err(TemplateError::ArgumentCount {
            template,
            placeholders,
            arguments,
        });
    }
    Ok(())
}

/// Substitutes `args` into `template` in order.
pub fn render<T: Display>(template: &'static str, args: &[T]) -> Result<String, TemplateError> {
    validate(template, args.len())?;
    Ok(render_unchecked(template, args))
}

/// Rendering for a template already accepted by [`validate`].
pub(crate) fn render_unchecked<T: Display>(template: &str, args: &[T]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{}") {
            if let Some(arg) = args.next() {
                let _ = write!(out, "{arg}");
            }
        } else {
            // `{{` or `}}`
            out.push_str(&tail[..1]);
        }
        rest = &tail[2..];
    }
    out.push_str(rest);
    out
}
