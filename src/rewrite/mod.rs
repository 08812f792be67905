use regex::Regex;
use thiserror::Error;

use crate::domain::UrlRewrite;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("pattern `{pattern}`: {message}")]
pub struct RewriteError {
    pub pattern: String,
    pub message: String,
}

/// Replaces every non-overlapping match of `pattern` in `url`.
///
/// Group references in `replacement` use `$1` / `${name}` syntax.
pub fn rewrite(url: &str, pattern: &str, replacement: &str) -> Result<String, RewriteError> {
    let re = compile(pattern)?;
    Ok(re.replace_all(url, replacement).into_owned())
}

/// Checks that a pattern compiles without applying it.
pub fn validate(pattern: &str) -> Result<(), RewriteError> {
    compile(pattern).map(|_| ())
}

/// Applies an optional rewrite. On a bad pattern the original URL comes back
/// together with the error so the caller can report it.
pub fn apply(url: &str, rule: Option<&UrlRewrite>) -> (String, Option<RewriteError>) {
    let Some(rule) = rule else {
        return (url.to_string(), None);
    };
    match rewrite(url, &rule.pattern, &rule.replacement) {
        Ok(rewritten) => (rewritten, None),
        Err(e) => (url.to_string(), Some(e)),
    }
}

fn compile(pattern: &str) -> Result<Regex, RewriteError> {
    Regex::new(pattern).map_err(|e| RewriteError {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
