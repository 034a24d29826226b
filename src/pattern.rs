//! Repository name pattern compilation and filtering
//!
//! A pattern is an extended-regex expression matched against *entire*
//! repository names: `ap.*` matches `api` but `api` does not match
//! `my-api-client`. A blank pattern means "everything" and is substituted
//! with `.*` before compilation, so an untouched input field never filters
//! anything out.

use regex::Regex;

use crate::error::{Error, Result};

/// The pattern substituted for blank input: match every repository.
pub const MATCH_ALL: &str = ".*";

/// A validated repository name matcher with full-string semantics.
///
/// Construction goes through [`compile`]; an instance always produces a
/// match decision for any candidate string. There is no "matches nothing"
/// degraded state: invalid input fails compilation instead.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    /// The pattern text as the user entered it (blank input is kept blank
    /// here even though `.*` was compiled), for echoing back in messages.
    source: String,
}

impl CompiledPattern {
    /// The pattern text this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `name` matches the pattern in its entirety.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Filter `names` down to those matching the pattern.
    ///
    /// Preserves input order; applying the same pattern to its own output
    /// is a no-op.
    pub fn filter<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|name| self.matches(name))
            .map(|name| name.to_string())
            .collect()
    }
}

/// Compile a user-supplied pattern into a full-string matcher.
///
/// Blank input (empty or whitespace-only) is treated as [`MATCH_ALL`].
/// Invalid regex syntax yields [`Error::InvalidPattern`] carrying the
/// offending text and the regex engine's diagnostic.
pub fn compile(pattern: &str) -> Result<CompiledPattern> {
    let effective = if pattern.trim().is_empty() {
        MATCH_ALL
    } else {
        pattern
    };

    // Anchor for full-string semantics; the non-capturing group keeps
    // alternations like `a|b` from escaping the anchors.
    let anchored = format!("^(?:{})$", effective);
    let regex = Regex::new(&anchored).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(CompiledPattern {
        regex,
        source: pattern.to_string(),
    })
}

/// Check whether a pattern would compile, without keeping the matcher.
///
/// Used by step validation to warn about bad input before execution.
pub fn check(pattern: &str) -> Result<()> {
    compile(pattern).map(|_| ())
}
