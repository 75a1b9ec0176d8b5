// Query pattern matching.
// User-typed filters are unanchored regexes; invalid ones fall back to plain substrings.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Filter built from one query token.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Empty token, matches everything.
    Any,
    Regex(Regex),
    /// Token that is not a valid regex, matched as a substring.
    Literal { needle: String, case_insensitive: bool },
}

impl Pattern {
    /// Case-sensitive pattern.
    pub fn new(token: &str) -> Self {
        Self::build(token, false)
    }

    pub fn case_insensitive(token: &str) -> Self {
        Self::build(token, true)
    }

    fn build(token: &str, case_insensitive: bool) -> Self {
        if token.is_empty() {
            return Pattern::Any;
        }

        match RegexBuilder::new(token)
            .case_insensitive(case_insensitive)
            .build()
        {
            Ok(regex) => Pattern::Regex(regex),
            Err(e) => {
                debug!("matching {:?} literally: {}", token, e);
                let needle = if case_insensitive {
                    token.to_lowercase()
                } else {
                    token.to_string()
                };
                Pattern::Literal {
                    needle,
                    case_insensitive,
                }
            }
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Regex(regex) => regex.is_match(haystack),
            Pattern::Literal {
                needle,
                case_insensitive: true,
            } => haystack.to_lowercase().contains(needle.as_str()),
            Pattern::Literal { needle, .. } => haystack.contains(needle.as_str()),
        }
    }
}
