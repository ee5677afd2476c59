//! Narrow helpers for pulling typed fields out of third-party markup.
//!
//! The gallery sites expose no APIs, so fields come from meta tags, inline
//! script variables, and table cells. Each site's extraction goes through
//! this seam and returns a typed error when a required field is missing,
//! so upstream markup drift fails loudly instead of producing zeroed
//! records.

use std::error::Error;
use std::fmt;

use regex::Regex;

/// A required field could not be located in the fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The named field had no match in the document.
    MissingField {
        /// Human-readable field name, e.g. `"title"`.
        field: &'static str,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing field `{field}` in page"),
        }
    }
}

impl Error for ExtractError {}

/// Returns the first capture group of the first match, if any.
pub fn capture<'h>(html: &'h str, re: &Regex) -> Option<&'h str> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`capture`], but a miss is an [`ExtractError`] naming the field.
pub fn require<'h>(html: &'h str, re: &Regex, field: &'static str) -> Result<&'h str, ExtractError> {
    capture(html, re).ok_or(ExtractError::MissingField { field })
}

/// Strips markup tags and unescapes the handful of entities the gallery
/// sites actually emit, then trims.
pub fn clean_text(s: &str) -> String {
    let tag_re = tag_regex();
    tag_re
        .replace_all(s, "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .trim()
        .to_string()
}

fn tag_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new("<[^>]*>").unwrap())
}
