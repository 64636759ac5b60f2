//! Rewrites yellow-background spans into `<mark>` elements.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

/// Matches `<span …background:yellow…>`, `background-color:yellow`, and the
/// `#ffff00` / `ffff00` spellings of both properties. The capture is
/// non-greedy, so a nested `</span>` ends the match early.
const YELLOW_SPAN: &str =
    r"<span[^>]*background(?:-color)?\s*:\s*(?:yellow|#?ffff00)[^>]*>(.*?)</span>";

/// Compiled highlight rewrite rule.
#[derive(Debug, Clone)]
pub struct HighlightRewriter {
    pattern: Regex,
}

impl HighlightRewriter {
    /// Compiles the rewrite rule.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error (only possible if the built-in
    /// pattern is broken).
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(YELLOW_SPAN)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// Replaces every yellow-background span in `html` with `<mark>`.
    #[must_use]
    pub fn rewrite<'a>(&self, html: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(html, "<mark>${1}</mark>")
    }
}
