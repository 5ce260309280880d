//! Pattern rules for syntax highlighting
//!
//! A rule is a compiled regex tagged with a token type and a style.
//! Rules are plain data; a `RuleSet` keeps them in application order.

use regex::{Match, Regex};

use super::style::Style;
use super::tokens::TokenType;
use crate::error::{CodepadError, Result};

/// A single-line pattern rule
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Name for debugging and error messages
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Token type to assign to matches
    pub token: TokenType,
    /// Style painted over matches
    pub style: Style,
    /// Whether matches of this rule hide later rules' matches that start
    /// inside them (string literals hide `#`)
    pub masks_later: bool,
}

impl StyleRule {
    /// Compile a rule using the token's default style
    pub fn new(name: &str, pattern: &str, token: TokenType) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| CodepadError::Pattern {
            rule: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            token,
            style: token.default_style(),
            masks_later: false,
        })
    }

    /// Builder: override the style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Builder: let this rule's matches mask later rules
    pub fn masking(mut self) -> Self {
        self.masks_later = true;
        self
    }

    /// Find the first match starting at or after byte position `start`
    ///
    /// The whole line stays visible to the regex, so `\b` and anchors
    /// look at the text before `start`.
    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        if start > text.len() {
            return None;
        }
        self.pattern.find_at(text, start)
    }
}
