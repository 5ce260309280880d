//! Token types for syntax highlighting
//!
//! This module defines the semantic token types a rule can tag its
//! matches with, and their default visual styles.

use super::style::{Color, Style};

/// Semantic token types for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Comments (`# ...`)
    Comment,
    /// String literals ("..." or '...')
    String,
    /// Numeric literals
    Number,
    /// Language keywords (def, if, while, ...)
    Keyword,
    /// Built-in function names
    Function,
    /// Operators (+, -, *, /, etc.)
    Operator,
    /// Constants (True, None, ...)
    Constant,
    /// Decorators and similar annotations
    Attribute,
    /// Plain text
    Default,
}

impl TokenType {
    /// Get the default style for this token type
    pub fn default_style(&self) -> Style {
        match self {
            TokenType::Comment => Style::fg(Color::BrightBlack),
            TokenType::String => Style::fg(Color::Green),
            TokenType::Number => Style::fg(Color::Cyan),
            TokenType::Keyword => Style::fg(Color::Blue),
            TokenType::Function => Style::fg(Color::Yellow),
            TokenType::Operator => Style::fg(Color::BrightWhite),
            TokenType::Constant => Style::fg(Color::BrightRed),
            TokenType::Attribute => Style::fg(Color::BrightBlue),
            TokenType::Default => Style::default(),
        }
    }

    /// Get a human-readable name for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Comment => "Comment",
            TokenType::String => "String",
            TokenType::Number => "Number",
            TokenType::Keyword => "Keyword",
            TokenType::Function => "Function",
            TokenType::Operator => "Operator",
            TokenType::Constant => "Constant",
            TokenType::Attribute => "Attribute",
            TokenType::Default => "Default",
        }
    }

    /// Parse a token type from its name (rule files use these)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Comment" => Some(TokenType::Comment),
            "String" => Some(TokenType::String),
            "Number" => Some(TokenType::Number),
            "Keyword" => Some(TokenType::Keyword),
            "Function" => Some(TokenType::Function),
            "Operator" => Some(TokenType::Operator),
            "Constant" => Some(TokenType::Constant),
            "Attribute" => Some(TokenType::Attribute),
            "Default" => Some(TokenType::Default),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        assert_eq!(TokenType::Keyword.default_style().fg, Color::Blue);
        assert_eq!(TokenType::String.default_style().fg, Color::Green);
        assert_eq!(TokenType::Comment.default_style().fg, Color::BrightBlack);
        assert!(TokenType::Default.default_style().is_default());
    }

    #[test]
    fn test_from_name() {
        for token in [TokenType::Comment, TokenType::String, TokenType::Keyword, TokenType::Default] {
            assert_eq!(TokenType::from_name(token.name()), Some(token));
        }
        assert_eq!(TokenType::from_name("keyword"), None);
        assert_eq!(TokenType::from_name(""), None);
    }
}
