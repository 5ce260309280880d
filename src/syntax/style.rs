//! Style types for highlighted text
//!
//! A `Style` is the set of visual attributes a rule asks for. The
//! host surface decides how to paint it; `render` maps it onto ANSI.

use super::tokens::TokenType;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Parse a color name as written in rule files
    ///
    /// Accepts `bright-blue`, `bright_blue` and `brightblue`; `gray`/`grey`
    /// map to `BrightBlack` like most terminal themes.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let color = match normalized.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A styled region of one line
///
/// `start` and `length` count chars (code points), not bytes, so a
/// span can be handed to any surface that indexes text by character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Char offset where this span starts
    pub start: usize,
    /// Number of chars covered, always at least 1
    pub length: usize,
    /// Token type of the rule that produced the span
    pub token: TokenType,
    /// Style to apply to this span
    pub style: Style,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, length: usize, token: TokenType, style: Style) -> Self {
        Self {
            start,
            length,
            token,
            style,
        }
    }

    /// Char offset one past the end of the span
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Check if this span contains a char position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Check whether two spans share at least one char
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert!(style.is_default());
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.bold);
    }

    #[test]
    fn test_style_builders() {
        let style = Style::fg(Color::Red).with_bold().with_bg(Color::Blue).with_italic();
        assert_eq!(style.fg, Color::Red);
        assert_eq!(style.bg, Color::Blue);
        assert!(style.bold);
        assert!(style.italic);
        assert!(!style.underline);
        assert!(!style.is_default());
    }

    #[test]
    fn test_color_names() {
        assert_eq!(Color::from_name("blue"), Some(Color::Blue));
        assert_eq!(Color::from_name("Bright-Blue"), Some(Color::BrightBlue));
        assert_eq!(Color::from_name("bright_cyan"), Some(Color::BrightCyan));
        assert_eq!(Color::from_name("gray"), Some(Color::BrightBlack));
        assert_eq!(Color::from_name("mauve"), None);
    }

    #[test]
    fn test_span_contains() {
        let span = Span::new(5, 5, TokenType::Keyword, Style::default());
        assert_eq!(span.end(), 10);
        assert!(!span.contains(4));
        assert!(span.contains(5));
        assert!(span.contains(9));
        assert!(!span.contains(10));
    }

    #[test]
    fn test_span_overlaps() {
        let a = Span::new(0, 4, TokenType::String, Style::default());
        let b = Span::new(4, 2, TokenType::Comment, Style::default());
        let c = Span::new(3, 2, TokenType::Comment, Style::default());
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
