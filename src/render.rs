//! Terminal rendering of highlighted text
//!
//! Stands in for the editor surface: paints spans onto a line in
//! emission order, so a later span wins where spans overlap, and writes
//! the result as ANSI-styled text.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use unicode_width::UnicodeWidthChar;

use crate::syntax::{Color, RuleSet, Span, Style};

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Tab stop width in columns
    pub tab_width: usize,
    /// Emit ANSI styling
    pub color: bool,
    /// Prefix lines with their number
    pub line_numbers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            color: true,
            line_numbers: false,
        }
    }
}

fn term_color(color: Color) -> Option<TermColor> {
    let mapped = match color {
        Color::Default => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::White => TermColor::Grey,
        Color::BrightBlack => TermColor::DarkGrey,
        Color::BrightRed => TermColor::Red,
        Color::BrightGreen => TermColor::Green,
        Color::BrightYellow => TermColor::Yellow,
        Color::BrightBlue => TermColor::Blue,
        Color::BrightMagenta => TermColor::Magenta,
        Color::BrightCyan => TermColor::Cyan,
        Color::BrightWhite => TermColor::White,
    };
    Some(mapped)
}

fn apply_style(out: &mut impl Write, style: &Style) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if let Some(fg) = term_color(style.fg) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = term_color(style.bg) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}

/// Render one line; does not write the trailing newline
pub fn render_line(out: &mut impl Write, line: &str, spans: &[Span], options: &RenderOptions) -> io::Result<()> {
    let chars: Vec<char> = line.chars().collect();

    // Paint in emission order; later spans overwrite earlier ones.
    let mut styles: Vec<Style> = vec![Style::default(); chars.len()];
    if options.color {
        for span in spans {
            let end = span.end().min(chars.len());
            for slot in styles.iter_mut().take(end).skip(span.start) {
                *slot = span.style;
            }
        }
    }

    let tab_width = options.tab_width.max(1);
    let mut current = Style::default();
    let mut col = 0;
    for (ch, style) in chars.iter().zip(&styles) {
        if *style != current {
            apply_style(out, style)?;
            current = *style;
        }
        if *ch == '\t' {
            let fill = tab_width - (col % tab_width);
            queue!(out, Print(" ".repeat(fill)))?;
            col += fill;
        } else {
            queue!(out, Print(ch))?;
            col += UnicodeWidthChar::width(*ch).unwrap_or(1);
        }
    }
    if !current.is_default() {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Highlight and render a whole text, one output line per input line
pub fn render_text(out: &mut impl Write, text: &str, rules: &RuleSet, options: &RenderOptions) -> io::Result<()> {
    let line_count = text.lines().count();
    let gutter = line_count.max(1).to_string().len();

    for (idx, line) in text.lines().enumerate() {
        if options.line_numbers {
            let number = format!("{:>gutter$} ", idx + 1);
            if options.color {
                queue!(
                    out,
                    SetAttribute(Attribute::Dim),
                    Print(number),
                    SetAttribute(Attribute::NormalIntensity)
                )?;
            } else {
                queue!(out, Print(number))?;
            }
        }
        let spans = rules.highlight_line(line);
        render_line(out, line, &spans, options)?;
        queue!(out, Print('\n'))?;
    }
    out.flush()
}

/// Print a span list in a plain, diffable form
pub fn write_spans(out: &mut impl Write, text: &str, rules: &RuleSet) -> io::Result<()> {
    for (idx, line) in text.lines().enumerate() {
        for span in rules.highlight_line(line) {
            let covered: String = line.chars().skip(span.start).take(span.length).collect();
            writeln!(
                out,
                "{}:{}+{} {} {:?}",
                idx + 1,
                span.start,
                span.length,
                span.token.name(),
                covered
            )?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{builtin, TokenType};

    fn render_plain(line: &str, tab_width: usize) -> String {
        let options = RenderOptions {
            tab_width,
            color: false,
            line_numbers: false,
        };
        let mut out = Vec::new();
        render_line(&mut out, line, &[], &options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tab_expansion() {
        assert_eq!(render_plain("a\tb", 4), "a   b");
        assert_eq!(render_plain("\tx", 2), "  x");
        assert_eq!(render_plain("abcd\te", 4), "abcd    e");
        // Wide chars take two columns before the tab stop.
        assert_eq!(render_plain("日\tx", 4), "日  x");
    }

    #[test]
    fn test_colored_line_resets() {
        let rules = builtin::python().unwrap();
        let line = "def f(): pass";
        let mut out = Vec::new();
        render_line(&mut out, line, &rules.highlight_line(line), &RenderOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("def"));
        assert!(text.contains(" f(): pass"));
    }

    #[test]
    fn test_later_span_wins_when_painting() {
        let green = Style::fg(Color::Green);
        let gray = Style::fg(Color::BrightBlack);
        let spans = [
            Span::new(0, 3, TokenType::String, green),
            Span::new(1, 2, TokenType::Comment, gray),
        ];
        let mut out = Vec::new();
        render_line(&mut out, "\"#\"", &spans, &RenderOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut expected = Vec::new();
        apply_style(&mut expected, &green).unwrap();
        queue!(expected, Print('"')).unwrap();
        apply_style(&mut expected, &gray).unwrap();
        queue!(expected, Print('#'), Print('"'), SetAttribute(Attribute::Reset)).unwrap();
        assert_eq!(text, String::from_utf8(expected).unwrap());
    }

    #[test]
    fn test_render_text_line_numbers() {
        let rules = builtin::python().unwrap();
        let options = RenderOptions {
            tab_width: 4,
            color: false,
            line_numbers: true,
        };
        let text = (1..=10).map(|n| format!("x{n}")).collect::<Vec<_>>().join("\n");
        let mut out = Vec::new();
        render_text(&mut out, &text, &rules, &options).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], " 1 x1");
        assert_eq!(lines[9], "10 x10");
    }

    #[test]
    fn test_write_spans() {
        let rules = builtin::python().unwrap();
        let mut out = Vec::new();
        write_spans(&mut out, "x = 'a' # c\nplain", &rules).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert_eq!(listing, "1:4+3 String \"'a'\"\n1:8+3 Comment \"# c\"\n");
    }
}
