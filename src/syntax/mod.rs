//! Syntax highlighting
//!
//! This module provides the line highlighter:
//! - Style rules compiled from regex patterns
//! - Ordered rule sets with an overlay policy
//! - The pure `highlight_line` function producing char-offset spans
//! - Built-in tables, TOML rule files and a per-document cache

mod style;
mod tokens;
mod rules;
mod ruleset;
mod highlight;
mod cache;
pub mod builtin;
pub mod loader;

pub use style::{Color, Span, Style};
pub use tokens::TokenType;
pub use rules::StyleRule;
pub use ruleset::{OverlayPolicy, RuleSet};
pub use highlight::highlight_line;
pub use cache::HighlightCache;
