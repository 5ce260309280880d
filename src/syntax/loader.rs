//! Rule files
//!
//! Loads a `RuleSet` from TOML. Everything is validated here, so a rule
//! set that loads never fails at highlight time.
//!
//! Example:
//! ```toml
//! name = "python-numbers"
//! policy = "resolved"
//!
//! [[rule]]
//! name = "number"
//! pattern = '\b\d+\b'
//! token = "Number"
//! fg = "bright-cyan"
//! bold = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::rules::StyleRule;
use super::ruleset::{OverlayPolicy, RuleSet};
use super::style::Color;
use super::tokens::TokenType;
use crate::error::{CodepadError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    name: Option<String>,
    policy: Option<String>,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    name: String,
    pattern: String,
    token: String,
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underline: bool,
    #[serde(default)]
    masks_later: bool,
}

impl RuleEntry {
    fn into_rule(self) -> Result<StyleRule> {
        let token = TokenType::from_name(&self.token)
            .ok_or_else(|| CodepadError::UnknownToken(self.token.clone()))?;

        let mut style = token.default_style();
        if let Some(fg) = &self.fg {
            style = style.with_fg(parse_color(fg)?);
        }
        if let Some(bg) = &self.bg {
            style = style.with_bg(parse_color(bg)?);
        }
        if self.bold {
            style = style.with_bold();
        }
        if self.italic {
            style = style.with_italic();
        }
        if self.underline {
            style = style.with_underline();
        }

        let rule = StyleRule::new(&self.name, &self.pattern, token)?.with_style(style);
        Ok(if self.masks_later { rule.masking() } else { rule })
    }
}

fn parse_color(name: &str) -> Result<Color> {
    Color::from_name(name).ok_or_else(|| CodepadError::UnknownColor(name.to_string()))
}

/// Parse a rule set from TOML text
pub fn from_toml(contents: &str) -> Result<RuleSet> {
    let file: RuleFile = toml::from_str(contents)?;

    let policy = match file.policy.as_deref() {
        None => OverlayPolicy::default(),
        Some(name) => OverlayPolicy::from_name(name)
            .ok_or_else(|| CodepadError::UnknownPolicy(name.to_string()))?,
    };

    let mut rules = RuleSet::new(file.name.as_deref().unwrap_or("custom")).with_policy(policy);
    for entry in file.rules {
        rules.push(entry.into_rule()?);
    }
    Ok(rules)
}

/// Load a rule set from a TOML file
pub fn load(path: &Path) -> Result<RuleSet> {
    let contents = fs::read_to_string(path)?;
    let rules = from_toml(&contents)?;
    info!(path = %path.display(), rules = rules.len(), name = %rules.name, "loaded rule file");
    Ok(rules)
}
