//! Ordered rule tables
//!
//! A `RuleSet` is the fixed, ordered sequence of rules applied to
//! every line, plus the policy for spans that land on the same chars.
//! It is built once and shared read-only.

use super::highlight;
use super::rules::StyleRule;
use super::style::Span;

/// How spans from different rules combine on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPolicy {
    /// Emit every match of every rule in rule order, overlaps included.
    /// Painting in emission order lets the later rule win, so a `#`
    /// inside a string literal paints as a comment.
    Layered,
    /// Matches starting inside a masking rule's span are dropped, then
    /// overlaps are flattened so each char belongs to the last rule that
    /// painted it. Output is sorted and non-overlapping.
    #[default]
    Resolved,
}

impl OverlayPolicy {
    /// Parse a policy name (`layered` or `resolved`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "layered" => Some(OverlayPolicy::Layered),
            "resolved" => Some(OverlayPolicy::Resolved),
            _ => None,
        }
    }

    /// Name as accepted by `from_name`
    pub fn name(&self) -> &'static str {
        match self {
            OverlayPolicy::Layered => "layered",
            OverlayPolicy::Resolved => "resolved",
        }
    }
}

/// An ordered rule table
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Name (e.g. "Python")
    pub name: String,
    rules: Vec<StyleRule>,
    policy: OverlayPolicy,
}

impl RuleSet {
    /// Create an empty rule set with the default policy
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
            policy: OverlayPolicy::default(),
        }
    }

    /// Builder: set the overlay policy
    pub fn with_policy(mut self, policy: OverlayPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a rule; rules apply in the order they were pushed
    pub fn push(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Rules in application order
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn policy(&self) -> OverlayPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Highlight a single line of text
    pub fn highlight_line(&self, line: &str) -> Vec<Span> {
        highlight::highlight_line(line, self)
    }

    /// Highlight every line of a text, one span list per line
    pub fn highlight_text(&self, text: &str) -> Vec<Vec<Span>> {
        text.lines().map(|line| self.highlight_line(line)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokens::TokenType;

    #[test]
    fn test_rules_keep_push_order() {
        let mut set = RuleSet::new("Test");
        set.push(StyleRule::new("b", "b", TokenType::Keyword).unwrap());
        set.push(StyleRule::new("a", "a", TokenType::String).unwrap());
        let names: Vec<_> = set.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(OverlayPolicy::from_name("Layered"), Some(OverlayPolicy::Layered));
        assert_eq!(OverlayPolicy::from_name(" resolved "), Some(OverlayPolicy::Resolved));
        assert_eq!(OverlayPolicy::from_name("flat"), None);
        assert_eq!(OverlayPolicy::default(), OverlayPolicy::Resolved);
        let policy = OverlayPolicy::Layered;
        assert_eq!(OverlayPolicy::from_name(policy.name()), Some(policy));
    }

    #[test]
    fn test_highlight_text_per_line() {
        let mut set = RuleSet::new("Test");
        set.push(StyleRule::new("digit", r"\d", TokenType::Number).unwrap());
        let lines = set.highlight_text("a1\nbb\r\n2");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 1);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2][0].start, 0);
    }
}
