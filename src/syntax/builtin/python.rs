//! Python rule tables

use crate::error::Result;
use crate::syntax::rules::StyleRule;
use crate::syntax::ruleset::RuleSet;
use crate::syntax::tokens::TokenType;

/// Keywords highlighted by the plain Python table, in rule order
pub const KEYWORDS: &[&str] = &[
    "def", "class", "import", "from", "return", "if", "elif", "else", "for", "while", "break",
    "continue", "try", "except", "finally", "with",
];

const BUILTINS: &str = r"\b(abs|all|any|bool|dict|enumerate|filter|float|input|int|isinstance|len|list|map|max|min|open|print|range|repr|reversed|round|set|sorted|str|sum|super|tuple|type|zip)\b";

fn push_keywords(rules: &mut RuleSet) -> Result<()> {
    for keyword in KEYWORDS {
        let rule = StyleRule::new(
            &format!("keyword:{keyword}"),
            &format!(r"\b{keyword}\b"),
            TokenType::Keyword,
        )?;
        rules.push(rule);
    }
    Ok(())
}

fn push_strings_and_comment(rules: &mut RuleSet) -> Result<()> {
    rules.push(StyleRule::new("double_string", r#"".*?""#, TokenType::String)?.masking());
    rules.push(StyleRule::new("single_string", r"'.*?'", TokenType::String)?.masking());
    rules.push(StyleRule::new("comment", r"#[^\n]*", TokenType::Comment)?);
    Ok(())
}

/// Create the Python rule set
pub fn python_rules() -> Result<RuleSet> {
    let mut rules = RuleSet::new("Python");
    push_keywords(&mut rules)?;
    push_strings_and_comment(&mut rules)?;
    Ok(rules)
}

/// Create the extended Python rule set
pub fn python_extended_rules() -> Result<RuleSet> {
    let mut rules = RuleSet::new("Python (extended)");
    push_keywords(&mut rules)?;
    rules.push(StyleRule::new(
        "soft_keyword",
        r"\b(and|as|assert|async|await|del|global|in|is|lambda|nonlocal|not|or|pass|raise|yield)\b",
        TokenType::Keyword,
    )?);
    rules.push(StyleRule::new("constant", r"\b(True|False|None)\b", TokenType::Constant)?);
    rules.push(StyleRule::new("builtin", BUILTINS, TokenType::Function)?);
    rules.push(StyleRule::new("decorator", r"@\w+", TokenType::Attribute)?);
    rules.push(StyleRule::new("hex", r"\b0[xX][0-9a-fA-F_]+\b", TokenType::Number)?);
    rules.push(StyleRule::new(
        "float",
        r"\b\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?j?\b",
        TokenType::Number,
    )?);
    rules.push(StyleRule::new("integer", r"\b\d[\d_]*j?\b", TokenType::Number)?);
    push_strings_and_comment(&mut rules)?;
    Ok(rules)
}
