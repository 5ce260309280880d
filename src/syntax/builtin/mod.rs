//! Built-in rule sets
//!
//! Rule tables that ship with codepad. Each is compiled on demand;
//! callers build one at startup and share it.

mod python;

use super::ruleset::RuleSet;
use crate::error::{CodepadError, Result};

pub use python::KEYWORDS;

/// Names accepted by `by_name`
pub const NAMES: &[&str] = &["python", "python-extended"];

/// The Python table: keywords, then string literals, then comments
pub fn python() -> Result<RuleSet> {
    python::python_rules()
}

/// Python plus builtins, numbers, constants and decorators
pub fn python_extended() -> Result<RuleSet> {
    python::python_extended_rules()
}

/// Look up a built-in rule set by name
pub fn by_name(name: &str) -> Option<Result<RuleSet>> {
    match name.to_ascii_lowercase().as_str() {
        "python" | "py" => Some(python()),
        "python-extended" => Some(python_extended()),
        _ => None,
    }
}

/// Like `by_name`, but an unknown name is an error listing the known ones
pub fn lookup(name: &str) -> Result<RuleSet> {
    by_name(name).unwrap_or_else(|| {
        Err(CodepadError::UnknownSyntax(format!(
            "{name} (known: {})",
            NAMES.join(", ")
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in NAMES {
            assert!(lookup(name).is_ok(), "{name}");
        }
        assert_eq!(lookup("PY").unwrap().name, "Python");
    }

    #[test]
    fn test_unknown_name_lists_known_ones() {
        let err = lookup("cobol").unwrap_err();
        assert!(matches!(err, CodepadError::UnknownSyntax(_)));
        let message = err.to_string();
        assert!(message.contains("cobol"));
        assert!(message.contains("python-extended"));
    }
}
