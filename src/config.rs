//! Configuration file support
//!
//! Loads settings from ~/.codepad.conf (or %USERPROFILE%\.codepad.conf on Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # codepad configuration
//! interpreter = python3
//! timeout-ms = 10000
//! overlay = resolved
//! tab-width = 4
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::sandbox::{EnvPolicy, SandboxConfig};
use crate::syntax::{builtin, loader, OverlayPolicy, RuleSet};

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interpreter used by `run`
    pub interpreter: String,
    /// Default run timeout in milliseconds
    pub timeout_ms: u64,
    /// Tab width for display
    pub tab_width: usize,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// How overlapping spans combine
    pub overlay: OverlayPolicy,
    /// Start children with a cleared environment
    pub clean_env: bool,
    /// Working directory for children
    pub working_dir: Option<PathBuf>,
    /// Rule file replacing the built-in Python table
    pub rules: Option<PathBuf>,
    /// Bytes kept per output stream
    pub output_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let sandbox = SandboxConfig::default();
        Self {
            interpreter: sandbox.interpreter,
            timeout_ms: 10_000,
            tab_width: 4,
            show_line_numbers: false,
            overlay: OverlayPolicy::default(),
            clean_env: true,
            working_dir: None,
            rules: None,
            output_limit: sandbox.output_limit,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".codepad.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".codepad.conf"))
        }
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                debug!(path = %path.display(), "loading config");
                let settings = Self::parse(&contents);
                config.apply(&settings);
            }
        }

        config
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse key = value
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("interpreter") {
            if !value.is_empty() {
                self.interpreter = value.clone();
            }
        }

        if let Some(value) = settings.get("timeout-ms") {
            if let Ok(n) = value.parse::<u64>() {
                self.timeout_ms = n.max(50);
            }
        }

        if let Some(value) = settings.get("tab-width") {
            if let Ok(n) = value.parse::<usize>() {
                self.tab_width = n.clamp(1, 16);
            }
        }

        if let Some(value) = settings.get("line-numbers") {
            self.show_line_numbers = parse_bool(value);
        }

        if let Some(policy) = settings.get("overlay").and_then(|v| OverlayPolicy::from_name(v)) {
            self.overlay = policy;
        }

        if let Some(value) = settings.get("clean-env") {
            self.clean_env = parse_bool(value);
        }

        if let Some(value) = settings.get("working-dir") {
            self.working_dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }

        if let Some(value) = settings.get("rules") {
            self.rules = (!value.is_empty()).then(|| PathBuf::from(value));
        }

        if let Some(value) = settings.get("output-limit") {
            if let Ok(n) = value.parse::<usize>() {
                self.output_limit = n.max(1024);
            }
        }
    }

    /// Default timeout for runs
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sandbox settings derived from this config
    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig {
            interpreter: self.interpreter.clone(),
            working_dir: self.working_dir.clone(),
            env: if self.clean_env {
                EnvPolicy::clean()
            } else {
                EnvPolicy::inherit()
            },
            output_limit: self.output_limit,
            ..SandboxConfig::default()
        }
    }

    /// The configured rule set: the rule file if set, else built-in Python
    ///
    /// The configured overlay policy applies to the built-in table; a rule
    /// file carries its own.
    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.rules {
            Some(path) => loader::load(path),
            None => Ok(builtin::python()?.with_policy(self.overlay)),
        }
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
interpreter = /usr/bin/python3.12
timeout-ms = 2500
overlay = layered
tab-width = 2
        "#;

        let settings = Config::parse(contents);
        assert_eq!(settings.get("interpreter"), Some(&"/usr/bin/python3.12".to_string()));
        assert_eq!(settings.get("timeout-ms"), Some(&"2500".to_string()));
        assert_eq!(settings.get("overlay"), Some(&"layered".to_string()));
        assert_eq!(settings.get("tab-width"), Some(&"2".to_string()));
        assert_eq!(settings.len(), 4);
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        let settings = Config::parse(
            "interpreter = pypy3\ntimeout-ms = 1500\ntab-width = 2\nline-numbers = yes\n\
             overlay = layered\nclean-env = off\nworking-dir = /srv/scratch\noutput-limit = 4096\n",
        );

        config.apply(&settings);

        assert_eq!(config.interpreter, "pypy3");
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.tab_width, 2);
        assert!(config.show_line_numbers);
        assert_eq!(config.overlay, OverlayPolicy::Layered);
        assert!(!config.clean_env);
        assert_eq!(config.working_dir, Some(PathBuf::from("/srv/scratch")));
        assert_eq!(config.output_limit, 4096);
    }

    #[test]
    fn test_invalid_values_are_clamped_or_ignored() {
        let mut config = Config::default();
        let settings =
            Config::parse("timeout-ms = 5\ntab-width = 99\noverlay = sideways\noutput-limit = lots\n");

        config.apply(&settings);

        assert_eq!(config.timeout_ms, 50);
        assert_eq!(config.tab_width, 16);
        assert_eq!(config.overlay, OverlayPolicy::Resolved);
        assert_eq!(config.output_limit, Config::default().output_limit);
    }

    #[test]
    fn test_sandbox_config() {
        let mut config = Config::default();
        config.interpreter = "python3.11".to_string();
        config.clean_env = false;

        let sandbox = config.sandbox_config();
        assert_eq!(sandbox.interpreter, "python3.11");
        assert!(sandbox.env.inherit);
    }

    #[test]
    fn test_rule_set_uses_overlay() {
        let mut config = Config::default();
        config.overlay = OverlayPolicy::Layered;
        let rules = config.rule_set().unwrap();
        assert_eq!(rules.policy(), OverlayPolicy::Layered);
        assert_eq!(rules.name, "Python");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("anything"));
    }
}
