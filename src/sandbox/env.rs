//! Environment hygiene for sandboxed runs
//!
//! By default the child does not inherit the host environment. A short
//! allowlist is copied over and a few variables are pinned so output
//! is UTF-8 and unbuffered.

use tokio::process::Command;

/// Host variables copied into a clean environment when present
pub const DEFAULT_KEEP: &[&str] = &["PATH", "HOME", "LANG", "LC_ALL", "SYSTEMROOT", "TEMP", "TMP"];

/// Variables always set for the child
pub const DEFAULT_SET: &[(&str, &str)] = &[("PYTHONIOENCODING", "utf-8"), ("PYTHONUNBUFFERED", "1")];

/// Environment sanitization policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPolicy {
    /// Pass the whole host environment through
    pub inherit: bool,
    /// Host variables to copy when not inheriting
    pub keep: Vec<String>,
    /// Variables set on top, in either mode
    pub set: Vec<(String, String)>,
}

impl Default for EnvPolicy {
    fn default() -> Self {
        Self::clean()
    }
}

impl EnvPolicy {
    /// Cleared environment with the default allowlist
    pub fn clean() -> Self {
        Self {
            inherit: false,
            keep: DEFAULT_KEEP.iter().map(|k| k.to_string()).collect(),
            set: DEFAULT_SET
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Full host environment plus the pinned variables
    pub fn inherit() -> Self {
        Self {
            inherit: true,
            ..Self::clean()
        }
    }

    /// Builder: set an extra variable for the child
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set.push((key.to_string(), value.to_string()));
        self
    }

    /// Builder: copy another host variable
    pub fn keeping(mut self, key: &str) -> Self {
        self.keep.push(key.to_string());
        self
    }

    /// Whether a host variable reaches the child
    pub fn passes(&self, key: &str) -> bool {
        self.inherit
            || self.keep.iter().any(|k| k == key)
            || self.set.iter().any(|(k, _)| k == key)
    }

    /// Apply this policy to a command
    pub fn apply(&self, command: &mut Command) {
        if !self.inherit {
            command.env_clear();
            for key in &self.keep {
                if let Some(value) = std::env::var_os(key) {
                    command.env(key, value);
                }
            }
        }
        for (key, value) in &self.set {
            command.env(key, value);
        }
    }
}
