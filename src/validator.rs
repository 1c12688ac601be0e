//! Hostname validation for untrusted path segments.
//!
//! The hostname from the request URL ends up as an argument of an external
//! command (`/dev/<hostname>`), so the default policy is an allow-list rather
//! than a simple non-empty check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default upper bound on hostname length.
pub const DEFAULT_MAX_HOSTNAME_LEN: usize = 64;

// Leading alphanumeric, then alphanumerics and `.`, `_`, `-` only.
static HOSTNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("hostname pattern is a valid regex")
});

/// Validation policy applied to candidate hostnames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostnamePolicy {
    /// Accepts any non-empty string.
    Permissive,
    /// Allow-list pattern with a bounded length and no `..` sequences.
    #[default]
    Strict,
}

impl HostnamePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostnamePolicy::Permissive => "permissive",
            HostnamePolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for HostnamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostnamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(HostnamePolicy::Permissive),
            "strict" => Ok(HostnamePolicy::Strict),
            other => Err(format!(
                "Invalid hostname_policy '{}', expected 'strict' or 'permissive'",
                other
            )),
        }
    }
}

/// Classifies candidate hostnames according to a [`HostnamePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostnameValidator {
    policy: HostnamePolicy,
    max_len: usize,
}

impl Default for HostnameValidator {
    fn default() -> Self {
        Self::new(HostnamePolicy::Strict, DEFAULT_MAX_HOSTNAME_LEN)
    }
}

impl HostnameValidator {
    pub fn new(policy: HostnamePolicy, max_len: usize) -> Self {
        Self { policy, max_len }
    }

    pub fn policy(&self) -> HostnamePolicy {
        self.policy
    }

    /// Returns `true` if `candidate` may be used as a device name.
    ///
    /// The empty string is rejected under every policy.
    pub fn validate(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }

        match self.policy {
            HostnamePolicy::Permissive => true,
            HostnamePolicy::Strict => {
                candidate.len() <= self.max_len
                    && !candidate.contains("..")
                    && HOSTNAME_PATTERN.is_match(candidate)
            }
        }
    }
}

/// Validates `candidate` with the default strict policy.
pub fn validate(candidate: &str) -> bool {
    HostnameValidator::default().validate(candidate)
}
