//! Runner configuration domain model
//!
//! A `RunnerConfig` names a browser/OS/version triple a benchmark should be
//! executed against. Configs are immutable value objects: they key the
//! per-job result map and have a canonical string form
//! (`<os>-<browser>-<version>`) used in API responses, query parameters and
//! runner target URLs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Browser a benchmark runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Explorer,
    Opera,
}

impl Browser {
    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Safari => "safari",
            Browser::Explorer => "explorer",
            Browser::Opera => "opera",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "chrome" => Some(Browser::Chrome),
            "firefox" => Some(Browser::Firefox),
            "safari" => Some(Browser::Safari),
            "explorer" => Some(Browser::Explorer),
            "opera" => Some(Browser::Opera),
            _ => None,
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operating system a benchmark runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

impl Os {
    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOs => "macos",
            Os::Windows => "windows",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "linux" => Some(Os::Linux),
            "macos" => Some(Os::MacOs),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A target browser+OS+version combination to execute a benchmark against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub browser: Browser,
    pub os: Os,
    pub version: String,
}

impl RunnerConfig {
    pub fn new(browser: Browser, os: Os, version: impl Into<String>) -> Self {
        Self {
            browser,
            os,
            version: version.into(),
        }
    }

    /// The built-in set used when a submission does not name configs
    pub fn default_set() -> Vec<RunnerConfig> {
        vec![
            RunnerConfig::new(Browser::Chrome, Os::Linux, "120"),
            RunnerConfig::new(Browser::Firefox, Os::Linux, "115"),
            RunnerConfig::new(Browser::Safari, Os::MacOs, "17"),
            RunnerConfig::new(Browser::Explorer, Os::Windows, "11"),
        ]
    }
}

impl fmt::Display for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.os, self.browser, self.version)
    }
}

/// Error returned when a config string does not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfigError {
    input: String,
}

impl fmt::Display for ParseConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid runner config '{}', expected <os>-<browser>-<version>",
            self.input
        )
    }
}

impl std::error::Error for ParseConfigError {}

impl FromStr for RunnerConfig {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseConfigError {
            input: s.to_string(),
        };

        let mut parts = s.splitn(3, '-');
        let os = parts.next().and_then(Os::from_name).ok_or_else(err)?;
        let browser = parts.next().and_then(Browser::from_name).ok_or_else(err)?;
        let version = parts.next().filter(|v| !v.is_empty()).ok_or_else(err)?;

        Ok(RunnerConfig::new(browser, os, version))
    }
}
