//! Harness configuration.
//!
//! Paths come from the environment first and command-line flags second:
//!
//! | Variable              | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `TINYFMT_FIXTURE_DIR` | directory of `*.json` fixture sets        |
//! | `TINYFMT_LOG`         | JSONL structured log output path          |
//! | `TINYFMT_REPORT`      | markdown report path (JSON written next to it) |

use std::path::PathBuf;

/// Fixture directory used when neither the environment nor a flag names one.
pub const DEFAULT_FIXTURE_DIR: &str = "tests/conformance/fixtures";

/// Destination a fixture case formats into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// `sprintf`: every byte stored.
    Unbounded,
    /// `snprintf` into a buffer of `capacity` bytes.
    Bounded { capacity: usize },
}

impl SinkMode {
    /// Parse a sink name, case-insensitively.
    ///
    /// Accepts `unbounded`/`sprintf` and `bounded:<n>`/`snprintf:<n>`.
    /// Returns `None` for anything else, including a bounded mode without a
    /// numeric capacity.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.split_once(':') {
            None => match s.as_str() {
                "unbounded" | "sprintf" | "" => Some(Self::Unbounded),
                _ => None,
            },
            Some((kind, capacity)) => match kind {
                "bounded" | "snprintf" => capacity
                    .trim()
                    .parse()
                    .ok()
                    .map(|capacity| Self::Bounded { capacity }),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for SinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded { capacity } => write!(f, "bounded:{capacity}"),
        }
    }
}

/// Resolved harness paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub fixture_dir: PathBuf,
    pub log_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            log_path: None,
            report_path: None,
        }
    }
}

impl HarnessConfig {
    /// Read the `TINYFMT_*` variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        Self {
            fixture_dir: get("TINYFMT_FIXTURE_DIR")
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_DIR)),
            log_path: get("TINYFMT_LOG"),
            report_path: get("TINYFMT_REPORT"),
        }
    }

    /// Apply command-line values on top; `None` keeps the current setting.
    #[must_use]
    pub fn with_overrides(
        mut self,
        fixture_dir: Option<PathBuf>,
        log_path: Option<PathBuf>,
        report_path: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = fixture_dir {
            self.fixture_dir = dir;
        }
        if log_path.is_some() {
            self.log_path = log_path;
        }
        if report_path.is_some() {
            self.report_path = report_path;
        }
        self
    }
}
