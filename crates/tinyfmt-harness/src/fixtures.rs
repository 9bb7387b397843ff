//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tinyfmt_core::FormatArg;

use crate::config::SinkMode;
use crate::error::HarnessError;

/// One argument as written in a fixture, tagged with its kind:
/// `{"int": -5}`, `{"uint": 7}`, `{"char": "A"}`, `{"ptr": 4096}`,
/// `{"str": "text"}` or `{"bytes": [104, 0, 105]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureArg {
    Int(i64),
    Uint(u64),
    Char(char),
    Ptr(usize),
    Str(String),
    Bytes(Vec<u8>),
}

impl FixtureArg {
    /// Borrow as an interpreter argument.
    #[must_use]
    pub fn as_format_arg(&self) -> FormatArg<'_> {
        match self {
            Self::Int(v) => FormatArg::SignedInt(*v),
            Self::Uint(v) => FormatArg::UnsignedInt(*v),
            Self::Char(c) => FormatArg::from(*c),
            Self::Ptr(p) => FormatArg::Pointer(*p),
            Self::Str(s) => FormatArg::from(s.as_str()),
            Self::Bytes(b) => FormatArg::Str(b),
        }
    }

    /// Parse the command-line form `<kind>:<value>`, e.g. `int:-5` or `str:hello`.
    ///
    /// Integer values accept a `0x` prefix. A `char` value must be exactly
    /// one character.
    pub fn from_cli(s: &str) -> Result<Self, HarnessError> {
        let bad = || HarnessError::CliArg(s.to_string());
        let (kind, value) = s.split_once(':').ok_or_else(bad)?;
        match kind.to_ascii_lowercase().as_str() {
            "int" | "i" => parse_signed(value).map(Self::Int).ok_or_else(bad),
            "uint" | "u" => parse_unsigned(value).map(Self::Uint).ok_or_else(bad),
            "ptr" | "p" => parse_unsigned(value)
                .and_then(|v| usize::try_from(v).ok())
                .map(Self::Ptr)
                .ok_or_else(bad),
            "char" | "c" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(bad()),
                }
            }
            "str" | "s" => Ok(Self::Str(value.to_string())),
            _ => Err(bad()),
        }
    }
}

fn parse_unsigned(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_signed(s: &str) -> Option<i64> {
    let s = s.trim();
    match s.strip_prefix('-') {
        Some(rest) => parse_unsigned(rest).and_then(|m| 0_i64.checked_sub_unsigned(m)),
        None => parse_unsigned(s).and_then(|v| i64::try_from(v).ok()),
    }
}

fn default_sink() -> String {
    String::from("unbounded")
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Contract area the case exercises (e.g. `flags`, `precision`).
    pub section: String,
    /// Format string, interpreted as raw bytes.
    pub format: String,
    /// Arguments, consumed left to right.
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// `unbounded` or `bounded:<capacity>`.
    #[serde(default = "default_sink")]
    pub sink: String,
    /// Bytes stored in the destination before the terminator.
    pub expected_output: String,
    /// Reported count; for bounded sinks this is the untruncated length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_count: Option<usize>,
}

impl FixtureCase {
    pub fn sink_mode(&self) -> Result<SinkMode, HarnessError> {
        SinkMode::from_str_loose(&self.sink).ok_or_else(|| HarnessError::Fixture {
            case: self.name.clone(),
            message: format!("unrecognised sink '{}'", self.sink),
        })
    }

    #[must_use]
    pub fn format_args(&self) -> Vec<FormatArg<'_>> {
        self.args.iter().map(FixtureArg::as_format_arg).collect()
    }
}

/// A collection of fixture cases for one area of the formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name, e.g. `format/core`.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(&content)
    }
}

/// Sorted `*.json` paths in `dir`.
pub fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| HarnessError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}
