use crate::consts::{
    DEFAULT_INPUT_PATH, DEFAULT_MAX_LINE_LEN, DEFAULT_OUTPUT_PATH, ISO_8601_LEN_OFFSET,
};
use crate::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

pub const INPUT_VAR: &str = "ISO_DEDUP_INPUT";
pub const OUTPUT_VAR: &str = "ISO_DEDUP_OUTPUT";
pub const MAX_LINE_LEN_VAR: &str = "ISO_DEDUP_MAX_LINE_LEN";
pub const REPORT_FORMAT_VAR: &str = "ISO_DEDUP_REPORT_FORMAT";

/// How the end-of-run stats are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum ReportFormat {
    /// Fixed-width table, compatible with the legacy stats block
    #[default]
    #[display(fmt = "text")]
    Text,
    /// Pretty-printed JSON of the run stats
    #[display(fmt = "json")]
    Json,
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                var: REPORT_FORMAT_VAR,
                value: s.to_owned(),
                reason: "expected `text` or `json`",
            }),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Run settings.
///
/// | Env Var                   | Default     |
/// |---------------------------|-------------|
/// | `ISO_DEDUP_INPUT`         | `./infile`  |
/// | `ISO_DEDUP_OUTPUT`        | `./outfile` |
/// | `ISO_DEDUP_MAX_LINE_LEN`  | `256`       |
/// | `ISO_DEDUP_REPORT_FORMAT` | `text`      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Longest line read as a single candidate, in bytes. Longer lines are
    /// rejected as `InvalidLength` rather than truncated.
    pub max_line_len: usize,
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            report_format: ReportFormat::Text,
        }
    }
}

impl Config {
    /// Loads settings from the process environment, defaults for anything unset.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if a set variable cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if a set variable cannot be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let input = lookup(INPUT_VAR).map_or(defaults.input, PathBuf::from);
        let output = lookup(OUTPUT_VAR).map_or(defaults.output, PathBuf::from);

        let max_line_len = match lookup(MAX_LINE_LEN_VAR) {
            Some(value) => parse_max_line_len(&value)?,
            None => defaults.max_line_len,
        };

        let report_format = match lookup(REPORT_FORMAT_VAR) {
            Some(value) => value.parse()?,
            None => defaults.report_format,
        };

        Ok(Self {
            input,
            output,
            max_line_len,
            report_format,
        })
    }
}

fn parse_max_line_len(value: &str) -> Result<usize, ConfigError> {
    let len = value.trim().parse::<usize>().map_err(|_| ConfigError::Invalid {
        var: MAX_LINE_LEN_VAR,
        value: value.to_owned(),
        reason: "not a number",
    })?;
    if len < ISO_8601_LEN_OFFSET {
        return Err(ConfigError::Invalid {
            var: MAX_LINE_LEN_VAR,
            value: value.to_owned(),
            reason: "shorter than the 25-byte offset form",
        });
    }
    Ok(len)
}
