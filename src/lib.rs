mod consts;
mod prelude;
mod types;

pub mod config;
pub mod pipeline;
pub mod store;
pub mod tally;

pub use config::{Config, ConfigError, ReportFormat};
pub use consts::*;
pub use pipeline::{LineOutcome, Pipeline, PipelineError, RunStats};
pub use store::{DedupStore, StoreError};
pub use tally::ErrorTally;
pub use types::{
    DateParts, DateTimeFields, Day, Hour, Minute, Month, OffsetHours, OffsetMinutes, OffsetParts,
    OffsetSign, Second, Timezone,
};

use crate::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Reason a candidate failed validation.
///
/// Codes and labels match the legacy stats report. `NoError` is the
/// label of a passing record and is never tallied; `InvalidYear` is
/// kept for the report even though the year is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    NoError = 0,
    InvalidLength = 1,
    InvalidStructure = 2,
    InvalidYear = 3,
    InvalidMonth = 4,
    InvalidDay = 5,
    InvalidHour = 6,
    InvalidMin = 7,
    InvalidSec = 8,
    InvalidTZD = 9,
    InvalidTzHour = 10,
    InvalidTzMin = 11,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::error::Error for ErrorKind {}

impl ErrorKind {
    /// Number of categories, `NoError` included
    pub const COUNT: usize = 12;

    /// Every category in code order
    pub const ALL: [Self; Self::COUNT] = [
        Self::NoError,
        Self::InvalidLength,
        Self::InvalidStructure,
        Self::InvalidYear,
        Self::InvalidMonth,
        Self::InvalidDay,
        Self::InvalidHour,
        Self::InvalidMin,
        Self::InvalidSec,
        Self::InvalidTZD,
        Self::InvalidTzHour,
        Self::InvalidTzMin,
    ];

    /// Numeric code used by the legacy report
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable report label
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoError => "No error",
            Self::InvalidLength => "Invalid length",
            Self::InvalidStructure => "Invalid structure",
            Self::InvalidYear => "Invalid year",
            Self::InvalidMonth => "Invalid month",
            Self::InvalidDay => "Invalid day",
            Self::InvalidHour => "Invalid hour",
            Self::InvalidMin => "Invalid min",
            Self::InvalidSec => "Invalid sec",
            Self::InvalidTZD => "Invalid TZD",
            Self::InvalidTzHour => "Invalid tz hour",
            Self::InvalidTzMin => "Invalid tz min",
        }
    }

    /// Looks a category up by its legacy code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Every category except `NoError`
    pub fn failures() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|kind| *kind != Self::NoError)
    }
}

/// Verdict for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    Valid,
    Invalid(ErrorKind),
}

impl ValidationResult {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// `NoError` for a valid candidate, otherwise the failing category
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::Valid => ErrorKind::NoError,
            Self::Invalid(kind) => kind,
        }
    }
}

impl From<Result<DateTimeFields, ErrorKind>> for ValidationResult {
    fn from(result: Result<DateTimeFields, ErrorKind>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(kind) => Self::Invalid(kind),
        }
    }
}

/// Validates `candidate` against the GMT (`YYYY-MM-DDThh:mm:ssZ`) and
/// offset (`YYYY-MM-DDThh:mm:ss±hh:mm`) layouts.
///
/// The candidate is taken as-is: callers trim it first. Total over every
/// input, never panics.
pub fn validate(candidate: &str) -> ValidationResult {
    check_fields(candidate).into()
}

fn check_fields(candidate: &str) -> Result<DateTimeFields, ErrorKind> {
    DateParts::split(candidate)?.check()
}

/// A timestamp that passed validation.
///
/// Keeps the exact text it was parsed from; `Display` and serde reproduce
/// it byte-for-byte, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{text}")]
pub struct IsoDate {
    text: String,
    fields: DateTimeFields,
}

impl IsoDate {
    /// Returns the original text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the date, returning the original text
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the raw year digits. The year is not validated.
    pub fn year(&self) -> &str {
        self.text.get(..4).unwrap_or_default()
    }

    /// Returns the month component
    pub const fn month(&self) -> Month {
        self.fields.month
    }

    /// Returns the day component
    pub const fn day(&self) -> Day {
        self.fields.day
    }

    /// Returns the hour component
    pub const fn hour(&self) -> Hour {
        self.fields.hour
    }

    /// Returns the minute component
    pub const fn minute(&self) -> Minute {
        self.fields.minute
    }

    /// Returns the second component
    pub const fn second(&self) -> Second {
        self.fields.second
    }

    /// Returns the timezone designator and offset
    pub const fn timezone(&self) -> Timezone {
        self.fields.timezone
    }

    /// Returns true for the `Z` form
    pub const fn is_utc(&self) -> bool {
        matches!(self.fields.timezone, Timezone::Utc)
    }
}

impl FromStr for IsoDate {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = check_fields(s)?;
        Ok(Self {
            text: s.to_owned(),
            fields,
        })
    }
}

impl TryFrom<&str> for IsoDate {
    type Error = ErrorKind;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl AsRef<str> for IsoDate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl serde::Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> serde::Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_gmt() {
        assert_eq!(validate("2024-01-15T10:30:00Z"), ValidationResult::Valid);
        assert_eq!(validate("0000-12-31T23:59:59Z"), ValidationResult::Valid);
    }

    #[test]
    fn test_valid_offset() {
        assert_eq!(validate("2024-01-15T10:30:00+05:30"), ValidationResult::Valid);
        assert_eq!(validate("2024-01-15T10:30:00-23:59"), ValidationResult::Valid);
        assert_eq!(validate("2024-01-15T10:30:00+00:00"), ValidationResult::Valid);
    }

    #[test]
    fn test_no_calendar_check() {
        assert!(validate("2024-02-30T00:00:00Z").is_valid());
        assert!(validate("2023-02-29T00:00:00Z").is_valid());
        assert!(validate("2024-04-31T00:00:00Z").is_valid());
    }

    #[test]
    fn test_year_is_unchecked() {
        assert!(validate("0000-01-01T00:00:00Z").is_valid());
        assert!(validate("ABCD-01-01T00:00:00Z").is_valid());
    }

    #[test]
    fn test_invalid_length() {
        for candidate in [
            "",
            "not-a-date",
            "2024-01-15",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00ZZ",
            "2024-01-15T10:30:00+0530",
            "2024-01-15T10:30:00+05:30Z",
            " 2024-01-15T10:30:00Z",
        ] {
            assert_eq!(
                validate(candidate),
                ValidationResult::Invalid(ErrorKind::InvalidLength),
                "{candidate:?}"
            );
        }
    }

    #[test]
    fn test_every_other_length_is_invalid_length() {
        for len in (0..64).filter(|len| *len != 20 && *len != 25) {
            let candidate = "9".repeat(len);
            assert_eq!(validate(&candidate).kind(), ErrorKind::InvalidLength);
        }
    }

    #[test]
    fn test_first_failure_wins_cases() {
        struct TestCase {
            input: &'static str,
            expected: ErrorKind,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input: "2024/01-15T10:30:00Z",
                expected: ErrorKind::InvalidStructure,
                description: "first dash",
            },
            TestCase {
                input: "2024-13-01T00:00:00Z",
                expected: ErrorKind::InvalidMonth,
                description: "month 13",
            },
            TestCase {
                input: "2024-00-01T00:00:00Z",
                expected: ErrorKind::InvalidMonth,
                description: "month 0",
            },
            TestCase {
                input: "2024-AB-01T00:00:00Z",
                expected: ErrorKind::InvalidMonth,
                description: "letters in month",
            },
            TestCase {
                input: "2024-13/01T00:00:00Z",
                expected: ErrorKind::InvalidMonth,
                description: "month checked before second dash",
            },
            TestCase {
                input: "2024-01/15T10:30:00Z",
                expected: ErrorKind::InvalidStructure,
                description: "second dash",
            },
            TestCase {
                input: "2024-01-32T00:00:00Z",
                expected: ErrorKind::InvalidDay,
                description: "day 32",
            },
            TestCase {
                input: "2024-01-00T00:00:00Z",
                expected: ErrorKind::InvalidDay,
                description: "day 0",
            },
            TestCase {
                input: "2024-01-1xT00:00:00Z",
                expected: ErrorKind::InvalidDay,
                description: "letter in day",
            },
            TestCase {
                input: "2024-01-15 10:30:00Z",
                expected: ErrorKind::InvalidStructure,
                description: "space instead of T",
            },
            TestCase {
                input: "2024-01-15T24:00:00Z",
                expected: ErrorKind::InvalidHour,
                description: "hour 24",
            },
            TestCase {
                input: "2024-01-15T-1:00:00Z",
                expected: ErrorKind::InvalidHour,
                description: "negative hour",
            },
            TestCase {
                input: "2024-01-15T10-30:00Z",
                expected: ErrorKind::InvalidStructure,
                description: "first colon",
            },
            TestCase {
                input: "2024-01-15T10:60:00Z",
                expected: ErrorKind::InvalidMin,
                description: "minute 60",
            },
            TestCase {
                input: "2024-01-15T10:30-00Z",
                expected: ErrorKind::InvalidStructure,
                description: "second colon",
            },
            TestCase {
                input: "2024-01-15T10:30:60Z",
                expected: ErrorKind::InvalidSec,
                description: "second 60",
            },
            TestCase {
                input: "2024-01-15T10:30:00z",
                expected: ErrorKind::InvalidTZD,
                description: "lowercase z",
            },
            TestCase {
                input: "2024-01-15T10:30:00+0530Z",
                expected: ErrorKind::InvalidStructure,
                description: "offset without colon",
            },
            TestCase {
                input: "2024-01-15T10:30:00Z05:30",
                expected: ErrorKind::InvalidTZD,
                description: "Z in offset form",
            },
            TestCase {
                input: "2024-01-15T10:30:00+24:00",
                expected: ErrorKind::InvalidTzHour,
                description: "offset hour 24",
            },
            TestCase {
                input: "2024-01-15T10:30:00+05-30",
                expected: ErrorKind::InvalidStructure,
                description: "offset colon",
            },
            TestCase {
                input: "2024-01-15T10:30:00+05:60",
                expected: ErrorKind::InvalidTzMin,
                description: "offset minute 60",
            },
            TestCase {
                input: "2024-01-15T10:30:00+05:3x",
                expected: ErrorKind::InvalidTzMin,
                description: "letter in offset minute",
            },
        ];

        for case in &cases {
            assert_eq!(
                validate(case.input),
                ValidationResult::Invalid(case.expected),
                "{} ({})",
                case.input,
                case.description
            );
        }
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        // 20 bytes, the multi-byte char straddles the month field
        let candidate = "2024-é1-15T10:30:0Z";
        assert_eq!(candidate.len(), 20);
        assert_eq!(validate(candidate), ValidationResult::Invalid(ErrorKind::InvalidMonth));

        let candidate = "ééééééééééé-15T10Z";
        assert!(!validate(candidate).is_valid());
    }

    #[test]
    fn test_validation_is_idempotent() {
        for candidate in ["2024-01-15T10:30:00Z", "2024-13-01T00:00:00Z", "garbage"] {
            assert_eq!(validate(candidate), validate(candidate));
        }
    }

    #[test]
    fn test_error_kind_labels() {
        let labels: Vec<String> = ErrorKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            [
                "No error",
                "Invalid length",
                "Invalid structure",
                "Invalid year",
                "Invalid month",
                "Invalid day",
                "Invalid hour",
                "Invalid min",
                "Invalid sec",
                "Invalid TZD",
                "Invalid tz hour",
                "Invalid tz min",
            ]
        );
        for kind in ErrorKind::ALL {
            assert_eq!(kind.label(), kind.to_string());
        }
    }

    #[test]
    fn test_error_kind_codes() {
        for (code, kind) in ErrorKind::ALL.iter().enumerate() {
            assert_eq!(usize::from(kind.code()), code);
            assert_eq!(ErrorKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ErrorKind::from_code(12), None);
        assert_eq!(ErrorKind::failures().count(), 11);
        assert_eq!(ErrorKind::failures().next(), Some(ErrorKind::InvalidLength));
    }

    #[test]
    fn test_validation_result_kind() {
        assert_eq!(ValidationResult::Valid.kind(), ErrorKind::NoError);
        assert_eq!(
            ValidationResult::Invalid(ErrorKind::InvalidDay).kind(),
            ErrorKind::InvalidDay
        );
    }

    #[test]
    fn test_parse_iso_date() {
        let date = "2024-01-15T10:30:45+05:30".parse::<IsoDate>().unwrap();
        assert_eq!(date.year(), "2024");
        assert_eq!(date.month().get(), 1);
        assert_eq!(date.day().get(), 15);
        assert_eq!(date.hour().get(), 10);
        assert_eq!(date.minute().get(), 30);
        assert_eq!(date.second().get(), 45);
        assert!(!date.is_utc());
        assert_eq!(date.timezone().to_string(), "+05:30");

        let utc = IsoDate::try_from("2024-01-15T10:30:45Z").unwrap();
        assert!(utc.is_utc());
        assert_eq!(utc.timezone(), Timezone::Utc);
    }

    #[test]
    fn test_parse_error_is_error_kind() {
        let result = "2024-13-01T00:00:00Z".parse::<IsoDate>();
        assert_eq!(result, Err(ErrorKind::InvalidMonth));

        let err: Box<dyn std::error::Error> = Box::new(ErrorKind::InvalidTZD);
        assert_eq!(err.to_string(), "Invalid TZD");
    }

    #[test]
    fn test_display_reproduces_input() {
        for text in ["2024-01-15T10:30:00Z", "1999-12-31T23:59:59-00:00"] {
            let date: IsoDate = text.parse().unwrap();
            assert_eq!(date.to_string(), text);
            assert_eq!(date.as_str(), text);
            assert_eq!(date.into_string(), text);
        }
    }

    #[test]
    fn test_serde() {
        let date: IsoDate = "2024-01-15T10:30:00+05:30".parse().unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-01-15T10:30:00+05:30\"");
        let parsed: IsoDate = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);

        let result: Result<IsoDate, _> = serde_json::from_str("\"2024-13-01T00:00:00Z\"");
        assert!(result.is_err());
    }
}
