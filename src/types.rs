use crate::consts::{
    COLON1_AT, COLON2_AT, COLON3_AT, DASH1_AT, DASH2_AT, DATE_SEPARATOR, DAY_AT, HOUR_AT,
    ISO_8601_LEN_GMT, ISO_8601_LEN_OFFSET, MAX_DAY, MAX_HOUR, MAX_MINUTE, MAX_MONTH, MAX_SECOND,
    MINUTE_AT, MIN_DAY, MIN_MONTH, MONTH_AT, OFFSET_MINUS, OFFSET_PLUS, SECOND_AT, TEE_AT,
    TIME_DESIGNATOR, TIME_SEPARATOR, TZ_HOUR_AT, TZ_MINUTE_AT, TZD_AT, UTC_DESIGNATOR, YEAR_AT,
};
use crate::ErrorKind;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ErrorKind::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ErrorKind> {
        let non_zero = NonZeroU8::new(value).ok_or(ErrorKind::InvalidMonth)?;
        if !(MIN_MONTH..=MAX_MONTH).contains(&value) {
            return Err(ErrorKind::InvalidMonth);
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A day value in the range `1..=MAX_DAY` (1..=31).
/// No month-length or leap-year check is applied, so `02-30` is a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and <= `MAX_DAY`
    ///
    /// # Errors
    /// Returns `ErrorKind::InvalidDay` if the value is 0 or > `MAX_DAY`.
    pub fn new(value: u8) -> Result<Self, ErrorKind> {
        let non_zero = NonZeroU8::new(value).ok_or(ErrorKind::InvalidDay)?;
        if !(MIN_DAY..=MAX_DAY).contains(&value) {
            return Err(ErrorKind::InvalidDay);
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Zero-based clock fields share one shape: `0..=max`, rejected with a
/// field-specific `ErrorKind`.
macro_rules! clock_field {
    ($(#[$meta:meta])* $name:ident, $max:expr, $err:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            #[doc = concat!("Creates a new ", stringify!($name), ", validating the upper bound")]
            ///
            /// # Errors
            #[doc = concat!("Returns `", stringify!($err), "` if the value is out of range.")]
            pub const fn new(value: u8) -> Result<Self, ErrorKind> {
                if value > $max {
                    return Err($err);
                }
                Ok(Self(value))
            }

            #[inline]
            pub const fn get(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ErrorKind;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:02}", self.0)
            }
        }
    };
}

clock_field!(
    /// Hour of day, `0..=23`
    Hour, MAX_HOUR, ErrorKind::InvalidHour
);
clock_field!(
    /// Minute of hour, `0..=59`
    Minute, MAX_MINUTE, ErrorKind::InvalidMin
);
clock_field!(
    /// Second of minute, `0..=59`
    Second, MAX_SECOND, ErrorKind::InvalidSec
);
clock_field!(
    /// Hours of a UTC offset, `0..=23`
    OffsetHours, MAX_HOUR, ErrorKind::InvalidTzHour
);
clock_field!(
    /// Minutes of a UTC offset, `0..=59`
    OffsetMinutes, MAX_MINUTE, ErrorKind::InvalidTzMin
);

/// Direction of a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OffsetSign {
    #[display(fmt = "+")]
    Plus,
    #[display(fmt = "-")]
    Minus,
}

/// Timezone part of a validated date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Timezone {
    /// `Z` suffix
    #[display(fmt = "Z")]
    Utc,
    /// `+hh:mm` or `-hh:mm` suffix
    #[display(fmt = "{sign}{hours}:{minutes}")]
    Offset {
        sign: OffsetSign,
        hours: OffsetHours,
        minutes: OffsetMinutes,
    },
}

/// Offset suffix fields of a 25-byte candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParts<'a> {
    pub hours: &'a [u8],
    pub colon: u8,
    pub minutes: &'a [u8],
}

/// Positional decomposition of a fixed-width candidate.
///
/// Fields borrow from the candidate. Nothing here is checked beyond the
/// overall length; [`DateParts::check`] applies the field rules in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts<'a> {
    pub year: &'a [u8],
    pub dash1: u8,
    pub month: &'a [u8],
    pub dash2: u8,
    pub day: &'a [u8],
    pub tee: u8,
    pub hour: &'a [u8],
    pub colon1: u8,
    pub minute: &'a [u8],
    pub colon2: u8,
    pub second: &'a [u8],
    pub tzd: u8,
    /// Present only for the offset form
    pub offset: Option<OffsetParts<'a>>,
}

/// Field values of a candidate that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTimeFields {
    pub month: Month,
    pub day: Day,
    pub hour: Hour,
    pub minute: Minute,
    pub second: Second,
    pub timezone: Timezone,
}

impl<'a> DateParts<'a> {
    /// Slices `candidate` at the fixed offsets of the two layouts.
    ///
    /// # Errors
    /// Returns `ErrorKind::InvalidLength` unless the candidate is exactly 20 or 25 bytes.
    pub fn split(candidate: &'a str) -> Result<Self, ErrorKind> {
        let bytes = candidate.as_bytes();
        let offset = match bytes.len() {
            ISO_8601_LEN_GMT => None,
            ISO_8601_LEN_OFFSET => Some(OffsetParts {
                hours: &bytes[TZ_HOUR_AT..TZ_HOUR_AT + 2],
                colon: bytes[COLON3_AT],
                minutes: &bytes[TZ_MINUTE_AT..TZ_MINUTE_AT + 2],
            }),
            _ => return Err(ErrorKind::InvalidLength),
        };

        Ok(Self {
            year: &bytes[YEAR_AT..DASH1_AT],
            dash1: bytes[DASH1_AT],
            month: &bytes[MONTH_AT..DASH2_AT],
            dash2: bytes[DASH2_AT],
            day: &bytes[DAY_AT..TEE_AT],
            tee: bytes[TEE_AT],
            hour: &bytes[HOUR_AT..COLON1_AT],
            colon1: bytes[COLON1_AT],
            minute: &bytes[MINUTE_AT..COLON2_AT],
            colon2: bytes[COLON2_AT],
            second: &bytes[SECOND_AT..TZD_AT],
            tzd: bytes[TZD_AT],
            offset,
        })
    }

    /// Applies the field rules in layout order; the first failure wins.
    ///
    /// The year is extracted but never checked, not even for digits: `ABCD`
    /// passes, so `InvalidYear` is never returned. Every other numeric field
    /// must be all digits before its range check.
    ///
    /// # Errors
    /// Returns the `ErrorKind` of the first field that fails.
    pub fn check(&self) -> Result<DateTimeFields, ErrorKind> {
        expect_byte(self.dash1, DATE_SEPARATOR)?;
        let month = Month::new(digits(self.month).ok_or(ErrorKind::InvalidMonth)?)?;
        expect_byte(self.dash2, DATE_SEPARATOR)?;
        let day = Day::new(digits(self.day).ok_or(ErrorKind::InvalidDay)?)?;
        expect_byte(self.tee, TIME_DESIGNATOR)?;
        let hour = Hour::new(digits(self.hour).ok_or(ErrorKind::InvalidHour)?)?;
        expect_byte(self.colon1, TIME_SEPARATOR)?;
        let minute = Minute::new(digits(self.minute).ok_or(ErrorKind::InvalidMin)?)?;
        expect_byte(self.colon2, TIME_SEPARATOR)?;
        let second = Second::new(digits(self.second).ok_or(ErrorKind::InvalidSec)?)?;

        let timezone = match self.offset {
            None if self.tzd == UTC_DESIGNATOR => Timezone::Utc,
            None => return Err(ErrorKind::InvalidTZD),
            Some(offset) => {
                let sign = match self.tzd {
                    OFFSET_PLUS => OffsetSign::Plus,
                    OFFSET_MINUS => OffsetSign::Minus,
                    _ => return Err(ErrorKind::InvalidTZD),
                };
                let hours =
                    OffsetHours::new(digits(offset.hours).ok_or(ErrorKind::InvalidTzHour)?)?;
                expect_byte(offset.colon, TIME_SEPARATOR)?;
                let minutes =
                    OffsetMinutes::new(digits(offset.minutes).ok_or(ErrorKind::InvalidTzMin)?)?;
                Timezone::Offset {
                    sign,
                    hours,
                    minutes,
                }
            }
        };

        Ok(DateTimeFields {
            month,
            day,
            hour,
            minute,
            second,
            timezone,
        })
    }
}

// Helper functions

const fn expect_byte(found: u8, expected: u8) -> Result<(), ErrorKind> {
    if found == expected {
        Ok(())
    } else {
        Err(ErrorKind::InvalidStructure)
    }
}

/// Parses a two-digit field. Any non-digit byte rejects the whole field.
pub fn digits(field: &[u8]) -> Option<u8> {
    match *field {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => Some((tens - b'0') * 10 + (ones - b'0')),
        _ => None,
    }
}
