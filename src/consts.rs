/// Length of the UTC form `YYYY-MM-DDThh:mm:ssZ`
pub const ISO_8601_LEN_GMT: usize = 20;
/// Length of the offset form `YYYY-MM-DDThh:mm:ss+hh:mm`
pub const ISO_8601_LEN_OFFSET: usize = 25;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;
/// First month of the year
pub const MIN_MONTH: u8 = 1;
/// Maximum day of any month, no calendar check is applied on top
pub const MAX_DAY: u8 = 31;
/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;
/// Maximum hour of day, also the bound for offset hours
pub const MAX_HOUR: u8 = 23;
/// Maximum minute, also the bound for offset minutes
pub const MAX_MINUTE: u8 = 59;
/// Maximum second (no leap seconds)
pub const MAX_SECOND: u8 = 59;

/// Date component separator (ISO 8601 extended format)
pub const DATE_SEPARATOR: u8 = b'-';
/// Separator between the date and time halves
pub const TIME_DESIGNATOR: u8 = b'T';
/// Time component separator
pub const TIME_SEPARATOR: u8 = b':';
/// Timezone designator for UTC
pub const UTC_DESIGNATOR: u8 = b'Z';
/// Sign introducing an eastward offset
pub const OFFSET_PLUS: u8 = b'+';
/// Sign introducing a westward offset
pub const OFFSET_MINUS: u8 = b'-';

// Byte offsets into a candidate, shared by both layouts.
pub(crate) const YEAR_AT: usize = 0;
pub(crate) const DASH1_AT: usize = 4;
pub(crate) const MONTH_AT: usize = 5;
pub(crate) const DASH2_AT: usize = 7;
pub(crate) const DAY_AT: usize = 8;
pub(crate) const TEE_AT: usize = 10;
pub(crate) const HOUR_AT: usize = 11;
pub(crate) const COLON1_AT: usize = 13;
pub(crate) const MINUTE_AT: usize = 14;
pub(crate) const COLON2_AT: usize = 16;
pub(crate) const SECOND_AT: usize = 17;
pub(crate) const TZD_AT: usize = 19;
pub(crate) const TZ_HOUR_AT: usize = 20;
pub(crate) const COLON3_AT: usize = 22;
pub(crate) const TZ_MINUTE_AT: usize = 23;

/// Default bound on a single input line, in bytes
pub const DEFAULT_MAX_LINE_LEN: usize = 256;
/// Default input file, relative to the working directory
pub const DEFAULT_INPUT_PATH: &str = "./infile";
/// Default output file, relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "./outfile";
