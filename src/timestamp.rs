//! Conversion between seconds and the `HH:MM:SS,mmm` / `HH:MM:SS.mmm`
//! clock notations.

use crate::error::EngineError;

use nom::character::complete::{char, digit1};
use nom::error::{ErrorKind, ParseError, VerboseError};
use nom::IResult;

const MILLIS_PER_SECOND: u64 = 1000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MAX_MILLIS: u64 = 1_000_000_000_000_000;

/// Largest time the engine stores. Every millisecond up to it is exact in
/// an `f64`, with headroom for the edit offsets added on top.
pub const MAX_SECONDS: f64 = 1_000_000_000_000.0;

/// Value substituted when a typed timestamp cannot be decoded.
pub const DEFAULT_SECONDS: f64 = 0.0;

/// The clock notation of a timed dialect. Only the separator between the
/// seconds and the milliseconds differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    Srt,
    WebVtt,
}

impl Clock {
    pub fn separator(self) -> char {
        match self {
            Clock::Srt => ',',
            Clock::WebVtt => '.',
        }
    }
}

/// Formats `seconds` as a clock value, rounded to the nearest millisecond.
/// Hours are not wrapped, so 100 hours renders as `100:00:00,000`.
pub fn encode(seconds: f64, clock: Clock) -> String {
    let millis = to_millis(seconds);
    let hours = millis / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let secs = (millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = millis % MILLIS_PER_SECOND;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        clock.separator(),
        millis
    )
}

/// Reads a clock value of exactly the shape `H:M:S<sep>mmm` (any number of
/// digits per field) and returns it in seconds. Well-shaped values above
/// [`MAX_SECONDS`] are reported as out of range.
pub fn decode(text: &str, clock: Clock) -> Result<f64, EngineError> {
    match clock_fields(text, clock) {
        Ok(("", fields)) => {
            to_seconds(fields).ok_or_else(|| EngineError::TimestampOutOfRange(text.to_string()))
        }
        _ => Err(EngineError::MalformedTimestamp(text.to_string())),
    }
}

/// Like [`decode`], but falls back to [`DEFAULT_SECONDS`] and hands the
/// failure back as a notice instead of an error.
pub fn decode_or_default(text: &str, clock: Clock) -> (f64, Option<EngineError>) {
    match decode(text, clock) {
        Ok(seconds) => (seconds, None),
        Err(err) => (DEFAULT_SECONDS, Some(err)),
    }
}

pub(crate) fn timestamp(input: &str, clock: Clock) -> IResult<&str, f64, VerboseError<&str>> {
    let (rest, fields) = clock_fields(input, clock)?;
    match to_seconds(fields) {
        Some(seconds) => Ok((rest, seconds)),
        None => Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TooLarge,
        ))),
    }
}

/// Hours, minutes, seconds and milliseconds, still as digit strings.
fn clock_fields(input: &str, clock: Clock) -> IResult<&str, [&str; 4], VerboseError<&str>> {
    let (input, hours) = digit1(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = digit1(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = digit1(input)?;
    let (input, _) = char(clock.separator())(input)?;
    let (input, millis) = digit1(input)?;

    Ok((input, [hours, minutes, seconds, millis]))
}

fn to_seconds([hours, minutes, seconds, millis]: [&str; 4]) -> Option<f64> {
    let field = |digits: &str, scale: u64| -> Option<u64> {
        digits.parse::<u64>().ok()?.checked_mul(scale)
    };
    let total = field(hours, MILLIS_PER_HOUR)?
        .checked_add(field(minutes, MILLIS_PER_MINUTE)?)?
        .checked_add(field(seconds, MILLIS_PER_SECOND)?)?
        .checked_add(field(millis, 1)?)?;
    if total > MAX_MILLIS {
        return None;
    }
    Some(from_millis(total))
}

/// Rounds to millisecond precision. Negative and NaN inputs collapse to 0.
pub(crate) fn to_millis(seconds: f64) -> u64 {
    (seconds * MILLIS_PER_SECOND as f64).round() as u64
}

pub(crate) fn from_millis(millis: u64) -> f64 {
    millis as f64 / MILLIS_PER_SECOND as f64
}

pub(crate) fn quantize(seconds: f64) -> f64 {
    from_millis(to_millis(seconds))
}
