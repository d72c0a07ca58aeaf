//! Time codec
//!
//! [`TimeSpec`] is the canonical trim timestamp. It converts between three
//! textual shapes:
//!
//! - the short form typed by users and embedded in output names
//!   (`"1-30.5"`, `"25-"`, `"2--"`), see [`TimeSpec::from_short`] and
//!   [`TimeSpec::to_short`];
//! - the fixed-width canonical digits `HHMMSSmm`, see
//!   [`TimeSpec::to_canonical`];
//! - the clock form `HH:MM:SS.fff` used on encoder command lines and printed
//!   by ffprobe, see [`TimeSpec::from_clock`] and the `Display` impl.
//!
//! The short form is lossy on purpose: it elides zero units so that file
//! names stay short. `to_short(from_short(s))` is stable once normalised,
//! but two different spellings can map to the same short rendering.

use std::fmt;

use crate::error::{CutError, CutResult};

/// Trim timestamp with millisecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeSpec {
    hours: u32,
    minutes: u32,
    seconds: u32,
    millis: u32,
}

impl TimeSpec {
    /// Sentinel meaning "not given": seek from the beginning, encode to the end.
    pub const ZERO: TimeSpec = TimeSpec {
        hours: 0,
        minutes: 0,
        seconds: 0,
        millis: 0,
    };

    /// Create a new TimeSpec from its units
    pub fn new(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            millis: millis.min(999),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn millis(&self) -> u32 {
        self.millis
    }

    /// True for the "not given" sentinel
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Parse the short form `[[H-]M-]S[.f]` into a TimeSpec.
    ///
    /// Up to three hyphen separated components of one or two digits each,
    /// seconds last. A component may be empty, which is how `to_short`
    /// writes a zero unit (`"25-"` is 25 minutes). The optional fraction has
    /// one to three digits and is right-padded, so `".5"` is half a second.
    /// A blank string is the zero sentinel.
    pub fn from_short(short: &str) -> CutResult<Self> {
        let trimmed = short.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (trimmed, None),
        };

        let millis = match fraction {
            Some(digits) => parse_fraction(digits, 3).ok_or_else(|| CutError::format(short))?,
            None => 0,
        };

        let parts: Vec<&str> = whole.split('-').collect();
        if parts.len() > 3 {
            return Err(CutError::format(short));
        }

        let mut units = [0u32; 3];
        let offset = 3 - parts.len();
        for (i, part) in parts.iter().enumerate() {
            units[offset + i] = parse_unit(part, 2).ok_or_else(|| CutError::format(short))?;
        }

        Ok(Self::new(units[0], units[1], units[2], millis))
    }

    /// Parse the fixed-width `HHMMSSmm` digits.
    ///
    /// Anything beyond eight digits widens the hours field.
    pub fn from_canonical(digits: &str) -> CutResult<Self> {
        let digits = digits.trim();
        if digits.len() < 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CutError::format(digits));
        }

        let split = digits.len() - 6;
        let field = |range: std::ops::Range<usize>| -> CutResult<u32> {
            digits[range]
                .parse::<u32>()
                .map_err(|_| CutError::format(digits))
        };

        let hours = field(0..split)?;
        let minutes = field(split..split + 2)?;
        let seconds = field(split + 2..split + 4)?;
        let hundredths = field(split + 4..split + 6)?;

        Ok(Self::new(hours, minutes, seconds, hundredths * 10))
    }

    /// Parse the clock form `H:MM:SS[.f]`.
    ///
    /// Hours take any number of digits; the fraction takes up to nine and is
    /// truncated to milliseconds (ffprobe prints microseconds).
    pub fn from_clock(clock: &str) -> CutResult<Self> {
        let trimmed = clock.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 3 {
            return Err(CutError::format(clock));
        }

        let (secs, fraction) = match parts[2].split_once('.') {
            Some((secs, fraction)) => (secs, Some(fraction)),
            None => (parts[2], None),
        };

        let hours = parse_unit(parts[0], 9)
            .filter(|_| !parts[0].is_empty())
            .ok_or_else(|| CutError::format(clock))?;
        let minutes = parse_unit(parts[1], 2)
            .filter(|_| !parts[1].is_empty())
            .ok_or_else(|| CutError::format(clock))?;
        let seconds = parse_unit(secs, 2)
            .filter(|_| !secs.is_empty())
            .ok_or_else(|| CutError::format(clock))?;
        let millis = match fraction {
            Some(digits) => parse_fraction(digits, 9).ok_or_else(|| CutError::format(clock))?,
            None => 0,
        };

        Ok(Self::new(hours, minutes, seconds, millis))
    }

    /// Fixed-width `HHMMSSmm` digits, hundredths truncated
    pub fn to_canonical(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:02}",
            self.hours,
            self.minutes,
            self.seconds,
            self.millis / 10
        )
    }

    /// Short, file-name friendly rendering.
    ///
    /// Zero units render empty, other units lose their leading zero, units
    /// are hyphen joined and leading hyphens dropped. The fraction appears
    /// only when nonzero, without trailing zeros. The zero sentinel renders
    /// as the empty string.
    pub fn to_short(&self) -> String {
        let units: Vec<String> = [self.hours, self.minutes, self.seconds]
            .iter()
            .map(|unit| {
                if *unit == 0 {
                    String::new()
                } else {
                    unit.to_string()
                }
            })
            .collect();

        let mut short = units.join("-").trim_start_matches('-').to_string();

        if self.millis > 0 {
            let fraction = format!("{:03}", self.millis);
            short.push('.');
            short.push_str(fraction.trim_end_matches('0'));
        }

        short
    }

    /// Same instant with the sub-second part dropped
    pub fn whole_seconds(&self) -> TimeSpec {
        Self::new(self.hours, self.minutes, self.seconds, 0)
    }

    /// `HH:MM:SS` without fraction, as used for the fast input seek
    pub fn to_clock_whole(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    pub fn total_millis(&self) -> u64 {
        (self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64) * 1000
            + self.millis as u64
    }

    pub fn as_seconds(&self) -> f64 {
        self.total_millis() as f64 / 1000.0
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// Plain unit arithmetic, no calendar. Fails when `earlier` is later.
    pub fn seconds_since(&self, earlier: &TimeSpec) -> CutResult<f64> {
        let span = self.millis_since(earlier)?;
        Ok(span as f64 / 1000.0)
    }

    pub(crate) fn millis_since(&self, earlier: &TimeSpec) -> CutResult<u64> {
        self.total_millis()
            .checked_sub(earlier.total_millis())
            .ok_or_else(|| CutError::InvalidRange {
                start: earlier.to_string(),
                end: self.to_string(),
            })
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

/// Render a millisecond span the way an encoder `-to` argument expects:
/// `H:MM:SS`, with a six digit fraction only when there is one.
pub fn format_span(millis: u64) -> String {
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let rest = millis % 1000;

    if rest == 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}:{:02}.{:06}", hours, minutes, secs, rest * 1000)
    }
}

/// Unit of at most `max_digits` ASCII digits; empty means zero
fn parse_unit(part: &str, max_digits: usize) -> Option<u32> {
    if part.is_empty() {
        return Some(0);
    }
    if part.len() > max_digits || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Fraction digits to milliseconds, right-padded and truncated
fn parse_fraction(digits: &str, max_digits: usize) -> Option<u32> {
    if digits.is_empty()
        || digits.len() > max_digits
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}
