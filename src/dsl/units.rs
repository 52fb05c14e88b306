//! Time units and timestamp conversion.
//!
//! A timestamp token is one or more `<digits><unit>` segments joined by `:`,
//! e.g. `1h:30m` or `45s:5ds`. The canonical time base is milliseconds.

use thiserror::Error;

/// A unit symbol accepted in timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Hour,
    Minute,
    Second,
    Decisecond,
}

impl TimeUnit {
    /// Every unit, multi-character symbols first so `ds` is never read as `d` + `s`.
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Decisecond,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Hour => "h",
            TimeUnit::Minute => "m",
            TimeUnit::Second => "s",
            TimeUnit::Decisecond => "ds",
        }
    }

    /// Duration of one unit in milliseconds.
    pub const fn millis(self) -> u64 {
        match self {
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Second => 1_000,
            TimeUnit::Decisecond => 100,
        }
    }

    /// Look up a unit by its exact symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.symbol() == symbol)
    }
}

/// Maximum number of `:`-separated segments (one per unit).
pub const MAX_SEGMENTS: usize = 4;

/// Why a timestamp token was rejected. `offset` is the byte offset of the
/// offending segment inside the token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,
    #[error("timestamp ends with a trailing ':'")]
    TrailingSeparator { offset: usize },
    #[error("empty segment in timestamp")]
    EmptySegment { offset: usize },
    #[error("segment '{segment}' has no numeric value")]
    MissingValue { segment: String, offset: usize },
    #[error("segment '{segment}' uses an invalid unit (expected h, m, s or ds)")]
    InvalidUnit { segment: String, offset: usize },
    #[error("unit '{unit}' appears more than once")]
    DuplicateUnit { unit: &'static str, offset: usize },
    #[error("timestamp has more than 4 segments")]
    TooManySegments { offset: usize },
    #[error("timestamp is too large")]
    Overflow { offset: usize },
}

impl TimestampError {
    /// Byte offset inside the token where the problem starts.
    pub fn offset(&self) -> usize {
        match self {
            TimestampError::Empty => 0,
            TimestampError::TrailingSeparator { offset }
            | TimestampError::EmptySegment { offset }
            | TimestampError::MissingValue { offset, .. }
            | TimestampError::InvalidUnit { offset, .. }
            | TimestampError::DuplicateUnit { offset, .. }
            | TimestampError::TooManySegments { offset }
            | TimestampError::Overflow { offset } => *offset,
        }
    }
}

/// Split one segment such as `30s` into its value and unit.
fn parse_segment(segment: &str, offset: usize) -> Result<(u64, TimeUnit), TimestampError> {
    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    let (digits, symbol) = segment.split_at(digits_end);

    if digits.is_empty() {
        return Err(TimestampError::MissingValue {
            segment: segment.to_string(),
            offset,
        });
    }
    let unit = TimeUnit::from_symbol(symbol).ok_or_else(|| TimestampError::InvalidUnit {
        segment: segment.to_string(),
        offset,
    })?;
    let value = digits
        .parse::<u64>()
        .map_err(|_| TimestampError::Overflow { offset })?;
    Ok((value, unit))
}

/// Convert a compound timestamp token into milliseconds.
pub fn parse_timestamp(token: &str) -> Result<u64, TimestampError> {
    if token.is_empty() {
        return Err(TimestampError::Empty);
    }
    if token.ends_with(':') {
        return Err(TimestampError::TrailingSeparator {
            offset: token.len() - 1,
        });
    }

    let mut seen: Vec<TimeUnit> = Vec::with_capacity(MAX_SEGMENTS);
    let mut total: u64 = 0;
    let mut offset = 0;

    for (i, segment) in token.split(':').enumerate() {
        if i >= MAX_SEGMENTS {
            return Err(TimestampError::TooManySegments { offset });
        }
        if segment.is_empty() {
            return Err(TimestampError::EmptySegment { offset });
        }
        let (value, unit) = parse_segment(segment, offset)?;
        if seen.contains(&unit) {
            return Err(TimestampError::DuplicateUnit {
                unit: unit.symbol(),
                offset,
            });
        }
        seen.push(unit);

        total = value
            .checked_mul(unit.millis())
            .and_then(|ms| total.checked_add(ms))
            .ok_or(TimestampError::Overflow { offset })?;
        offset += segment.len() + 1;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_table_is_positive_and_unique() {
        for (i, a) in TimeUnit::ALL.iter().enumerate() {
            assert!(a.millis() > 0);
            for b in &TimeUnit::ALL[i + 1..] {
                assert_ne!(a.symbol(), b.symbol());
            }
        }
    }

    #[test]
    fn lookup_by_symbol() {
        assert_eq!(TimeUnit::from_symbol("ds"), Some(TimeUnit::Decisecond));
        assert_eq!(TimeUnit::from_symbol("h"), Some(TimeUnit::Hour));
        assert_eq!(TimeUnit::from_symbol("d"), None);
        assert_eq!(TimeUnit::from_symbol(""), None);
    }

    #[test]
    fn single_segments() {
        assert_eq!(parse_timestamp("5s"), Ok(5_000));
        assert_eq!(parse_timestamp("2m"), Ok(120_000));
        assert_eq!(parse_timestamp("1h"), Ok(3_600_000));
        assert_eq!(parse_timestamp("3ds"), Ok(300));
        assert_eq!(parse_timestamp("0s"), Ok(0));
    }

    #[test]
    fn compound_segments_sum() {
        assert_eq!(parse_timestamp("1m:30s"), Ok(90_000));
        assert_eq!(parse_timestamp("1h:2m:3s:4ds"), Ok(3_723_400));
    }

    #[test]
    fn segment_order_is_free() {
        assert_eq!(parse_timestamp("30s:1m"), parse_timestamp("1m:30s"));
        assert_eq!(parse_timestamp("5ds:1s"), Ok(1_500));
    }

    #[test]
    fn decisecond_not_split() {
        assert_eq!(parse_timestamp("15ds"), Ok(1_500));
    }

    #[test]
    fn trailing_separator_rejected() {
        assert_eq!(
            parse_timestamp("1m:"),
            Err(TimestampError::TrailingSeparator { offset: 2 })
        );
    }

    #[test]
    fn invalid_unit_rejected() {
        let err = parse_timestamp("1m:5x").unwrap_err();
        assert!(matches!(err, TimestampError::InvalidUnit { offset: 3, .. }));
        assert!(matches!(
            parse_timestamp("5d"),
            Err(TimestampError::InvalidUnit { .. })
        ));
        assert!(matches!(
            parse_timestamp("5"),
            Err(TimestampError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn missing_value_rejected() {
        assert!(matches!(
            parse_timestamp("s"),
            Err(TimestampError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_timestamp("-5s"),
            Err(TimestampError::MissingValue { .. })
        ));
    }

    #[test]
    fn empty_segment_rejected() {
        assert_eq!(
            parse_timestamp("1m::5s"),
            Err(TimestampError::EmptySegment { offset: 3 })
        );
        assert_eq!(
            parse_timestamp(":5s"),
            Err(TimestampError::EmptySegment { offset: 0 })
        );
    }

    #[test]
    fn duplicate_unit_rejected() {
        assert_eq!(
            parse_timestamp("1s:2s"),
            Err(TimestampError::DuplicateUnit {
                unit: "s",
                offset: 3
            })
        );
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            parse_timestamp("99999999999999999999s"),
            Err(TimestampError::Overflow { .. })
        ));
        assert!(matches!(
            parse_timestamp("18446744073709551h"),
            Err(TimestampError::Overflow { .. })
        ));
    }

    #[test]
    fn error_offsets() {
        assert_eq!(parse_timestamp("").unwrap_err().offset(), 0);
        assert_eq!(parse_timestamp("1h:2q").unwrap_err().offset(), 3);
    }
}
