//! Limit value codec.
//!
//! Values are C integer literals (`strtol` with base 0) followed by an
//! optional unit suffix. Lower-case suffixes are SI multipliers, upper-case
//! suffixes are binary multipliers.

use thiserror::Error;

use crate::limits::RLIM_INFINITY;

/// Failure to turn user text into a limit value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No digits, or the integer does not fit a signed 64-bit value.
    #[error("Error parsing limit value '{0}'")]
    Malformed(String),
    /// Unknown suffix or trailing characters after the suffix.
    #[error("Invalid limit '{0}'")]
    Invalid(String),
    /// The suffix multiplication overflowed.
    #[error("Limit value '{0}' out of range")]
    OutOfRange(String),
}

/// Result of scanning the integer prefix of a limit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanStatus {
    Success,
    NoDigits,
    Overflow,
}

/// Scan a C integer literal with automatic base detection.
///
/// Returns `(value, consumed_bytes, status)`.
fn scan_integer(s: &[u8]) -> (i64, usize, ScanStatus) {
    let mut i = 0;
    let len = s.len();

    while i < len && s[i].is_ascii_whitespace() {
        i += 1;
    }

    let mut negative = false;
    if i < len && s[i] == b'-' {
        negative = true;
        i += 1;
    } else if i < len && s[i] == b'+' {
        i += 1;
    }

    // "0x" only selects hex when a hex digit follows; otherwise the "0" is octal.
    let has_0x_prefix = i + 2 < len
        && s[i] == b'0'
        && (s[i + 1] == b'x' || s[i + 1] == b'X')
        && s[i + 2].is_ascii_hexdigit();

    let base: u64 = if has_0x_prefix {
        i += 2;
        16
    } else if i < len && s[i] == b'0' {
        8
    } else {
        10
    };

    let abs_max = if negative {
        9_223_372_036_854_775_808u64
    } else {
        9_223_372_036_854_775_807u64
    };
    let cutoff = abs_max / base;
    let cutlim = abs_max % base;

    let mut acc: u64 = 0;
    let mut any_digits = false;
    let mut overflow = false;

    while i < len {
        let c = s[i];
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => break,
        };
        if (digit as u64) >= base {
            break;
        }

        any_digits = true;

        if !overflow {
            if acc > cutoff || (acc == cutoff && (digit as u64) > cutlim) {
                overflow = true;
            } else {
                acc = acc * base + (digit as u64);
            }
        }
        i += 1;
    }

    if !any_digits {
        return (0, 0, ScanStatus::NoDigits);
    }
    if overflow {
        return (0, i, ScanStatus::Overflow);
    }

    let val = if negative {
        (acc as i64).wrapping_neg()
    } else {
        acc as i64
    };

    (val, i, ScanStatus::Success)
}

/// Multiplier for a unit suffix, `None` if `c` is not a known unit.
#[inline]
fn suffix_multiplier(c: u8) -> Option<u64> {
    match c {
        b'k' => Some(1_000),
        b'm' => Some(1_000_000),
        b'g' => Some(1_000_000_000),
        b'K' => Some(1 << 10),
        b'M' => Some(1 << 20),
        b'G' => Some(1 << 30),
        _ => None,
    }
}

/// Parse a limit value such as `"4096"`, `"10k"`, `"2G"` or `"0x1000"`.
///
/// Negative integers are reinterpreted as their unsigned bit pattern, so
/// `"-1"` yields `u64::MAX`.
pub fn parse_limit(text: &str) -> Result<u64, ParseError> {
    let bytes = text.as_bytes();
    let (value, consumed, status) = scan_integer(bytes);
    match status {
        ScanStatus::Success => {}
        ScanStatus::NoDigits | ScanStatus::Overflow => {
            return Err(ParseError::Malformed(text.to_string()));
        }
    }

    let value = value as u64;
    match &bytes[consumed..] {
        [] => Ok(value),
        [suffix] => {
            let multiplier =
                suffix_multiplier(*suffix).ok_or_else(|| ParseError::Invalid(text.to_string()))?;
            value
                .checked_mul(multiplier)
                .ok_or_else(|| ParseError::OutOfRange(text.to_string()))
        }
        _ => Err(ParseError::Invalid(text.to_string())),
    }
}

const HUMAN_UNITS: [(u64, char); 3] = [(1 << 30, 'G'), (1 << 20, 'M'), (1 << 10, 'K')];

/// Format a limit value for display.
///
/// The infinity sentinel always renders as `unlimited`. With `human` set,
/// values of at least 1 KiB are scaled to the largest fitting binary unit
/// with two decimals. The output is lossy and not meant to be parsed back.
pub fn format_limit(value: u64, human: bool) -> String {
    if value == RLIM_INFINITY {
        return "unlimited".to_string();
    }

    if human {
        for (scale, unit) in HUMAN_UNITS {
            if scale <= value {
                return format!("{:.2}{unit}", value as f64 / scale as f64);
            }
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_bases() {
        assert_eq!(parse_limit("4096"), Ok(4096));
        assert_eq!(parse_limit("0x400"), Ok(1024));
        assert_eq!(parse_limit("0X1f"), Ok(31));
        assert_eq!(parse_limit("0755"), Ok(0o755));
        assert_eq!(parse_limit("0"), Ok(0));
        assert_eq!(parse_limit("  +12"), Ok(12));
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_limit("10k"), Ok(10_000));
        assert_eq!(parse_limit("10K"), Ok(10_240));
        assert_eq!(parse_limit("3m"), Ok(3_000_000));
        assert_eq!(parse_limit("3M"), Ok(3 << 20));
        assert_eq!(parse_limit("1g"), Ok(1_000_000_000));
        assert_eq!(parse_limit("1G"), Ok(1_073_741_824));
        // Suffix applies after base detection.
        assert_eq!(parse_limit("0x10K"), Ok(16 << 10));
    }

    #[test]
    fn test_parse_negative_wraps() {
        assert_eq!(parse_limit("-1"), Ok(u64::MAX));
        assert_eq!(parse_limit("-2"), Ok(u64::MAX - 1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_limit("abc"),
            Err(ParseError::Malformed("abc".to_string()))
        );
        assert!(matches!(parse_limit("k"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse_limit("-"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse_limit("10x"), Err(ParseError::Invalid(_))));
        assert!(matches!(parse_limit("10kk"), Err(ParseError::Invalid(_))));
        assert!(matches!(parse_limit("10 "), Err(ParseError::Invalid(_))));
        // '9' is not an octal digit, so it is left over.
        assert!(matches!(parse_limit("09"), Err(ParseError::Invalid(_))));
        assert!(matches!(parse_limit("0x"), Err(ParseError::Invalid(_))));
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(parse_limit("9223372036854775807"), Ok(i64::MAX as u64));
        assert!(matches!(
            parse_limit("9223372036854775808"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_limit("9223372036854775807G"),
            Err(ParseError::OutOfRange(_))
        ));
        assert!(matches!(parse_limit("-1k"), Err(ParseError::OutOfRange(_))));
    }

    #[test]
    fn test_error_messages_name_input() {
        let err = parse_limit("12q").unwrap_err();
        assert_eq!(err.to_string(), "Invalid limit '12q'");
        let err = parse_limit("abc").unwrap_err();
        assert_eq!(err.to_string(), "Error parsing limit value 'abc'");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_limit(0, false), "0");
        assert_eq!(format_limit(8_388_608, false), "8388608");
        assert_eq!(format_limit(RLIM_INFINITY, false), "unlimited");
        assert_eq!(format_limit(RLIM_INFINITY, true), "unlimited");
    }

    #[test]
    fn test_format_human() {
        assert_eq!(format_limit(parse_limit("2G").unwrap(), true), "2.00G");
        assert_eq!(format_limit(1536, true), "1.50K");
        assert_eq!(format_limit(8 << 20, true), "8.00M");
        assert_eq!(format_limit(1023, true), "1023");
        assert_eq!(format_limit(1024, true), "1.00K");
        assert_eq!(format_limit(5 << 40, true), "5120.00G");
    }

    #[test]
    fn test_plain_format_parses_back() {
        for v in [0u64, 1, 7, 10, 999, 1023, 4096, 65_535, 1 << 31, 1 << 40] {
            assert_eq!(parse_limit(&format_limit(v, false)), Ok(v), "value {v}");
        }
    }
}
