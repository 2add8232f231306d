//! Cross-field operand resolution.
//!
//! Comparison and relationship rules take one ambiguous parameter: it may
//! name another field or be a literal. A token that exactly resolves to an
//! existing field is a field reference; anything else is a literal of the
//! shape the comparison expects. Field references that do not exist fall
//! through to the literal reading, and when that reading is impossible the
//! rule passes vacuously rather than failing on a missing trigger.

use crate::rule::Check;
use crate::value;

/// Resolves a size-comparison operand (`gt:price`, `max:other_field`,
/// `between:1,limit`).
///
/// `None` means the operand has no usable magnitude (absent field that is
/// not a numeric literal, or a sizeless value like null) and the comparison
/// should pass vacuously.
pub(crate) fn comparison_size(check: &Check<'_>, token: &str) -> Option<f64> {
    if check.is_present(token) {
        check.size_of(token)
    } else {
        token.trim().parse::<f64>().ok()
    }
}

/// A resolved temporal operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Temporal {
    /// A comparable instant.
    At(i64),
    /// The operand exists but is not a parseable date; the comparison fails.
    Invalid,
    /// Neither a field nor a date literal; the comparison passes vacuously.
    Vacuous,
}

/// Resolves a temporal operand (`after:start_date`, `before:2030-01-01`).
pub(crate) fn temporal(check: &Check<'_>, token: &str) -> Temporal {
    if let Some(other) = check.other(token) {
        return match parse_datetime(&value::display(other)) {
            Some(at) => Temporal::At(at),
            None => Temporal::Invalid,
        };
    }
    match parse_datetime(token.trim()) {
        Some(at) => Temporal::At(at),
        None => Temporal::Vacuous,
    }
}

/// Parses `YYYY-MM-DD`, optionally followed by `THH:MM:SS` or
/// `' 'HH:MM:SS`, into a monotonically comparable key. Calendar bounds are
/// checked (months, per-month day counts, leap years, time-of-day ranges);
/// no timezone handling.
pub(crate) fn parse_datetime(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 && bytes.len() != 19 {
        return None;
    }
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let year: i64 = text.get(0..4)?.parse().ok()?;
    let month: i64 = parse_two_digits(text.get(5..7)?)?;
    let day: i64 = parse_two_digits(text.get(8..10)?)?;
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }

    let (hour, minute, second) = if bytes.len() == 19 {
        if !matches!(bytes[10], b'T' | b' ') || bytes[13] != b':' || bytes[16] != b':' {
            return None;
        }
        let hour = parse_two_digits(text.get(11..13)?)?;
        let minute = parse_two_digits(text.get(14..16)?)?;
        let second = parse_two_digits(text.get(17..19)?)?;
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        (hour, minute, second)
    } else {
        (0, 0, 0)
    };

    // Lexicographic-by-component encoding; only ordering matters.
    Some((year * 10_000 + month * 100 + day) * 100_000 + hour * 3_600 + minute * 60 + second)
}

fn parse_two_digits(text: &str) -> Option<i64> {
    if text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
