use std::time::Duration;

use crate::error::{AppError, AppResult, ValidationError};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;
/// Fraction digits beyond nanosecond precision are ignored.
const MAX_FRACTION_DIGITS: usize = 9;

/// Parses a duration literal such as `0`, `250us`, `1.5ms` or `1h30m`.
///
/// A bare number without a unit is read as seconds.
pub(crate) fn parse_duration_literal(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }
    if value == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = value;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);
        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(fraction) => {
                let frac_len = fraction.bytes().take_while(u8::is_ascii_digit).count();
                fraction.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            });
        }

        let unit_len = after_number
            .find(|ch: char| ch.is_ascii_digit() || ch == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        let scale = match unit {
            "ns" => 1,
            "us" | "\u{b5}s" | "\u{3bc}s" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            "" if rest.len() == value.len() => NANOS_PER_SEC,
            _ => {
                return Err(ValidationError::InvalidDurationUnit {
                    unit: unit.to_owned(),
                });
            }
        };

        let whole = if int_part.is_empty() {
            0
        } else {
            u128::from(int_part.parse::<u64>().map_err(|err| {
                ValidationError::InvalidDurationNumber {
                    value: value.to_owned(),
                    source: err,
                }
            })?)
        };
        let segment = whole
            .checked_mul(scale)
            .and_then(|nanos| nanos.checked_add(fraction_nanos(frac_part, scale)))
            .ok_or(ValidationError::DurationOverflow)?;
        total = total
            .checked_add(segment)
            .ok_or(ValidationError::DurationOverflow)?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_err| ValidationError::DurationOverflow)?;
    Ok(Duration::from_nanos(nanos))
}

fn fraction_nanos(digits: &str, scale: u128) -> u128 {
    let digits = digits.get(..MAX_FRACTION_DIGITS).unwrap_or(digits);
    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in digits.bytes() {
        numerator = numerator
            .saturating_mul(10)
            .saturating_add(u128::from(digit.saturating_sub(b'0')));
        denominator = denominator.saturating_mul(10);
    }
    numerator
        .saturating_mul(scale)
        .checked_div(denominator)
        .unwrap_or(0)
}

/// Parses a strictly positive duration for flags such as `--window`.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_literal(s).map_err(AppError::validation)?;
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

/// Splits a comma separated input list, dropping empty entries.
pub(crate) fn parse_inputs(s: &str) -> AppResult<Vec<String>> {
    let inputs: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if inputs.is_empty() {
        return Err(AppError::validation(ValidationError::MissingInputs));
    }
    Ok(inputs)
}
