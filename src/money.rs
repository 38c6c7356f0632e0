//! Positive monetary amounts with cent precision.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const CENTS_PER_UNIT: i64 = 100;
const CENTS_EXPONENT: i64 = 2;

/// Errors returned while parsing a monetary amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The value is not a decimal number.
    #[error("invalid amount '{0}', expected a decimal number")]
    Malformed(String),

    /// The value is zero or negative once rounded to cents.
    #[error("amount must be positive, got '{0}'")]
    NotPositive(String),

    /// The value does not fit the persisted representation.
    #[error("amount '{0}' is too large")]
    TooLarge(String),
}

/// A positive amount stored as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Parses a decimal string such as `50`, `49.9`, `12.345`, `.5`, or
    /// `1.5e2`.
    ///
    /// Any number of fractional digits and an optional exponent are accepted.
    /// The value is rounded half-up to whole cents.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] when the input is not a decimal number, is not
    /// positive after rounding, or overflows.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let trimmed = raw.trim();
        let malformed = || MoneyError::Malformed(raw.to_owned());
        let not_positive = || MoneyError::NotPositive(raw.to_owned());
        let too_large = || MoneyError::TooLarge(raw.to_owned());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((base, power)) => (base, parse_exponent(power, raw)?),
            None => (unsigned, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let is_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(malformed());
        }

        let joined = format!("{whole}{fraction}");
        let digits = joined.trim_start_matches('0');
        if digits.is_empty() || negative {
            return Err(not_positive());
        }

        let fraction_len = i64::try_from(fraction.len()).map_err(|_| too_large())?;
        let shift = exponent
            .checked_add(CENTS_EXPONENT)
            .and_then(|value| value.checked_sub(fraction_len))
            .ok_or_else(too_large)?;
        let cents = if shift >= 0 {
            let factor = u32::try_from(shift)
                .ok()
                .and_then(|power| 10_i64.checked_pow(power))
                .ok_or_else(too_large)?;
            digits
                .parse::<i64>()
                .ok()
                .and_then(|value| value.checked_mul(factor))
                .ok_or_else(too_large)?
        } else {
            round_half_up(digits, shift.unsigned_abs()).ok_or_else(too_large)?
        };

        Self::from_cents(cents).map_err(|_| not_positive())
    }

    /// Creates an amount from whole cents.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NotPositive`] when `cents` is zero or negative.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        if cents <= 0 {
            return Err(MoneyError::NotPositive(cents.to_string()));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in whole cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

fn parse_exponent(exponent: &str, raw: &str) -> Result<i64, MoneyError> {
    let unsigned = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    if unsigned.is_empty() || !unsigned.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(MoneyError::Malformed(raw.to_owned()));
    }
    exponent.parse::<i64>().map_err(|_| {
        if exponent.starts_with('-') {
            MoneyError::NotPositive(raw.to_owned())
        } else {
            MoneyError::TooLarge(raw.to_owned())
        }
    })
}

/// Drops the last `dropped_count` digits of `digits`, rounding half-up.
///
/// Returns `None` when the kept digits overflow.
fn round_half_up(digits: &str, dropped_count: u64) -> Option<i64> {
    let dropped = usize::try_from(dropped_count).unwrap_or(usize::MAX);
    let Some(kept_len) = digits.len().checked_sub(dropped) else {
        return Some(0);
    };
    let (kept, rest) = digits.split_at_checked(kept_len)?;
    let kept_value = if kept.is_empty() {
        0
    } else {
        kept.parse::<i64>().ok()?
    };
    let round_up = rest.starts_with(['5', '6', '7', '8', '9']);
    kept_value.checked_add(i64::from(round_up))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0.div_euclid(CENTS_PER_UNIT);
        let cents = self.0.rem_euclid(CENTS_PER_UNIT);
        write!(f, "{units}.{cents:02}")
    }
}
