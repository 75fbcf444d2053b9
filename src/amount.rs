use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_with::DeserializeFromStr;

use std::{fmt::Display, path::Path, str::FromStr, sync::OnceLock};

use crate::error::{Error, Result};

/// Represents a monetary amount read from an `amount` column.
///
/// The value is held as an exact decimal, so summing any number of amounts
/// never drifts the way binary floating point does. The [`Display`]
/// implementation rounds to cents and groups thousands, as produced by
/// [`format_currency`]; the stored value itself is never rounded.
///
/// # Examples
///
/// ```
/// use sales_total::Amount;
///
/// let amount: Amount = " 1,200.40 ".parse().unwrap();
/// assert_eq!(amount.to_string(), "1,200.40");
/// ```
#[derive(Clone, Copy, Debug, Default, DeserializeFromStr, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the exact, unrounded value.
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Returns the value rounded to exactly two decimal places.
    #[must_use]
    pub fn rounded(self) -> Decimal {
        quantize(self.0)
    }

    /// Adds `rhs`, returning `None` if the result is out of range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_currency(self.0))
    }
}

/// Why some text is not an amount.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    Invalid(String),
    /// The text is a number, but too large or too precise for an exact
    /// decimal of 28 significant digits.
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// Sign, whole digits, fraction digits, exponent.
fn number_syntax() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(r"^([+-]?)(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?$")
            .expect("number syntax is a valid regex")
    })
}

/// Multiplies `value` by ten to the power `exp`, or `None` if the result
/// cannot be held exactly.
fn shift_point(mut value: Decimal, exp: i64) -> Option<Decimal> {
    let scale = i64::from(value.scale()) - exp;
    if scale >= 0 {
        value.set_scale(u32::try_from(scale).ok()?).ok()?;
        return Some(value);
    }
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    value.set_scale(0).ok()?;
    for _ in 0..(-scale).min(30) {
        value = value.checked_mul(Decimal::TEN)?;
    }
    Some(value)
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let cleaned = s.trim().replace(',', "");
        if cleaned.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        let invalid = || ParseAmountError::Invalid(s.to_string());
        let out_of_range = || ParseAmountError::OutOfRange(s.to_string());
        let caps = number_syntax().captures(&cleaned).ok_or_else(invalid)?;
        let whole = caps[2].trim_start_matches('0');
        let mut frac = caps.get(3).map_or("", |m| m.as_str());
        if caps[2].is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        // Zeros past the representable scale carry no value.
        while frac.len() > 28 && frac.ends_with('0') {
            frac = &frac[..frac.len() - 1];
        }
        let sign = if &caps[1] == "-" { "-" } else { "" };
        let whole = if whole.is_empty() { "0" } else { whole };
        let text = if frac.is_empty() {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{frac}")
        };
        let mut value = Decimal::from_str_exact(&text).map_err(|_| out_of_range())?;
        if let Some(exp) = caps.get(4) {
            let exp: i64 = exp.as_str().parse().map_err(|_| out_of_range())?;
            value = shift_point(value, exp).ok_or_else(out_of_range)?;
        }
        Ok(Self(value))
    }
}

/// Parses the amount text found in `path` on `line`.
///
/// # Errors
///
/// Returns [`Error::MissingValue`] if `raw` is blank once whitespace and
/// commas are stripped, [`Error::InvalidAmount`] if it is not a decimal
/// number, or [`Error::AmountOutOfRange`] if it cannot be held exactly.
pub fn parse_amount(raw: &str, path: &Path, line: usize) -> Result<Amount> {
    raw.parse().map_err(|e| match e {
        ParseAmountError::Empty => Error::MissingValue {
            path: path.to_path_buf(),
            line,
        },
        ParseAmountError::Invalid(value) => Error::InvalidAmount {
            path: path.to_path_buf(),
            line,
            value,
        },
        ParseAmountError::OutOfRange(value) => Error::AmountOutOfRange {
            path: path.to_path_buf(),
            line,
            value,
        },
    })
}

/// Rounds `value` to cents, half to even, always keeping two decimal places.
#[must_use]
pub fn quantize(value: Decimal) -> Decimal {
    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    cents.rescale(2);
    if cents.is_zero() {
        cents.set_sign_positive(true);
    }
    cents
}

/// Formats `value` as currency: two decimal places, with a comma between
/// every group of three digits left of the point.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use sales_total::format_currency;
///
/// assert_eq!(format_currency(Decimal::new(125040, 2)), "1,250.40");
/// assert_eq!(format_currency(Decimal::new(50, 0)), "50.00");
/// ```
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let cents = quantize(value);
    let digits = cents.abs().to_string();
    let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if cents.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}.{frac}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
