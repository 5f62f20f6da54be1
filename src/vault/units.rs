// Decimal <-> base unit conversion (18 fractional digits)

use thiserror::Error;

/// Amount of custodied value in the smallest native unit
pub type Amount = u128;

/// Number of fractional digits in one whole unit
pub const DECIMALS: u32 = 18;

/// Base units in one whole unit
pub const UNIT: Amount = 1_000_000_000_000_000_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Invalid character in amount: {0:?}")]
    InvalidDigit(char),

    #[error("Too many decimal places: at most {max}, got {got}")]
    TooManyDecimals { max: u32, got: usize },

    #[error("Amount overflows the base unit range")]
    Overflow,
}

/// Parse a decimal amount such as `"0.02"` into base units.
pub fn parse_units(input: &str) -> Result<Amount, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Empty);
    }

    if fraction.len() > DECIMALS as usize {
        return Err(UnitsError::TooManyDecimals {
            max: DECIMALS,
            got: fraction.len(),
        });
    }

    let whole_units = parse_digits(whole)?
        .checked_mul(UNIT)
        .ok_or(UnitsError::Overflow)?;

    // right-pad the fraction to exactly DECIMALS digits
    let scale = 10u128.pow(DECIMALS - fraction.len() as u32);
    let fraction_units = parse_digits(fraction)? * scale;

    whole_units
        .checked_add(fraction_units)
        .ok_or(UnitsError::Overflow)
}

/// Format base units as a decimal string with trailing zeros trimmed.
pub fn format_units(amount: Amount) -> String {
    let whole = amount / UNIT;
    let fraction = amount % UNIT;

    if fraction == 0 {
        return whole.to_string();
    }

    let padded = format!("{:0width$}", fraction, width = DECIMALS as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

fn parse_digits(digits: &str) -> Result<Amount, UnitsError> {
    digits.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(10).ok_or(UnitsError::InvalidDigit(c))?;
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or(UnitsError::Overflow)
    })
}
