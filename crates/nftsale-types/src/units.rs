//! Conversion between human-readable currency amounts and smallest units.
//!
//! The protocol only ever handles `u128` smallest units. These helpers are
//! for configuration files, scripts and logs: `parse_units("9.5", 18)`
//! yields `9_500_000_000_000_000_000`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{Result, SaleError};

/// Largest decimal count a `Decimal` scale can represent.
const MAX_DECIMALS: u32 = 28;

/// Parse a decimal string into smallest units with `decimals` places.
///
/// # Errors
/// Returns [`SaleError::InvalidUnits`] if the string is not a decimal, is
/// negative, has more fractional digits than `decimals`, or overflows.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u128> {
    if decimals > MAX_DECIMALS {
        return Err(SaleError::InvalidUnits(format!(
            "{decimals} decimals exceeds maximum of {MAX_DECIMALS}"
        )));
    }
    let value: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| SaleError::InvalidUnits(format!("{amount:?}: {e}")))?;
    if value.is_sign_negative() {
        return Err(SaleError::InvalidUnits(format!("{amount:?} is negative")));
    }

    let multiplier = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
    let scaled = value
        .checked_mul(multiplier)
        .ok_or_else(|| SaleError::InvalidUnits(format!("{amount:?} overflows")))?;
    if !scaled.fract().is_zero() {
        return Err(SaleError::InvalidUnits(format!(
            "{amount:?} has more than {decimals} fractional digits"
        )));
    }
    scaled
        .to_u128()
        .ok_or_else(|| SaleError::InvalidUnits(format!("{amount:?} out of range")))
}

/// Render smallest units as a decimal string with trailing zeros removed.
///
/// # Errors
/// Returns [`SaleError::InvalidUnits`] if `value` exceeds the 96-bit
/// mantissa a `Decimal` can hold.
pub fn format_units(value: u128, decimals: u32) -> Result<String> {
    let mantissa = i128::try_from(value)
        .map_err(|_| SaleError::InvalidUnits(format!("{value} out of range")))?;
    let amount = Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map_err(|e| SaleError::InvalidUnits(format!("{value}: {e}")))?;
    Ok(amount.normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_units("10", 18).unwrap(), 10 * ETH);
        assert_eq!(parse_units("9.5", 18).unwrap(), 9 * ETH + ETH / 2);
        assert_eq!(parse_units("0.5", 18).unwrap(), ETH / 2);
        assert_eq!(parse_units("0.000000000000000001", 18).unwrap(), 1);
        assert_eq!(parse_units(" 3 ", 0).unwrap(), 3);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_units("abc", 18).is_err());
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units("0.0000000000000000001", 18).is_err());
        assert!(parse_units("1.5", 0).is_err());
        assert!(parse_units("1", 29).is_err());
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_units(10 * ETH, 18).unwrap(), "10");
        assert_eq!(format_units(9 * ETH + ETH / 2, 18).unwrap(), "9.5");
        assert_eq!(format_units(1, 18).unwrap(), "0.000000000000000001");
        assert_eq!(format_units(0, 18).unwrap(), "0");
    }

    #[test]
    fn format_rejects_oversized_values() {
        assert!(format_units(u128::MAX, 18).is_err());
    }
}
