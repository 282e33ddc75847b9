//! Shared helpers for Decimal ↔ f64 conversions.
//!
//! Temperatures are persisted as `NUMERIC(5,1)`; these keep the rounding in
//! one place. Non-finite inputs become `Decimal::ZERO`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert an f64 to Decimal, rounded to 1 decimal place.
pub(crate) fn f64_to_decimal_1dp(v: f64) -> Decimal {
    if !v.is_finite() {
        tracing::warn!(
            "f64_to_decimal_1dp received non-finite value {}, defaulting to 0",
            v
        );
        return Decimal::ZERO;
    }
    Decimal::from_str_exact(&format!("{:.1}", v)).unwrap_or_default()
}

/// Convert a Decimal to f64, defaulting to 0.0 for values that can't be represented.
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_f64_to_decimal_1dp_normal() {
        let d = f64_to_decimal_1dp(21.34);
        assert_eq!(d, Decimal::from_str("21.3").unwrap());
    }

    #[test]
    fn test_f64_to_decimal_1dp_rounds() {
        let d = f64_to_decimal_1dp(-3.16);
        assert_eq!(d, Decimal::from_str("-3.2").unwrap());
    }

    #[test]
    fn test_f64_to_decimal_1dp_nan() {
        assert_eq!(f64_to_decimal_1dp(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_f64_to_decimal_1dp_infinity() {
        assert_eq!(f64_to_decimal_1dp(f64::NEG_INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_dec_to_f64_normal() {
        let d = Decimal::from_str("20.5").unwrap();
        assert!((dec_to_f64(d) - 20.5).abs() < 1e-10);
    }

    #[test]
    fn test_dec_to_f64_zero() {
        assert_eq!(dec_to_f64(Decimal::ZERO), 0.0);
    }
}
