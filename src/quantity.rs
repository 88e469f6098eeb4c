//! Exact quantity arithmetic.
//!
//! Quantities are arbitrary-precision rationals so that repeated ratio
//! multiplication along long chains never drifts, and propagating the same
//! graph twice gives bit-identical results.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// An exact, non-negative amount attached to a node.
pub type Quantity = BigRational;

/// Build a quantity from a whole number.
pub fn from_integer(value: u64) -> Quantity {
    BigRational::from_integer(BigInt::from(value))
}

/// The default root quantity.
pub fn one() -> Quantity {
    Quantity::one()
}

/// Whether a quantity is strictly greater than zero.
pub fn is_positive(value: &Quantity) -> bool {
    value.is_positive()
}

/// Parse a quantity from text.
///
/// Accepts integers (`15`), fractions (`3/2`) and plain decimals (`2.5`).
/// Decimals are converted exactly, so `0.1` is `1/10`.
pub fn parse_quantity(text: &str) -> Option<Quantity> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((numer, denom)) = text.split_once('/') {
        let numer: BigInt = numer.trim().parse().ok()?;
        let denom: BigInt = denom.trim().parse().ok()?;
        if denom.is_zero() {
            return None;
        }
        return Some(BigRational::new(numer, denom));
    }

    if let Some((whole, frac)) = text.split_once('.') {
        let (negative, whole) = match whole.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, whole.strip_prefix('+').unwrap_or(whole)),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let digits = format!("{}{}", whole, frac);
        let mut numer: BigInt = digits.parse().ok()?;
        if negative {
            numer = -numer;
        }
        let denom = num_traits::pow(BigInt::from(10u32), frac.len());
        return Some(BigRational::new(numer, denom));
    }

    let value: BigInt = text.parse().ok()?;
    Some(BigRational::from_integer(value))
}

/// Build a quantity from a float by way of its shortest decimal form.
///
/// `0.1` becomes exactly `1/10` rather than the nearest binary fraction.
pub fn from_f64(value: f64) -> Option<Quantity> {
    if !value.is_finite() {
        return None;
    }
    parse_quantity(&format!("{}", value))
}

/// Render a quantity as `p` when integral, `p/q` otherwise.
pub fn format_quantity(value: &Quantity) -> String {
    if value.is_integer() {
        value.to_integer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

/// Approximate a quantity as a float for display.
pub fn to_f64(value: &Quantity) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ratio(n: i64, d: i64) -> Quantity {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_quantity("15"), Some(from_integer(15)));
        assert_eq!(parse_quantity(" 3/2 "), Some(ratio(3, 2)));
        assert_eq!(parse_quantity("6/4"), Some(ratio(3, 2)));
        assert_eq!(parse_quantity("2.5"), Some(ratio(5, 2)));
        assert_eq!(parse_quantity("0.1"), Some(ratio(1, 10)));
        assert_eq!(parse_quantity("-1.5"), Some(ratio(-3, 2)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("."), None);
        assert_eq!(parse_quantity("1.2.3"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_quantity(&from_integer(15)), "15");
        assert_eq!(format_quantity(&ratio(3, 2)), "3/2");
        assert_eq!(format_quantity(&ratio(10, 5)), "2");
    }

    #[test]
    fn test_from_f64_is_decimal_exact() {
        assert_eq!(from_f64(0.1), Some(ratio(1, 10)));
        assert_eq!(from_f64(4.0), Some(from_integer(4)));
        assert_eq!(from_f64(f64::NAN), None);
    }

    #[test]
    fn test_to_f64() {
        assert_relative_eq!(to_f64(&ratio(1, 3)), 1.0 / 3.0);
        assert_relative_eq!(to_f64(&from_integer(15)), 15.0);
    }

    #[test]
    fn test_positive() {
        assert!(is_positive(&one()));
        assert!(!is_positive(&Quantity::zero()));
        assert!(!is_positive(&ratio(-1, 2)));
    }
}
