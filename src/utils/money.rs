//! Money helpers. Prices are stored as floats in major units.

/// Largest accepted difference between a quoted amount and the course price.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Converts a major-unit amount to minor units (cents), rounding half away
/// from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_minor_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Returns true if `paid` equals `price` within [`AMOUNT_TOLERANCE`].
///
/// Compared in minor units so that float noise around the boundary does not
/// decide the outcome.
pub fn amounts_match(paid: f64, price: f64) -> bool {
    let tolerance = to_minor_units(AMOUNT_TOLERANCE);
    (to_minor_units(paid) - to_minor_units(price)).abs() <= tolerance
}

/// Case-insensitive ISO 4217 comparison.
pub fn currencies_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(to_minor_units(49.99), 4999);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
        assert_eq!(to_minor_units(1500.0), 150_000);
        assert_eq!(to_minor_units(19.995), 2000);
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(4999), 49.99);
        assert_eq!(from_minor_units(0), 0.0);
    }

    #[test]
    fn test_amount_tolerance() {
        assert!(amounts_match(49.99, 49.99));
        assert!(amounts_match(50.00, 49.99));
        assert!(amounts_match(49.98, 49.99));
        assert!(!amounts_match(49.97, 49.99));
        assert!(!amounts_match(0.0, 49.99));
    }

    #[test]
    fn test_currency_case_insensitive() {
        assert!(currencies_match("usd", "USD"));
        assert!(currencies_match(" ETB", "etb"));
        assert!(!currencies_match("USD", "ETB"));
    }
}
