//! Coercion of raw form input into numeric field values.
//!
//! Every numeric field in every document is fed from a text box, one keystroke
//! at a time. Input that does not parse (`"abc"`, `"12."` mid-typing is fine,
//! `"1,5"` is not) is replaced with the field's fallback and logged; it is never
//! reported back to the caller, and a non-finite value never reaches state.

use tracing::{debug, warn};

/// Coerce raw input into a finite decimal.
///
/// Empty (or whitespace-only) input yields `fallback` silently; it is the
/// normal state of a cleared text box.
pub fn decimal(field: &'static str, raw: &str, fallback: f64) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        Ok(_) => {
            warn!(field, raw, fallback, "non-finite numeric input; using fallback");
            fallback
        }
        Err(err) => {
            warn!(field, raw, fallback, error = %err, "invalid numeric input; using fallback");
            fallback
        }
    }
}

/// Coerce raw input into a non-negative whole count.
///
/// Decimal text is accepted and truncated toward zero (`"2.7"` → 2); negative
/// values clamp to 0.
pub fn count(field: &'static str, raw: &str, fallback: i64) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback;
    }

    let value = match trimmed.parse::<i64>() {
        Ok(value) => value,
        Err(_) => match trimmed.parse::<f64>() {
            // `as` saturates at the i64 bounds.
            Ok(value) if value.is_finite() => value.trunc() as i64,
            Ok(_) => {
                warn!(field, raw, fallback, "non-finite count input; using fallback");
                return fallback;
            }
            Err(err) => {
                warn!(field, raw, fallback, error = %err, "invalid count input; using fallback");
                return fallback;
            }
        },
    };

    if value < 0 {
        debug!(field, value, "negative count clamped to zero");
        return 0;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decimal_parses_plain_and_padded_numbers() {
        assert_eq!(decimal("unit_price", "85", 0.0), 85.0);
        assert_eq!(decimal("unit_price", " 12.5 ", 0.0), 12.5);
        assert_eq!(decimal("unit_price", "-3.25", 0.0), -3.25);
        assert_eq!(decimal("unit_price", "1e3", 0.0), 1000.0);
    }

    #[test]
    fn decimal_falls_back_on_garbage_and_empty() {
        assert_eq!(decimal("unit_price", "abc", 0.0), 0.0);
        assert_eq!(decimal("unit_price", "", 0.0), 0.0);
        assert_eq!(decimal("unit_price", "   ", 7.0), 7.0);
        assert_eq!(decimal("unit_price", "1,5", 0.0), 0.0);
    }

    #[test]
    fn decimal_rejects_non_finite_values() {
        assert_eq!(decimal("tax_rate", "NaN", 0.0), 0.0);
        assert_eq!(decimal("tax_rate", "inf", 0.0), 0.0);
        assert_eq!(decimal("tax_rate", "-infinity", 0.0), 0.0);
        assert_eq!(decimal("tax_rate", "1e400", 0.0), 0.0);
    }

    #[test]
    fn count_truncates_decimals_and_clamps_negatives() {
        assert_eq!(count("quantity", "10", 0), 10);
        assert_eq!(count("quantity", "2.7", 0), 2);
        assert_eq!(count("quantity", "-4", 0), 0);
        assert_eq!(count("quantity", "-0.5", 0), 0);
    }

    #[test]
    fn count_falls_back_on_garbage() {
        assert_eq!(count("quantity", "abc", 0), 0);
        assert_eq!(count("quantity", "", 1), 1);
        assert_eq!(count("quantity", "nan", 1), 1);
    }

    proptest! {
        #[test]
        fn decimal_never_yields_non_finite(raw in ".*") {
            prop_assert!(decimal("field", &raw, 0.0).is_finite());
        }

        #[test]
        fn count_is_never_negative(raw in ".*") {
            prop_assert!(count("field", &raw, 0) >= 0);
        }

        #[test]
        fn decimal_round_trips_finite_floats(value in -1.0e9f64..1.0e9f64) {
            prop_assert_eq!(decimal("field", &value.to_string(), 0.0), value);
        }
    }
}
