//! Rounding and display rules for currency and measurement values.
//!
//! Stored state keeps full `f64` precision. These functions are applied only
//! where values leave the model (document payload, plain-text rendering).

/// Decimal places for currency amounts.
pub const CURRENCY_PLACES: u32 = 2;
/// Decimal places for volumes (cubic feet).
pub const VOLUME_PLACES: u32 = 3;
/// Decimal places for package measures (inches, pounds).
pub const MEASURE_PLACES: u32 = 1;

/// Computed values that overflowed to infinity or became NaN read as 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Round half away from zero to `places` decimals; `-0.0` normalizes to `0.0`.
///
/// Non-finite input gives `0.0`.
pub fn round_to(value: f64, places: u32) -> f64 {
    let value = finite_or_zero(value);
    let scaled = value * 10f64.powi(places as i32);
    if !scaled.is_finite() {
        // Far past 2^53; there is no fraction left to round.
        return value;
    }
    let rounded = scaled.round() / 10f64.powi(places as i32);
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn round_currency(value: f64) -> f64 {
    round_to(value, CURRENCY_PLACES)
}

pub fn round_volume(value: f64) -> f64 {
    round_to(value, VOLUME_PLACES)
}

/// `1234567.891` with 2 places → `"1,234,567.89"`.
pub fn group_thousands(value: f64, places: u32) -> String {
    let rounded = round_to(value, places);
    let fixed = format!("{:.*}", places as usize, rounded.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Currency with symbol: `"$2,378.00"`, `"-$5.00"`.
pub fn format_currency(value: f64) -> String {
    let grouped = group_thousands(value, CURRENCY_PLACES);
    match grouped.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${grouped}"),
    }
}

/// Currency without symbol, as used in account statements: `"1,154.00"`.
pub fn format_amount(value: f64) -> String {
    group_thousands(value, CURRENCY_PLACES)
}

/// Volume in cubic feet: `"0.579"`.
pub fn format_volume(value: f64) -> String {
    format!("{:.3}", round_volume(value))
}

/// Package measure: `"12.5"`.
pub fn format_measure(value: f64) -> String {
    format!("{:.1}", round_to(value, MEASURE_PLACES))
}

/// Percentage rate as typed into the form: `16.0`, `7.5`.
pub fn format_rate(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
