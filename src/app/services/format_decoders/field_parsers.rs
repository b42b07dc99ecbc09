//! Numeric field parsing for telemetry decoders
//!
//! The delimited-text decoder coerces numeric fields with a minimal decimal
//! parser instead of a general-purpose one: an optional sign, digits and at
//! most one decimal point. No exponents, no thousands separators, no locale.
//! The `fast_*` variants map malformed text to zero. `parse_integer` reports
//! malformed text so the log decoder can reject the line; log decimals go
//! through the standard library parser instead.

/// Powers of ten exactly representable as f64
const EXACT_POWERS_OF_TEN: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Largest integer mantissa that converts to f64 without rounding
const MAX_EXACT_MANTISSA: u64 = 1 << 53;

/// Parse a decimal number, returning `None` for malformed text
///
/// Surrounding ASCII whitespace is ignored. At least one digit is required.
/// Short inputs are computed directly from an integer mantissa and an exact
/// power of ten, which rounds identically to the standard library parser.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim_ascii();
    let bytes = text.as_bytes();
    let (negative, body) = split_sign(bytes)?;

    let mut mantissa: u64 = 0;
    let mut fraction_digits = 0usize;
    let mut seen_digit = false;
    let mut seen_point = false;
    let mut exact = true;

    for &b in body {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                if seen_point {
                    fraction_digits += 1;
                }
                if exact {
                    let next = mantissa * 10 + u64::from(b - b'0');
                    if next <= MAX_EXACT_MANTISSA {
                        mantissa = next;
                    } else {
                        exact = false;
                    }
                }
            }
            b'.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }

    if !seen_digit {
        return None;
    }

    if !exact || fraction_digits >= EXACT_POWERS_OF_TEN.len() {
        // Syntax is already validated; defer rounding of long inputs to std
        return text.parse::<f64>().ok();
    }

    let magnitude = mantissa as f64 / EXACT_POWERS_OF_TEN[fraction_digits];
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a signed 32-bit integer, returning `None` for malformed or overflowing text
///
/// A fractional part (`2800.0`, `2800.75`) is accepted and truncated toward zero.
pub fn parse_integer(text: &str) -> Option<i32> {
    let bytes = text.trim_ascii().as_bytes();
    let (negative, body) = split_sign(bytes)?;

    let (whole, fraction) = match body.iter().position(|&b| b == b'.') {
        Some(point) => (&body[..point], &body[point + 1..]),
        None => (body, &[][..]),
    };
    if whole.is_empty() || !fraction.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut value: i64 = 0;
    for &b in whole {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + i64::from(b - b'0');
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
    }

    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}

/// Decimal coercion used by the delimited-text decoder; malformed text is 0.0
pub fn fast_f64(text: &str) -> f64 {
    parse_decimal(text).unwrap_or(0.0)
}

/// Integer coercion used by the delimited-text decoder; malformed text is 0
pub fn fast_i32(text: &str) -> i32 {
    parse_integer(text).unwrap_or(0)
}

fn split_sign(bytes: &[u8]) -> Option<(bool, &[u8])> {
    match bytes.first()? {
        b'-' => Some((true, &bytes[1..])),
        b'+' => Some((false, &bytes[1..])),
        _ => Some((false, bytes)),
    }
}
