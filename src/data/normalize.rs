use thiserror::Error;

use super::model::TemperatureKey;

/// Digits kept after the decimal point in every [`TemperatureKey`].
pub const SCALE: usize = 2;

/// Exponents beyond this magnitude are rejected rather than expanded.
const MAX_EXPONENT: i64 = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a decimal number")]
pub struct InvalidNumber(pub String);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Canonicalise a raw temperature field.
///
/// The field is trimmed, `,` is read as the decimal separator, and the value
/// is rounded half-up (away from zero) to two fractional digits. Rounding is
/// done on the decimal digits themselves, so `23.005` becomes `23.01` no
/// matter how a binary float would have represented it.
///
/// ```text
///   " 23,456 "  →  "23.46"
///   "-0.125"    →  "-0.13"
///   "-0.001"    →  "0.00"
///   "1.5e1"     →  "15.00"
/// ```
pub fn normalize(raw: &str) -> Result<TemperatureKey, InvalidNumber> {
    let text = raw.trim().replace(',', ".");
    let decimal = parse_decimal(&text).ok_or_else(|| InvalidNumber(raw.trim().to_string()))?;
    Ok(TemperatureKey::from_canonical(decimal.round_half_up()))
}

// ---------------------------------------------------------------------------
// Decimal scanning
// ---------------------------------------------------------------------------

/// A decimal literal split into its significant digits and the position of
/// the decimal point within them (may lie outside the digit string).
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    point: i64,
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut digits = Vec::new();
    while let Some(&b) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        digits.push(b - b'0');
        pos += 1;
    }
    let int_len = digits.len();

    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        while let Some(&b) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
            digits.push(b - b'0');
            pos += 1;
        }
    }
    if digits.is_empty() {
        return None;
    }

    let mut exponent: i64 = 0;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        let rest = &s[pos..];
        let unsigned = rest.strip_prefix(&['+', '-'][..]).unwrap_or(rest);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        exponent = rest.parse().ok()?;
        if exponent.abs() > MAX_EXPONENT {
            return None;
        }
        pos = bytes.len();
    }

    if pos != bytes.len() {
        return None;
    }

    Some(Decimal {
        negative,
        digits,
        point: int_len as i64 + exponent,
    })
}

impl Decimal {
    /// Render with exactly [`SCALE`] fractional digits, rounding half-up.
    fn round_half_up(&self) -> String {
        let keep = self.point + SCALE as i64;

        let (mut kept, round_digit): (Vec<u8>, u8) = if keep < 0 {
            (Vec::new(), 0)
        } else {
            let keep = keep as usize;
            if keep >= self.digits.len() {
                let mut kept = self.digits.clone();
                kept.resize(keep, 0);
                (kept, 0)
            } else {
                (self.digits[..keep].to_vec(), self.digits[keep])
            }
        };

        if round_digit >= 5 {
            increment(&mut kept);
        }

        let first_nonzero = kept.iter().position(|&d| d != 0).unwrap_or(kept.len());
        let significant = &kept[first_nonzero..];
        let is_zero = significant.is_empty();
        let significant = if significant.len() <= SCALE {
            let mut padded = vec![0; SCALE + 1 - significant.len()];
            padded.extend_from_slice(significant);
            padded
        } else {
            significant.to_vec()
        };

        let split = significant.len() - SCALE;
        let mut out = String::with_capacity(significant.len() + 2);
        if self.negative && !is_zero {
            out.push('-');
        }
        out.extend(significant[..split].iter().map(|d| char::from(b'0' + d)));
        out.push('.');
        out.extend(significant[split..].iter().map(|d| char::from(b'0' + d)));
        out
    }
}

/// Add one unit in the last place, growing the number on overflow.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> String {
        normalize(s).unwrap().to_string()
    }

    fn is_canonical(s: &str) -> bool {
        let body = s.strip_prefix('-').unwrap_or(s);
        let Some((int, frac)) = body.split_once('.') else {
            return false;
        };
        !int.is_empty()
            && int.bytes().all(|b| b.is_ascii_digit())
            && frac.len() == 2
            && frac.bytes().all(|b| b.is_ascii_digit())
    }

    #[test]
    fn pads_to_two_fraction_digits() {
        assert_eq!(key("30"), "30.00");
        assert_eq!(key("30.0"), "30.00");
        assert_eq!(key("7.5"), "7.50");
        assert_eq!(key("0"), "0.00");
    }

    #[test]
    fn decimal_comma_is_equivalent() {
        assert_eq!(key("23,45"), key("23.45"));
        assert_eq!(key("30,00"), "30.00");
    }

    #[test]
    fn rounds_half_up_not_to_even() {
        assert_eq!(key("23.005"), "23.01");
        assert_eq!(key("23.0049"), "23.00");
        assert_eq!(key("0.125"), "0.13");
        assert_eq!(key("0.135"), "0.14");
        assert_eq!(key("2.675"), "2.68");
    }

    #[test]
    fn negative_ties_round_away_from_zero() {
        assert_eq!(key("-0.125"), "-0.13");
        assert_eq!(key("-1.994"), "-1.99");
        assert_eq!(key("-1.995"), "-2.00");
    }

    #[test]
    fn carry_propagates_into_integer_part() {
        assert_eq!(key("9.995"), "10.00");
        assert_eq!(key("99.999"), "100.00");
        assert_eq!(key("0.005"), "0.01");
    }

    #[test]
    fn negative_zero_collapses() {
        assert_eq!(key("-0.001"), "0.00");
        assert_eq!(key("-0"), "0.00");
        assert_eq!(key("-0.001"), key("0.001"));
    }

    #[test]
    fn trims_and_accepts_sign_and_bare_dots() {
        assert_eq!(key("  31.5 "), "31.50");
        assert_eq!(key("+4.2"), "4.20");
        assert_eq!(key(".5"), "0.50");
        assert_eq!(key("5."), "5.00");
        assert_eq!(key("007.10"), "7.10");
    }

    #[test]
    fn expands_exponents_without_scientific_output() {
        assert_eq!(key("1.5e1"), "15.00");
        assert_eq!(key("25E-1"), "2.50");
        assert_eq!(key("1e-3"), "0.00");
        assert_eq!(key("5e-3"), "0.01");
        assert_eq!(key("1e6"), "1000000.00");
    }

    #[test]
    fn rejects_non_numbers() {
        for bad in ["", "x", "-", ".", "1.2.3", "1,234.5", "NaN", "Infinity", "1e", "1e+", "0x1A", "12a", "1e99999"] {
            assert!(normalize(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn error_carries_trimmed_input() {
        assert_eq!(normalize(" abc ").unwrap_err(), InvalidNumber("abc".to_string()));
    }

    #[test]
    fn output_is_canonical_and_idempotent() {
        for raw in ["23.45", "-3", "0.004", "1e2", "12,3456", "-99.995", "+0.5", "100"] {
            let once = key(raw);
            assert!(is_canonical(&once), "{once} is not canonical");
            assert_eq!(key(&once), once);
        }
    }
}
